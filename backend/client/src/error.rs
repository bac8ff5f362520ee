use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Response had no data")]
    MissingData,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// What to show the user: the server's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let with_message = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: Some("Todo not found".to_string()),
        };
        assert_eq!(with_message.user_message("Error deleting todo"), "Todo not found");

        let bare = ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        };
        assert_eq!(bare.user_message("Error deleting todo"), "Error deleting todo");
        assert_eq!(ClientError::MissingData.user_message("Error adding todo"), "Error adding todo");
    }
}
