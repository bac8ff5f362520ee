use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::ClientError,
    models::{ContentBody, Response, Todo},
};

/// Thin wrappers over the four todo endpoints.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{path}", self.base_url)
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.url("todos")).send().await?;

        data(read(response).await?)
    }

    pub async fn create(&self, content: &str) -> Result<Todo, ClientError> {
        let response = self
            .http
            .post(self.url("todo"))
            .json(&ContentBody { content })
            .send()
            .await?;

        data(read(response).await?)
    }

    pub async fn update(&self, id: &str, content: &str) -> Result<Todo, ClientError> {
        let response = self
            .http
            .patch(self.url(&format!("todo/{id}")))
            .json(&ContentBody { content })
            .send()
            .await?;

        data(read(response).await?)
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<Option<String>, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("todo/{id}")))
            .send()
            .await?;

        let body: Response<Value> = read(response).await?;

        Ok(body.message)
    }
}

async fn read<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Response<T>, ClientError> {
    let status = response.status();
    debug!(%status, url = %response.url(), "Response received");

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = response
        .json::<Response<Value>>()
        .await
        .ok()
        .and_then(|body| body.message);

    warn!(%status, ?message, "Request failed");

    Err(ClientError::Api { status, message })
}

fn data<T>(body: Response<T>) -> Result<T, ClientError> {
    body.data.ok_or(ClientError::MissingData)
}
