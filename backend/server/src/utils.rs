use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use uuid::Uuid;

use crate::{
    error::AppError::{self, NotFound, Validation},
    models::TodoInput,
};

pub const CONTENT_REQUIRED: &str = "Content is required";

/// Pulls the content out of a request body, rejecting missing or blank text
/// before anything reaches the store. Non-blank text is kept as sent.
pub fn get_content(input: TodoInput) -> Result<String, AppError> {
    let content = input.content.ok_or(Validation(CONTENT_REQUIRED))?;

    if content.trim().is_empty() {
        return Err(Validation(CONTENT_REQUIRED));
    }

    Ok(content)
}

/// No record can live under a malformed key, so a bad id is just a miss.
pub fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| NotFound)
}

/// Network origin of the caller: first `X-Forwarded-For` hop, else the peer.
pub struct OriginIp(pub Option<String>);

impl<S> FromRequestParts<S> for OriginIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(address)| *address);

        Ok(OriginIp(origin_ip(&parts.headers, peer)))
    }
}

fn origin_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string);

    forwarded.or_else(|| peer.map(|address| address.ip().to_string()))
}
