use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::{ApiError, StructureError};
use crate::models::Identity;

/// Bearer-token middleware: validates the portal session token and injects
/// the acting [`Identity`] into request extensions. Handlers downstream
/// take identity from there; it never appears in their wire payloads.
pub async fn identity_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or(StructureError::Unauthenticated)?;

    let claims = auth::validate_token(&token).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        StructureError::Unauthenticated
    })?;

    request.extensions_mut().insert(Identity::from(claims));
    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?;

    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
