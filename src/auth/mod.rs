use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{Identity, Role};

/// Session token claims, as issued by the portal's authentication service.
/// This crate only ever validates tokens; issuance is the auth service's
/// business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: String,
    #[serde(default)]
    pub can_manage_structure: bool,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            id: claims.sub,
            email: claims.email,
            full_name: claims.name,
            role: Role::from_db(&claims.role),
            can_manage_structure: claims.can_manage_structure,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Validate signature and expiry against the shared portal secret.
pub fn validate_token(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
    Ok(token_data.claims)
}

/// Read the claims without checking the signature. Good enough for the
/// client side to know who it is acting as; every mutation is re-checked
/// by the server against the verified token.
pub fn peek_claims(token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims)
}
