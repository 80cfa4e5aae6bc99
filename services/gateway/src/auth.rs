use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use types::ids::AccountId;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub account_id: AccountId,
    /// Grants access to the /admin surface
    #[serde(default)]
    pub admin: bool,
}

fn decoding_key() -> &'static DecodingKey {
    static KEY: OnceLock<DecodingKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret".to_string());
        DecodingKey::from_secret(secret.as_bytes())
    })
}

fn claims_from_parts(parts: &Parts) -> Result<Claims, AppError> {
    let header = parts
        .headers
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing authentication credentials".into()))?;
    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid header string".into()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Expected Bearer token".into()))?;

    let token_data = decode::<Claims>(token, decoding_key(), &Validation::default())
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;
    Ok(token_data.claims)
}

/// The authenticated trading principal
pub struct AuthenticatedUser {
    pub account_id: AccountId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts)?;
        Ok(AuthenticatedUser {
            account_id: claims.account_id,
        })
    }
}

/// A principal whose token carries the admin claim
pub struct AdminUser {
    pub account_id: AccountId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts)?;
        if !claims.admin {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(AdminUser {
            account_id: claims.account_id,
        })
    }
}
