use crate::{
    config::{Config, Role},
    error::AppError,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authentication information attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AuthInfo {
    /// Name of the API key used for authentication
    pub api_key_name: String,
    /// Role the key is configured with
    pub role: Role,
}

impl AuthInfo {
    /// Admin-only endpoints (rate table, occupant-cost report)
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

/// Authentication middleware
/// Extracts and validates the Bearer token from the Authorization header
pub async fn auth_middleware(
    State(config): State<Arc<arc_swap::ArcSwap<Config>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    // Extract Bearer token
    let token = extract_bearer_token(auth_header)?;

    // Load current configuration
    let config = config.load();

    // Validate token against configured API keys
    let api_key_config = config
        .api_keys
        .iter()
        .find(|k| k.key == token && k.enabled)
        .ok_or_else(|| AppError::Unauthorized("Invalid or disabled API key".to_string()))?;

    // Attach authentication info to request
    req.extensions_mut().insert(AuthInfo {
        api_key_name: api_key_config.name.clone(),
        role: api_key_config.role,
    });

    Ok(next.run(req).await)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    const BEARER_PREFIX: &str = "Bearer ";

    if !auth_header.starts_with(BEARER_PREFIX) {
        return Err(AppError::Unauthorized(
            "Authorization header must use Bearer scheme".to_string(),
        ));
    }

    let token = &auth_header[BEARER_PREFIX.len()..];

    if token.is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token)
}
