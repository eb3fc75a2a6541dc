//! # Authentication Middleware
//!
//! The `AuthenticatedUser` extractor resolves every request to a `User`:
//! a valid bearer JWT resolves to that token's user (created on first
//! sight), no token resolves to the deterministic guest user, and an
//! invalid or expired token is rejected with `401`. Handlers therefore
//! never deal with "maybe a user".

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::Utc;
use core_access::{get_or_create_user, User, GUEST_USER_IDENTIFIER};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::state::AppState;

/// Represents the claims we expect to find in the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token, which we use as the unique user identifier.
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
    /// The user's database ID (UUID). This is optional and mainly for testing.
    #[serde(default)]
    pub user_id: String,
}

/// An Axum extractor that provides the currently authenticated user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// A custom rejection type for authentication failures.
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The Authorization header is optional: absence means guest.
        let bearer_header =
            Option::<TypedHeader<Authorization<Bearer>>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Unexpected error during header extraction: {}", e);
                    AuthError(
                        StatusCode::BAD_REQUEST,
                        "Invalid Authorization header format.".to_string(),
                    )
                })?;

        let user = if let Some(TypedHeader(Authorization(bearer))) = bearer_header {
            let jwt_secret =
                std::env::var("JWT_SECRET").unwrap_or_else(|_| "a-secure-secret-key".to_string());

            let token_data = decode::<Claims>(
                bearer.token(),
                &DecodingKey::from_secret(jwt_secret.as_ref()),
                &Validation::default(),
            )
            .map_err(|e| {
                warn!("JWT validation failed: {}", e);
                AuthError(
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token.".to_string(),
                )
            })?;

            // If user_id is provided in the claim, construct the user
            // directly. This is primarily for testing scenarios to inject a
            // specific user.
            if !token_data.claims.user_id.is_empty() {
                Ok(User {
                    id: token_data.claims.user_id,
                    role: "user".to_string(),
                    created_at: Utc::now(),
                })
            } else {
                get_or_create_user(&state.sqlite_provider.db, &token_data.claims.sub).await
            }
        } else {
            get_or_create_user(&state.sqlite_provider.db, GUEST_USER_IDENTIFIER).await
        }
        .map_err(|e| {
            error!("Failed to get or create user: {}", e);
            AuthError(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Could not retrieve user: {e}"),
            )
        })?;

        Ok(AuthenticatedUser(user))
    }
}
