use serde::Serialize;

use crate::schemas::user::UserResponse;

/// Login and signup both answer with a bearer token for the account.
#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
    /// Token lifetime in seconds.
    pub(crate) expires_in: u64,
    pub(crate) user: UserResponse,
}

impl TokenResponse {
    pub(crate) fn bearer(access_token: String, expire_minutes: u64, user: UserResponse) -> Self {
        Self { access_token, token_type: "bearer", expires_in: expire_minutes * 60, user }
    }
}
