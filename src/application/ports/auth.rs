use serde::{Deserialize, Serialize};

/// Token bundle returned by a successful end-user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub refresh_expires_in: Option<i64>,
    pub token_type: String,
    pub scope: Option<String>,
    pub session_state: Option<String>,
}

/// Result of a token introspection call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenIntrospection {
    pub active: bool,
    pub username: Option<String>,
    pub client_id: Option<String>,
    pub exp: Option<i64>,
    pub sub: Option<String>,
}
