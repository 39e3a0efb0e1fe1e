use serde::{Deserialize, Serialize};

/// Request body for registration. Fields are optional so that missing keys
/// reach the handler's presence check instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for sign-in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after a successful sign-in.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: &'static str,
    pub token: String,
}

/// Public part of the caller's own user record.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
}
