use serde::{Deserialize, Serialize};

use crate::models::IdentityHints;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Respuesta del endpoint de autenticación. Solo el token es obligatorio.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default, alias = "rol")]
    pub role: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl LoginResponse {
    pub fn hints(&self) -> IdentityHints {
        IdentityHints {
            role: self.role.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Cuerpo de error del backend; cualquiera de los dos campos puede venir
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ErrorInfo {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorInfo {
    pub fn parse(body: &str) -> Option<String> {
        let info: ErrorInfo = serde_json::from_str(body).ok()?;
        info.message
            .or(info.error)
            .filter(|m| !m.trim().is_empty())
    }
}
