// ============================================================================
// ERRORES - Un enum por responsabilidad
// ============================================================================
// Credenciales malformadas o expiradas NO son errores: se absorben como
// "sin sesión" en el codec y en el SessionStore.
// ============================================================================

use thiserror::Error;

/// Mensaje mostrado cuando el backend rechaza el login sin explicar por qué
pub const GENERIC_LOGIN_ERROR: &str = "No se pudo iniciar sesión. Verifica tus credenciales.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoginError {
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Respuesta de login inválida: {0}")]
    MalformedResponse(String),
    #[error("La credencial recibida no se puede decodificar")]
    InvalidToken,
    #[error("La credencial recibida ya está expirada")]
    ExpiredToken,
}

impl LoginError {
    /// Texto apto para mostrar al usuario
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Rejected(message) => message.clone(),
            LoginError::Network(_) => "No hay conexión con el servidor".to_string(),
            _ => GENERIC_LOGIN_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: unauthenticated")]
    Unauthorized { status: u16 },
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Parse error: {0}")]
    Decode(String),
    #[error("Serialization error: {0}")]
    Encode(String),
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Unauthorized { status } | HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Build(String),
    #[error("request failed: {0}")]
    Send(String),
    #[error("response body unreadable: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("localStorage no disponible")]
    Unavailable,
    #[error("Error serializando datos: {0}")]
    Serialize(String),
    #[error("Error guardando en storage: {0}")]
    Write(String),
}
