use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::models::Claims;

/// Identificador del usuario tal como lo emite el backend (texto o número)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityId {
    Number(Number),
    Text(String),
}

impl IdentityId {
    pub fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(IdentityId::Text(s.clone())),
            Value::Number(n) => Some(IdentityId::Number(n.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityId::Number(n) => write!(f, "{}", n),
            IdentityId::Text(s) => f.write_str(s),
        }
    }
}

/// Quién ha iniciado sesión. Es también el registro persistido en storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Credencial original, nunca re-codificada
    pub token: String,
    /// Siempre en mayúsculas
    #[serde(default)]
    pub role: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id: Option<IdentityId>,
}

/// Datos que acompañan a la credencial cuando vienen de una respuesta de login
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityHints {
    pub role: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// Deriva la identidad desde la credencial y sus claims.
    /// Los hints explícitos ganan; si faltan, se recorren las alternativas de los claims.
    pub fn derive(token: &str, claims: &Claims, hints: IdentityHints, default_username: &str) -> Self {
        let role = non_empty(hints.role)
            .or_else(|| claims.role())
            .unwrap_or_default()
            .to_uppercase();

        let email = non_empty(hints.email).or_else(|| claims.email());

        let subject = claims.subject();
        let subject_text = subject.as_ref().and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        let username = non_empty(hints.username)
            .or_else(|| claims.username())
            .or_else(|| claims.name())
            .or(subject_text)
            .or_else(|| email.clone())
            .unwrap_or_else(|| default_username.to_string());

        Self {
            token: token.to_string(),
            role,
            username,
            email,
            id: subject.as_ref().and_then(IdentityId::from_claim),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
