use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// CLAIMS - Payload decodificado de la credencial (nunca verificado)
// ============================================================================
// Ningún campo está garantizado: cada accesor aplica su propia cadena de
// alternativas y devuelve None si no encuentra nada utilizable.
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Expiración en segundos Unix. Acepta números y cadenas numéricas.
    pub fn exp(&self) -> Option<f64> {
        match self.0.get("exp")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// role → rol
    pub fn role(&self) -> Option<String> {
        self.first_text(&["role", "rol"])
    }

    /// sub → id → userId, conservando si era texto o número
    pub fn subject(&self) -> Option<Value> {
        ["sub", "id", "userId"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| match value {
                Value::String(s) => !s.is_empty(),
                Value::Number(_) => true,
                _ => false,
            })
            .cloned()
    }

    pub fn username(&self) -> Option<String> {
        self.first_text(&["username"])
    }

    pub fn name(&self) -> Option<String> {
        self.first_text(&["name"])
    }

    pub fn email(&self) -> Option<String> {
        self.first_text(&["email"])
    }

    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}
