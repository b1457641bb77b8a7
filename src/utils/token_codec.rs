// ============================================================================
// TOKEN CODEC - Decodificación de credenciales compactas (header.payload.firma)
// ============================================================================
// Sin I/O ni estado. La firma NUNCA se verifica aquí: los claims solo sirven
// para mostrar datos y decidir la expiración local.
// ============================================================================

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value;

use crate::models::Claims;
use crate::utils::clock::{Clock, SystemClock};

/// base64url que acepta el payload con o sin relleno '='
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodifica el segmento central. Devuelve None ante cualquier forma inesperada.
pub fn decode(raw: &str) -> Option<Claims> {
    let mut segments = raw.trim().split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() || payload.is_empty() {
        return None;
    }

    let bytes = PAYLOAD_ENGINE.decode(payload).ok()?;
    // UTF-8 completo: nombres con tildes o emojis deben sobrevivir
    let text = String::from_utf8(bytes).ok()?;

    match serde_json::from_str::<Value>(&text).ok()? {
        Value::Object(fields) => Some(Claims::new(fields)),
        _ => None,
    }
}

/// Sin `exp` la credencial se considera vigente
pub fn is_expired(claims: &Claims) -> bool {
    is_expired_with(claims, &SystemClock)
}

pub fn is_expired_with(claims: &Claims, clock: &dyn Clock) -> bool {
    is_expired_at(claims, clock.now_millis())
}

pub fn is_expired_at(claims: &Claims, now_millis: i64) -> bool {
    match claims.exp() {
        Some(exp) => exp * 1000.0 < now_millis as f64,
        None => false,
    }
}

#[cfg(test)]
pub(crate) fn encode_for_test(payload: &Value) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("eyJhbGciOiJIUzI1NiJ9.{}.firma", body)
}
