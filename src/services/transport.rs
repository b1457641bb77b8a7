// ============================================================================
// TRANSPORT - SOLO envío HTTP (stateless)
// ============================================================================
// No sabe nada de sesiones: recibe una petición completa y devuelve status +
// cuerpo. Credenciales y política de 401 viven en HttpClient.
// ============================================================================

use futures::future::LocalBoxFuture;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{HttpError, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// Petición relativa al backend (`path` sin host)
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        let json = serde_json::to_string(body).map_err(|e| HttpError::Encode(e.to_string()))?;
        self.body = Some(json);
        if !self.has_header("Content-Type") {
            self.headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        Ok(self)
    }

    /// Los nombres de header no distinguen mayúsculas
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header_value(name).is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

/// Envío real de la petición. En el navegador es `fetch`; en tests, un guion.
pub trait Transport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, TransportError>>;
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::TransportError;
    use futures::future::{FutureExt, LocalBoxFuture};
    use gloo_net::http::RequestBuilder;

    /// Transport sobre `fetch` vía gloo-net
    #[derive(Clone)]
    pub struct FetchTransport {
        base_url: String,
    }

    impl FetchTransport {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self {
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }
        }

        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = format!("{}{}", self.base_url, request.path);
            let method = match request.method {
                Method::Get => gloo_net::http::Method::GET,
                Method::Post => gloo_net::http::Method::POST,
                Method::Put => gloo_net::http::Method::PUT,
                Method::Patch => gloo_net::http::Method::PATCH,
                Method::Delete => gloo_net::http::Method::DELETE,
            };
            let mut builder = RequestBuilder::new(&url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError::Build(e.to_string()))?;

            let response = prepared
                .send()
                .await
                .map_err(|e| TransportError::Send(e.to_string()))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;

            Ok(HttpResponse { status, body })
        }
    }

    impl Transport for FetchTransport {
        fn send(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, TransportError>> {
            self.execute(request).boxed_local()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_body_sets_content_type_once() {
        let request = HttpRequest::post("/orders")
            .header("content-type", "application/json; charset=utf-8")
            .json(&json!({"qty": 2}))
            .unwrap();
        assert_eq!(request.body.as_deref(), Some(r#"{"qty":2}"#));
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest::get("/me").header("AUTHORIZATION", "Bearer x");
        assert_eq!(request.header_value("Authorization"), Some("Bearer x"));
        assert!(!request.has_header("Cookie"));
    }

    #[test]
    fn response_helpers() {
        let response = HttpResponse::new(204, "");
        assert!(response.ok());
        assert!(!HttpResponse::new(401, "").ok());

        let parsed: serde_json::Value = HttpResponse::new(200, r#"{"a":1}"#).json().unwrap();
        assert_eq!(parsed, json!({"a": 1}));
        assert!(matches!(
            HttpResponse::new(200, "nope").json::<serde_json::Value>(),
            Err(HttpError::Decode(_))
        ));
    }
}
