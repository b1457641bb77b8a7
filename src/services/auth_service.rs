use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

use crate::error::{LoginError, GENERIC_LOGIN_ERROR};
use crate::models::{ErrorInfo, LoginRequest, LoginResponse};
use crate::services::transport::{HttpRequest, Transport};

/// Endpoint externo de autenticación
pub trait AuthApi {
    fn login<'a>(&'a self, identifier: &'a str, secret: &'a str)
        -> LocalBoxFuture<'a, Result<LoginResponse, LoginError>>;
}

/// Login contra el backend. Va directo al transport: la ruta de login está
/// exenta de la política de 401 y nunca lleva credencial previa.
#[derive(Clone)]
pub struct AuthService {
    transport: Rc<dyn Transport>,
    login_path: String,
}

impl AuthService {
    pub fn new(transport: Rc<dyn Transport>, login_path: impl Into<String>) -> Self {
        Self {
            transport,
            login_path: login_path.into(),
        }
    }

    async fn perform_login(&self, identifier: &str, secret: &str) -> Result<LoginResponse, LoginError> {
        let body = LoginRequest {
            email: identifier.to_string(),
            password: secret.to_string(),
        };
        let request = HttpRequest::post(self.login_path.as_str())
            .json(&body)
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| LoginError::Network(e.to_string()))?;

        if !response.ok() {
            log::warn!("⚠️ [AUTH] Login rechazado (HTTP {})", response.status);
            let message = ErrorInfo::parse(&response.body)
                .unwrap_or_else(|| GENERIC_LOGIN_ERROR.to_string());
            return Err(LoginError::Rejected(message));
        }

        response
            .json::<LoginResponse>()
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))
    }
}

impl AuthApi for AuthService {
    fn login<'a>(&'a self, identifier: &'a str, secret: &'a str)
        -> LocalBoxFuture<'a, Result<LoginResponse, LoginError>>
    {
        self.perform_login(identifier, secret).boxed_local()
    }
}
