// ============================================================================
// HTTP CLIENT - Credencial automática + manejo centralizado del 401
// ============================================================================
// Lee la credencial del slot compartido en cada petición (nunca guarda su
// propia copia de la identidad). Ante un 401 fuera de las rutas de
// autenticación invalida la sesión y redirige al login UNA sola vez.
// No reintenta ni encola: la llamada fallida se rechaza a quien la hizo.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::config::HttpConfig;
use crate::error::HttpError;
use crate::models::ErrorInfo;
use crate::services::navigator::{is_same_route, login_redirect_url, Navigator};
use crate::services::transport::{HttpRequest, HttpResponse, Transport};
use crate::state::{SessionEvent, SessionStore, Subscription};

/// Credencial por defecto de la capa HTTP. Solo el SessionStore escribe aquí.
#[derive(Clone, Default)]
pub struct CredentialSlot {
    token: Rc<RefCell<Option<String>>>,
}

impl CredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn is_set(&self) -> bool {
        self.token.borrow().is_some()
    }

    pub(crate) fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    pub(crate) fn clear(&self) {
        *self.token.borrow_mut() = None;
    }
}

pub struct HttpClient {
    transport: Rc<dyn Transport>,
    navigator: Rc<dyn Navigator>,
    session: Rc<SessionStore>,
    credentials: CredentialSlot,
    config: HttpConfig,
    /// true desde que se emitió una redirección hasta el siguiente login,
    /// logout o 401 visto ya en la ruta de login
    redirect_pending: Rc<Cell<bool>>,
    session_watch: Subscription,
}

impl HttpClient {
    pub fn new(
        config: HttpConfig,
        transport: Rc<dyn Transport>,
        navigator: Rc<dyn Navigator>,
        session: Rc<SessionStore>,
    ) -> Self {
        let redirect_pending = Rc::new(Cell::new(false));
        let session_watch = {
            let redirect_pending = redirect_pending.clone();
            session.events().subscribe(move |event| {
                if let SessionEvent::Authenticated(_) | SessionEvent::LoggedOut = event {
                    redirect_pending.set(false);
                }
            })
        };

        Self {
            transport,
            navigator,
            credentials: session.credential_slot(),
            session,
            config,
            redirect_pending,
            session_watch,
        }
    }

    /// Envía la petición. Cualquier status fuera de 2xx se devuelve como error.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let request = self.authorize(request);
        let path = request.path.clone();
        let method = request.method;

        let response = self.transport.send(request).await.map_err(|e| {
            log::error!("❌ [HTTP] {} {} falló: {}", method.as_str(), path, e);
            HttpError::Network(e.to_string())
        })?;

        if response.status == self.config.unauthorized_status {
            if self.is_auth_surface(&path) {
                log::debug!("🔐 [HTTP] {} en ruta de autenticación {}, sin cerrar sesión", response.status, path);
            } else {
                self.handle_unauthenticated(&path);
            }
            return Err(HttpError::Unauthorized { status: response.status });
        }

        if !response.ok() {
            let message = ErrorInfo::parse(&response.body)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            log::warn!("⚠️ [HTTP] {} {} → {}", method.as_str(), path, response.status);
            return Err(HttpError::Status {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpError> {
        self.send(HttpRequest::get(path)).await?.json()
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, HttpError> {
        self.send(HttpRequest::post(path).json(body)?).await?.json()
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, HttpError> {
        self.send(HttpRequest::put(path).json(body)?).await?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<(), HttpError> {
        self.send(HttpRequest::delete(path)).await.map(|_| ())
    }

    /// Un header puesto explícitamente por quien llama nunca se sobrescribe
    fn authorize(&self, request: HttpRequest) -> HttpRequest {
        if request.has_header(&self.config.auth_header) {
            return request;
        }
        match self.credentials.get() {
            Some(token) => {
                let value = format!("{} {}", self.config.auth_scheme, token);
                request.header(self.config.auth_header.clone(), value)
            }
            None => request,
        }
    }

    pub fn is_auth_surface(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path).to_ascii_lowercase();
        self.config
            .auth_surface_paths
            .iter()
            .any(|fragment| path.contains(&fragment.to_ascii_lowercase()))
    }

    /// Idempotente: varios 401 simultáneos producen como mucho una navegación
    fn handle_unauthenticated(&self, path: &str) {
        log::warn!("🔒 [HTTP] {} no autenticado, cerrando sesión", path);
        self.session.invalidate();

        let location = self.navigator.current_location();
        if is_same_route(&location.path, &self.config.login_route) {
            log::info!("ℹ️ [HTTP] Ya en {}, no se redirige", self.config.login_route);
            self.redirect_pending.set(false);
            return;
        }
        if self.redirect_pending.replace(true) {
            log::debug!("🔁 [HTTP] Redirección al login ya programada");
            return;
        }

        let url = login_redirect_url(&self.config.login_route, &self.config.redirect_reason, &location);
        log::info!("➡️ [HTTP] Redirigiendo a {}", url);
        self.navigator.navigate(&url);
    }

    pub fn redirect_pending(&self) -> bool {
        self.redirect_pending.get()
    }
}

impl Drop for HttpClient {
    fn drop(&mut self) {
        self.session_watch.unsubscribe();
    }
}
