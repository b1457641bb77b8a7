// ============================================================================
// APP - Contexto de la aplicación (stores + cliente HTTP cableados)
// ============================================================================
// Nada de singletons de módulo: cada Storefront es una instancia aislada con
// sus propios stores, construida a partir de las interfaces inyectadas.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::services::{AuthService, HttpClient, Navigator, Transport};
use crate::state::{CartStore, SessionStore};
use crate::utils::{Clock, KeyValueStorage};

pub struct Storefront {
    config: AppConfig,
    session: Rc<SessionStore>,
    http: Rc<HttpClient>,
    cart: Rc<CartStore>,
}

impl Storefront {
    pub fn new(
        config: AppConfig,
        storage: Rc<dyn KeyValueStorage>,
        transport: Rc<dyn Transport>,
        navigator: Rc<dyn Navigator>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let auth_api = Rc::new(AuthService::new(transport.clone(), config.session.login_path.clone()));
        let session = Rc::new(SessionStore::new(
            config.session.clone(),
            storage.clone(),
            auth_api,
            clock,
        ));
        let http = Rc::new(HttpClient::new(
            config.http.clone(),
            transport,
            navigator,
            session.clone(),
        ));
        let cart = if config.cart.persist {
            CartStore::with_storage(storage, config.cart.storage_key.clone())
        } else {
            CartStore::new()
        };

        Self {
            config,
            session,
            http,
            cart: Rc::new(cart),
        }
    }

    /// localStorage + fetch + window.location
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: AppConfig) -> Self {
        use crate::services::{BrowserNavigator, FetchTransport};
        use crate::utils::{BrowserStorage, SystemClock};

        let transport = Rc::new(FetchTransport::new(config.backend_url()));
        Self::new(
            config,
            Rc::new(BrowserStorage),
            transport,
            Rc::new(BrowserNavigator),
            Rc::new(SystemClock),
        )
    }

    /// Hidrata la sesión; los guards de ruta deben esperar a que termine
    pub async fn start(&self) {
        log::info!("🚀 [APP] Storefront iniciando ({})", self.config.environment);
        match self.session.hydrate().await {
            Some(identity) => log::info!("✅ [APP] Sesión activa: {} ({})", identity.username, identity.role),
            None => log::info!("ℹ️ [APP] Sin sesión activa"),
        }
    }

    pub fn dispose(&self) {
        self.session.dispose();
        self.cart.dispose();
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Rc<SessionStore> {
        &self.session
    }

    pub fn http(&self) -> &Rc<HttpClient> {
        &self.http
    }

    pub fn cart(&self) -> &Rc<CartStore> {
        &self.cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::models::ProductSnapshot;
    use crate::services::{HttpRequest, HttpResponse, Location};
    use crate::state::SessionStatus;
    use crate::testing::{token_expiring_at, RecordingNavigator, ScriptedTransport};
    use crate::utils::{FixedClock, MemoryStorage};
    use futures::executor::block_on;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    fn storefront(storage: &MemoryStorage, transport: &ScriptedTransport, navigator: &RecordingNavigator) -> Storefront {
        Storefront::new(
            AppConfig::default(),
            Rc::new(storage.clone()),
            Rc::new(transport.clone()),
            Rc::new(navigator.clone()),
            Rc::new(FixedClock(NOW)),
        )
    }

    #[test]
    fn login_request_revocation_flow() {
        let storage = MemoryStorage::new();
        let transport = ScriptedTransport::new();
        let navigator = RecordingNavigator::at(Location::new("/pedidos", "?page=2"));
        let app = storefront(&storage, &transport, &navigator);

        block_on(app.start());
        assert_eq!(app.session().status(), SessionStatus::Absent);

        let token = token_expiring_at(json!({"sub": "42", "role": "cliente"}), NOW / 1000 + 600);
        transport.push_response(HttpResponse::new(200, json!({"token": token.clone()}).to_string()));
        let identity = block_on(app.session().login_with_credentials("ana@tienda.ec", "pw")).unwrap();
        assert_eq!(identity.role, "CLIENTE");

        transport.push_response(HttpResponse::new(200, "[]"));
        block_on(app.http().send(HttpRequest::get("/orders"))).unwrap();

        transport.push_response(HttpResponse::new(401, ""));
        let result = block_on(app.http().send(HttpRequest::get("/orders")));
        assert!(matches!(result, Err(HttpError::Unauthorized { .. })));

        let sent = transport.requests();
        assert!(!sent[0].has_header("Authorization"));
        assert_eq!(sent[1].header_value("Authorization"), Some(format!("Bearer {}", token).as_str()));
        assert_eq!(app.session().status(), SessionStatus::Absent);
        assert!(storage.get_item("auth").is_none());
        assert_eq!(
            navigator.visits(),
            vec!["/login?reason=expired&redirect=%2Fpedidos%3Fpage%3D2".to_string()]
        );
    }

    #[test]
    fn restart_restores_session_and_cart() {
        let storage = MemoryStorage::new();
        let transport = ScriptedTransport::new();
        let navigator = RecordingNavigator::at(Location::new("/", ""));
        {
            let app = storefront(&storage, &transport, &navigator);
            let token = token_expiring_at(json!({"name": "Ana"}), NOW / 1000 + 600);
            app.session().adopt_external_token(&token).unwrap();
            app.cart().add_to_cart(
                &ProductSnapshot {
                    id: "p1".to_string(),
                    name: "Café".to_string(),
                    price: 4.75,
                    image_url: None,
                },
                2,
            );
            app.dispose();
        }

        let app = storefront(&storage, &transport, &navigator);
        assert!(app.session().is_loading());
        block_on(app.start());
        assert_eq!(app.session().current().map(|i| i.username), Some("Ana".to_string()));
        assert_eq!(app.cart().cart_count_skus(), 1);
        assert!(app.http().is_auth_surface("/auth/login"));
        assert_eq!(app.config().session.storage_key, "auth");
    }
}
