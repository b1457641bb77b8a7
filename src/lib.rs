// ============================================================================
// STOREFRONT CLIENT - Sesión, cliente HTTP autenticado y carrito reactivo
// ============================================================================
// - Models: Estructuras compartidas con el backend (identidad, claims, carrito)
// - Services: Transport, navegación, login y cliente HTTP con manejo del 401
// - State: SessionStore y CartStore con Rc<RefCell> + notificaciones
// - Utils: Codec de credenciales, storage, reloj
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

#[cfg(test)]
mod testing;

pub use app::Storefront;
pub use config::{AppConfig, CONFIG};
pub use error::{HttpError, LoginError, StorageError, TransportError};
pub use models::{CartAction, CartChange, CartEntry, Claims, Identity, IdentityId, ProductSnapshot};
pub use services::{HttpClient, HttpRequest, HttpResponse};
pub use state::{CartStore, SessionEvent, SessionStatus, SessionStore, Subscription};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use crate::app::Storefront;
    use crate::config::CONFIG;
    use crate::models::ProductSnapshot;
    use crate::state::{SessionEvent, Subscription};

    struct App {
        storefront: Rc<Storefront>,
        _subscriptions: Vec<Subscription>,
    }

    // Instancia única de la app en el navegador; los stores en sí no son globales
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    fn storefront() -> Result<Rc<Storefront>, JsValue> {
        APP.with(|app| app.borrow().as_ref().map(|a| a.storefront.clone()))
            .ok_or_else(|| JsValue::from_str("Storefront no está inicializado"))
    }

    /// Reenvía un evento a la UI JavaScript como CustomEvent en window
    fn dispatch(name: &str, detail: &JsValue) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };
        let init = web_sys::CustomEventInit::new();
        init.set_detail(detail);
        match web_sys::CustomEvent::new_with_event_init_dict(name, &init) {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(e) => log::error!("❌ [MAIN] No se pudo crear el evento {}: {:?}", name, e),
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let config = CONFIG.clone();
        if config.is_logging_enabled() {
            wasm_logger::init(wasm_logger::Config::default());
        }
        log::info!("🚀 Storefront client - sesión + carrito");

        let storefront = Rc::new(Storefront::browser(config));

        let session_sub = storefront.session().events().subscribe(|event| {
            let state = match event {
                SessionEvent::Authenticated(_) => "authenticated",
                SessionEvent::LoggedOut => "logged_out",
                SessionEvent::Invalidated => "invalidated",
            };
            dispatch("sessionChanged", &JsValue::from_str(state));
        });
        let cart_sub = storefront.cart().on_cart_changed(|change| {
            let detail = serde_json::to_string(change)
                .ok()
                .and_then(|json| js_sys::JSON::parse(&json).ok())
                .unwrap_or(JsValue::NULL);
            dispatch("cartChanged", &detail);
        });

        APP.with(|app| {
            *app.borrow_mut() = Some(App {
                storefront: storefront.clone(),
                _subscriptions: vec![session_sub, cart_sub],
            });
        });

        wasm_bindgen_futures::spawn_local(async move {
            storefront.start().await;
            dispatch("sessionReady", &JsValue::from_bool(storefront.session().is_authenticated()));
        });

        Ok(())
    }

    #[wasm_bindgen]
    pub async fn login(identifier: String, secret: String) -> Result<JsValue, JsValue> {
        let storefront = storefront()?;
        match storefront.session().login_with_credentials(&identifier, &secret).await {
            Ok(identity) => Ok(JsValue::from_str(&identity.username)),
            Err(e) => Err(JsValue::from_str(&e.user_message())),
        }
    }

    #[wasm_bindgen]
    pub fn adopt_external_token(raw: &str) -> bool {
        storefront()
            .map(|s| s.session().adopt_external_token(raw).is_some())
            .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn logout() {
        if let Ok(s) = storefront() {
            s.session().logout();
        }
    }

    #[wasm_bindgen]
    pub fn is_authenticated() -> bool {
        storefront().map(|s| s.session().is_authenticated()).unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn is_session_loading() -> bool {
        storefront().map(|s| s.session().is_loading()).unwrap_or(true)
    }

    #[wasm_bindgen]
    pub fn current_role() -> Option<String> {
        storefront().ok()?.session().current().map(|i| i.role)
    }

    /// `product_json` con la forma de ProductSnapshot
    #[wasm_bindgen]
    pub fn add_to_cart(product_json: &str, quantity: u32) -> Result<(), JsValue> {
        let product: ProductSnapshot = serde_json::from_str(product_json)
            .map_err(|e| JsValue::from_str(&format!("Producto inválido: {}", e)))?;
        storefront()?.cart().add_to_cart(&product, quantity);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn cart_count_skus() -> usize {
        storefront().map(|s| s.cart().cart_count_skus()).unwrap_or(0)
    }
}
