// ============================================================================
// SESSION STORE - Identidad actual, persistencia y slot de credencial HTTP
// ============================================================================
// Ciclo de vida: create → hydrate → (login | adopt | logout | invalidate)* → dispose
//
// Toda transición a "autenticado" pasa por `activate`, que escribe en el
// storage, en el slot HTTP y en memoria a la vez; toda salida pasa por
// `clear_all`. Credenciales malformadas o expiradas equivalen a "sin sesión".
// Se asume como mucho un login en vuelo por store.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::SessionConfig;
use crate::error::LoginError;
use crate::models::{Claims, Identity, IdentityHints};
use crate::services::{AuthApi, CredentialSlot};
use crate::state::reactivity::Observable;
use crate::utils::token_codec;
use crate::utils::{load_from_storage, remove_from_storage, save_to_storage, Clock, KeyValueStorage};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Authenticated(Identity),
    LoggedOut,
    /// El servidor rechazó una sesión que parecía válida
    Invalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Hydrating,
    Authenticated,
    Absent,
}

pub struct SessionStore {
    config: SessionConfig,
    storage: Rc<dyn KeyValueStorage>,
    auth_api: Rc<dyn AuthApi>,
    clock: Rc<dyn Clock>,
    credentials: CredentialSlot,
    identity: RefCell<Option<Identity>>,
    loading: Cell<bool>,
    events: Observable<SessionEvent>,
}

impl SessionStore {
    /// El store nace en estado "hydrating" hasta que termine `hydrate`
    pub fn new(
        config: SessionConfig,
        storage: Rc<dyn KeyValueStorage>,
        auth_api: Rc<dyn AuthApi>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            storage,
            auth_api,
            clock,
            credentials: CredentialSlot::new(),
            identity: RefCell::new(None),
            loading: Cell::new(true),
            events: Observable::new(),
        }
    }

    /// Restaura la sesión persistida. El registro se re-valida siempre.
    pub async fn hydrate(&self) -> Option<Identity> {
        self.loading.set(true);
        let restored = self.restore_persisted();

        match &restored {
            Some(identity) => {
                log::info!("💾 [SESSION] Sesión restaurada para {}", identity.username);
                self.activate(identity.clone());
            }
            None => self.clear_all(),
        }

        self.loading.set(false);
        restored
    }

    fn restore_persisted(&self) -> Option<Identity> {
        let key = self.config.storage_key.as_str();
        if !self.has_persisted_record() {
            log::debug!("🔍 [SESSION] Sin sesión persistida");
            return None;
        }

        let record: Identity = match load_from_storage(self.storage.as_ref(), key) {
            Some(record) => record,
            None => {
                log::warn!("⚠️ [SESSION] Registro persistido inválido, se descarta");
                return None;
            }
        };

        if self.validate(&record.token).is_none() {
            log::info!("⌛ [SESSION] Credencial persistida inválida o expirada");
            return None;
        }

        Some(Identity {
            role: record.role.to_uppercase(),
            ..record
        })
    }

    /// Login con el formulario. Un rechazo no toca el estado del store.
    pub async fn login_with_credentials(&self, identifier: &str, secret: &str) -> Result<Identity, LoginError> {
        log::info!("🔐 [SESSION] Iniciando login para {}", identifier);
        let response = self.auth_api.login(identifier, secret).await?;

        let claims = token_codec::decode(&response.token).ok_or_else(|| {
            log::warn!("⚠️ [SESSION] Token de login no decodificable");
            LoginError::InvalidToken
        })?;
        if token_codec::is_expired_with(&claims, self.clock.as_ref()) {
            log::warn!("⚠️ [SESSION] Token de login ya expirado");
            return Err(LoginError::ExpiredToken);
        }

        let identity = Identity::derive(&response.token, &claims, response.hints(), &self.config.default_username);
        self.activate(identity.clone());
        log::info!("✅ [SESSION] Login exitoso: {} ({})", identity.username, identity.role);
        Ok(identity)
    }

    /// Credencial llegada por otro canal (p.ej. redirección de un proveedor externo).
    /// Todo se deriva de los claims; si no es válida el estado no cambia.
    pub fn adopt_external_token(&self, raw: &str) -> Option<Identity> {
        let raw = raw.trim();
        let claims = self.validate(raw)?;
        let identity = Identity::derive(raw, &claims, IdentityHints::default(), &self.config.default_username);
        self.activate(identity.clone());
        log::info!("✅ [SESSION] Credencial externa adoptada: {}", identity.username);
        Some(identity)
    }

    pub fn logout(&self) {
        log::info!("👋 [SESSION] Logout");
        self.clear_all();
        self.events.emit(&SessionEvent::LoggedOut);
    }

    /// Cierre forzado tras un rechazo del servidor. Seguro de llamar varias veces.
    pub fn invalidate(&self) {
        let had_session = self.identity.borrow().is_some()
            || self.credentials.is_set()
            || self.has_persisted_record();
        self.clear_all();
        if had_session {
            log::warn!("🔒 [SESSION] Sesión invalidada por el servidor");
            self.events.emit(&SessionEvent::Invalidated);
        }
    }

    /// Termina el ciclo de vida: nadie más recibirá eventos
    pub fn dispose(&self) {
        self.events.clear();
    }

    fn validate(&self, raw: &str) -> Option<Claims> {
        let claims = token_codec::decode(raw)?;
        if token_codec::is_expired_with(&claims, self.clock.as_ref()) {
            return None;
        }
        Some(claims)
    }

    /// Si no se puede escribir el registro nuevo, el anterior no puede
    /// quedarse: el próximo hydrate resucitaría a otro usuario
    fn activate(&self, identity: Identity) {
        if let Err(e) = save_to_storage(self.storage.as_ref(), &self.config.storage_key, &identity) {
            log::warn!("⚠️ [SESSION] No se pudo persistir la sesión: {}", e);
            self.discard_persisted();
        }
        self.credentials.set(&identity.token);
        *self.identity.borrow_mut() = Some(identity.clone());
        self.events.emit(&SessionEvent::Authenticated(identity));
    }

    fn clear_all(&self) {
        self.discard_persisted();
        self.credentials.clear();
        *self.identity.borrow_mut() = None;
    }

    /// Borra el registro; si el borrado falla lo deja vacío, que hydrate descarta
    fn discard_persisted(&self) {
        let key = self.config.storage_key.as_str();
        if let Err(e) = remove_from_storage(self.storage.as_ref(), key) {
            log::warn!("⚠️ [SESSION] No se pudo borrar la sesión persistida: {}", e);
            if let Err(e) = self.storage.set_item(key, "") {
                log::error!("❌ [SESSION] La sesión persistida sigue en storage: {}", e);
            }
        }
    }

    /// Un valor vacío cuenta como ausente
    fn has_persisted_record(&self) -> bool {
        self.storage
            .get_item(&self.config.storage_key)
            .map(|content| !content.is_empty())
            .unwrap_or(false)
    }

    pub fn current(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.identity.borrow().as_ref().map(|i| i.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.borrow().is_some()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.identity
            .borrow()
            .as_ref()
            .map(|i| i.has_role(role))
            .unwrap_or(false)
    }

    /// true hasta que `hydrate` termina; los guards de ruta esperan a que baje
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else if self.loading.get() {
            SessionStatus::Hydrating
        } else {
            SessionStatus::Absent
        }
    }

    pub fn events(&self) -> &Observable<SessionEvent> {
        &self.events
    }

    pub fn credential_slot(&self) -> CredentialSlot {
        self.credentials.clone()
    }
}
