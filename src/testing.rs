// Dobles de prueba compartidos por los tests de cada módulo

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use futures::future::{ready, FutureExt, LocalBoxFuture};
use serde_json::Value;

use crate::error::{LoginError, StorageError, TransportError};
use crate::models::LoginResponse;
use crate::services::{AuthApi, HttpRequest, HttpResponse, Location, Navigator, Transport};
use crate::utils::{KeyValueStorage, MemoryStorage};

/// Credencial firmada de mentira con `exp` fijado
pub fn token_expiring_at(payload: Value, exp_seconds: i64) -> String {
    let mut payload = payload;
    if let Value::Object(fields) = &mut payload {
        fields.insert("exp".to_string(), Value::from(exp_seconds));
    }
    crate::utils::token_codec::encode_for_test(&payload)
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub fn push_failure(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::Send(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, TransportError>> {
        self.requests.borrow_mut().push(request);
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Send("sin respuesta programada".to_string())));
        ready(next).boxed_local()
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    location: Rc<RefCell<Location>>,
    visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn at(location: Location) -> Self {
        Self {
            location: Rc::new(RefCell::new(location)),
            visits: Rc::default(),
        }
    }

    /// Simula que el usuario cambia de página sin recargar
    pub fn go_to(&self, location: Location) {
        *self.location.borrow_mut() = location;
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn navigate(&self, url: &str) {
        self.visits.borrow_mut().push(url.to_string());
    }
}

#[derive(Clone, Default)]
pub struct ScriptedAuthApi {
    results: Rc<RefCell<VecDeque<Result<LoginResponse, LoginError>>>>,
    calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl ScriptedAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: Result<LoginResponse, LoginError>) {
        self.results.borrow_mut().push_back(result);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl AuthApi for ScriptedAuthApi {
    fn login<'a>(&'a self, identifier: &'a str, secret: &'a str)
        -> LocalBoxFuture<'a, Result<LoginResponse, LoginError>>
    {
        self.calls
            .borrow_mut()
            .push((identifier.to_string(), secret.to_string()));
        let next = self
            .results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(LoginError::Network("sin respuesta programada".to_string())));
        ready(next).boxed_local()
    }
}

/// Storage que rechaza toda escritura (cuota llena, modo privado)
pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("QuotaExceededError".to_string()))
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Storage en memoria cuyas escrituras o borrados se pueden hacer fallar
#[derive(Clone, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: Rc<Cell<bool>>,
    fail_removes: Rc<Cell<bool>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.set(fail);
    }
}

impl KeyValueStorage for FlakyStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Write("QuotaExceededError".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_removes.get() {
            return Err(StorageError::Unavailable);
        }
        self.inner.remove_item(key)
    }
}
