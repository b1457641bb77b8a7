pub mod auth_service;
pub mod http_client;
pub mod navigator;
pub mod transport;

pub use auth_service::{AuthApi, AuthService};
pub use http_client::{CredentialSlot, HttpClient};
pub use navigator::{Location, Navigator};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};

#[cfg(target_arch = "wasm32")]
pub use navigator::BrowserNavigator;
#[cfg(target_arch = "wasm32")]
pub use transport::FetchTransport;
