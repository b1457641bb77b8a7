use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub session: SessionConfig,
    pub http: HttpConfig,
    pub cart: CartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:8080/api".to_string(),
            backend_url_production: "https://api.tienda.example/api".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            session: SessionConfig::default(),
            http: HttpConfig::default(),
            cart: CartConfig::default(),
        }
    }
}

/// Persistencia y derivación de la identidad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub storage_key: String,
    pub login_path: String,
    pub default_username: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "auth".to_string(),
            login_path: "/auth/login".to_string(),
            default_username: "Usuario".to_string(),
        }
    }
}

/// Credencial saliente y reacción ante respuestas no autenticadas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub auth_header: String,
    pub auth_scheme: String,
    pub unauthorized_status: u16,
    /// Fragmentos de ruta (login, registro, intercambio externo, refresh) que no disparan el cierre de sesión
    pub auth_surface_paths: Vec<String>,
    pub login_route: String,
    pub redirect_reason: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            auth_header: "Authorization".to_string(),
            auth_scheme: "Bearer".to_string(),
            unauthorized_status: 401,
            auth_surface_paths: vec![
                "/auth/login".to_string(),
                "/auth/register".to_string(),
                "/auth/oauth".to_string(),
                "/auth/refresh".to_string(),
            ],
            login_route: "/login".to_string(),
            redirect_reason: "expired".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    pub storage_key: String,
    pub persist: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: "cart".to_string(),
            persist: true,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let http_defaults = HttpConfig::default();

        Self {
            backend_url_development: option_env!("STOREFRONT_BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("STOREFRONT_BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("STOREFRONT_ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("STOREFRONT_ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            session: SessionConfig {
                storage_key: option_env!("STOREFRONT_SESSION_STORAGE_KEY")
                    .unwrap_or("auth").to_string(),
                login_path: option_env!("STOREFRONT_LOGIN_PATH")
                    .unwrap_or("/auth/login").to_string(),
                default_username: option_env!("STOREFRONT_DEFAULT_USERNAME")
                    .unwrap_or("Usuario").to_string(),
            },
            http: HttpConfig {
                auth_header: option_env!("STOREFRONT_AUTH_HEADER")
                    .unwrap_or("Authorization").to_string(),
                auth_scheme: option_env!("STOREFRONT_AUTH_SCHEME")
                    .unwrap_or("Bearer").to_string(),
                unauthorized_status: option_env!("STOREFRONT_UNAUTHORIZED_STATUS")
                    .unwrap_or("401").parse().unwrap_or(401),
                auth_surface_paths: option_env!("STOREFRONT_AUTH_SURFACE_PATHS")
                    .map(parse_list)
                    .unwrap_or(http_defaults.auth_surface_paths),
                login_route: option_env!("STOREFRONT_LOGIN_ROUTE")
                    .unwrap_or("/login").to_string(),
                redirect_reason: option_env!("STOREFRONT_REDIRECT_REASON")
                    .unwrap_or("expired").to_string(),
            },
            cart: CartConfig {
                storage_key: option_env!("STOREFRONT_CART_STORAGE_KEY")
                    .unwrap_or("cart").to_string(),
                persist: option_env!("STOREFRONT_CART_PERSIST")
                    .unwrap_or("true").parse().unwrap_or(true),
            },
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
