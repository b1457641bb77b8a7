/// Ubicación actual de la app (ruta + query, sin host)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub search: String,
}

impl Location {
    pub fn new(path: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            search: search.into(),
        }
    }

    /// `path` seguido de la query, tal como se reanudará tras el login
    pub fn full_path(&self) -> String {
        if self.search.is_empty() || self.search == "?" {
            self.path.clone()
        } else if self.search.starts_with('?') {
            format!("{}{}", self.path, self.search)
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}

/// Navegación de la UI, consumida solo a través de esta interfaz
pub trait Navigator {
    fn current_location(&self) -> Location;
    fn navigate(&self, url: &str);
}

/// Construye `<login_route>?reason=<code>&redirect=<ruta original codificada>`
pub fn login_redirect_url(login_route: &str, reason: &str, from: &Location) -> String {
    format!(
        "{}?reason={}&redirect={}",
        login_route,
        urlencoding::encode(reason),
        urlencoding::encode(&from.full_path())
    )
}

/// Compara rutas ignorando la barra final y mayúsculas
pub fn is_same_route(path: &str, route: &str) -> bool {
    let normalize = |p: &str| {
        let trimmed = p.trim_end_matches('/');
        if trimmed.is_empty() { "/".to_string() } else { trimmed.to_ascii_lowercase() }
    };
    normalize(path) == normalize(route)
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserNavigator;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{Location, Navigator};
    use web_sys::window;

    /// window.location
    #[derive(Clone, Copy, Default)]
    pub struct BrowserNavigator;

    impl Navigator for BrowserNavigator {
        fn current_location(&self) -> Location {
            let location = match window() {
                Some(w) => w.location(),
                None => return Location::default(),
            };
            Location {
                path: location.pathname().unwrap_or_default(),
                search: location.search().unwrap_or_default(),
            }
        }

        fn navigate(&self, url: &str) {
            if let Some(w) = window() {
                if let Err(e) = w.location().assign(url) {
                    log::error!("❌ [NAV] No se pudo navegar a {}: {:?}", url, e);
                }
            }
        }
    }
}
