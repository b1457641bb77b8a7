// ============================================================================
// STATE MODULE - Stores con Rc<RefCell> + notificaciones
// ============================================================================

pub mod cart_store;
pub mod reactivity;
pub mod session_store;

pub use cart_store::CartStore;
pub use reactivity::{Observable, Subscription};
pub use session_store::{SessionEvent, SessionStatus, SessionStore};
