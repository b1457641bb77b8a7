pub mod auth;
pub mod cart;
pub mod claims;
pub mod identity;

pub use auth::{ErrorInfo, LoginRequest, LoginResponse};
pub use cart::{CartAction, CartChange, CartEntry, ProductSnapshot};
pub use claims::Claims;
pub use identity::{Identity, IdentityHints, IdentityId};
