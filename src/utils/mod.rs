// Utils compartidos

pub mod clock;
pub mod storage;
pub mod token_codec;

pub use clock::{Clock, FixedClock, SystemClock};
pub use storage::{load_from_storage, remove_from_storage, save_to_storage, KeyValueStorage, MemoryStorage};
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorage;
