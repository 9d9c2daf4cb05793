//! pinrank-store
//!
//! Pin store adapters: an in-memory snapshot store, a JSON file store, a
//! lookup budget wrapper, and the editor used to write pin configuration.

pub mod bounded;
pub mod editor;
pub mod json;
pub mod memory;

pub use bounded::BoundedPinStore;
pub use editor::{PinEditor, SaveOutcome};
pub use json::JsonPinStore;
pub use memory::MemoryPinStore;
