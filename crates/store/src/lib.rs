//! Entity store boundary for Quill.
//!
//! Defines the capability traits the posting and reversal engines persist
//! through, the store error taxonomy, and an in-memory reference backend.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::{
    AccountStore, DocumentStore, EntityStore, InventoryStore, JournalStore, ProductStore,
};
