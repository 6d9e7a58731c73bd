//! Document storage and the typed stores built on it.

mod document;
mod entries;
mod events;
mod local;
mod membership;

pub use document::{Document, DocumentStore, MemoryStore};
pub use entries::EntryStore;
pub use events::EventStore;
pub use local::LocalStore;
pub use membership::{AdminDirectory, AdminRecord, MembershipStore};
