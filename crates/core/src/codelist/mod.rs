//! Vendor reference data: code lists, item classifications and search
//! results mirrored into local tables.

pub mod store;
pub mod sync;
pub mod types;

pub use store::MirrorStore;
pub use sync::{CodeListSync, SyncReport};
pub use types::{CodeCategory, ItemClassification, MirrorKind, MirrorRecord, ReferenceCode};
