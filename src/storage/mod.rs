//! Durable client storage: the key-value port, its backends, the persisted
//! venue selection and the per-profile context registry.

pub mod file;
pub mod kv;
pub mod registry;
pub mod venue_context;

pub use file::FileKeyValue;
pub use kv::{KeyValuePort, MemoryKeyValue, ProfileStorage, StorageError};
pub use registry::{ContextRegistry, ProfileContext, RegistryLimits};
pub use venue_context::{SELECTION_NAMESPACE, SelectionRecord, Subscription, VenueContextStore};
