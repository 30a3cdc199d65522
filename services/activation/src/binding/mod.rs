//! Per-code device bindings and the stores that hold them.

pub mod memory;
pub mod model;
pub mod redis;
pub mod store;

pub use memory::MemoryBindingStore;
pub use model::{Binding, binding_key};
pub use self::redis::RedisBindingStore;
pub use store::{BindOutcome, BindingStore};
