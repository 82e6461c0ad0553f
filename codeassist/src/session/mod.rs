mod memory;
mod registry;
mod state;
mod store;

pub use memory::MemoryStore;
pub use registry::SessionRegistry;
pub use state::SessionState;
pub use store::SessionStore;
