/// Session identity module - Gateway

mod identity;
mod storage;

pub use identity::{SessionId, SessionIdentity};
pub use storage::{MemoryStorage, TabStorage};
