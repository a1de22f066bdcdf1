mod cache;
mod events;
mod location;
mod refresh;
mod storage;
mod store;
mod task;

#[cfg(test)]
mod mock;

pub use cache::*;
pub use events::*;
pub use location::*;
pub use refresh::*;
pub use storage::*;
pub use store::*;
pub use task::*;
