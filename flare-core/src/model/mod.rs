mod flare;
mod lenient;
mod place;
mod user;

pub use flare::*;
pub use place::*;
pub use user::*;

/// The type the backend uses for primary keys.
pub type PrimaryKey = u32;
