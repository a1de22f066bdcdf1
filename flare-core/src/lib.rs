mod category;
mod config;
mod geo;
mod model;
mod ranking;
mod viewport;

pub use category::*;
pub use config::*;
pub use geo::*;
pub use model::*;
pub use ranking::*;
pub use viewport::*;
