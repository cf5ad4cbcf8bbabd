pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod recommendation;
pub mod sentiment;
pub mod server;

pub use error::{Error, Result};
