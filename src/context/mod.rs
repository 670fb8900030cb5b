mod error;
mod lock;
mod model;
mod paths;
mod registry;
mod server;
mod service;
mod store;

pub use error::*;
pub use lock::ConfigLock;
pub use model::*;
pub use paths::*;
pub use server::Server;
pub use service::*;
pub use store::{load, write};
