mod types;
mod commands;
mod handlers;
mod error;
mod state;
mod clock;
mod config;
mod services;

pub use types::*;
pub use commands::*;
pub use handlers::*;
pub use error::*;
pub use state::*;
pub use clock::*;
pub use config::*;
pub use services::*;
