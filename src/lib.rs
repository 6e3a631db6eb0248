pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod schema;

pub use config::{Cli, Config};
pub use error::Error;
pub use pipeline::{run, Outcome, Summary};
