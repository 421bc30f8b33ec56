pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::EarningsPipeline};
pub use utils::error::{EtlError, Result};
