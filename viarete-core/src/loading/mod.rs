//! This module is responsible for loading area boundaries and for the
//! seam to external street-network suppliers.

mod boundary;
mod config;
mod source;

pub use boundary::AreaBoundary;
pub use config::PipelineConfig;
pub use source::{NetworkSource, NetworkType};
