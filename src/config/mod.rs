//! Configuration
//!
//! Tunable flow policy with layered loading: built-in defaults, global and
//! project TOML files, and `SCALEFLOW_*` environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{FlowConfig, SelectionConfig};
