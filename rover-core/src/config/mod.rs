//! Configuration
//!
//! Board-agnostic tunables loaded from the firmware's embedded `rover.toml`.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
