pub mod cause;
pub mod config;
pub mod dimension;
pub mod error;
pub mod input;
pub mod point;

pub use cause::*;
pub use config::{LocalizerConfig, ScoreBounds};
pub use dimension::*;
pub use error::*;
pub use input::*;
pub use point::*;
