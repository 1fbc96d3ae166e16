//! Configuration file handling for `parcelmap.ini`.
//!
//! Settings structs live in [`settings`], constants in [`defaults`], parsing
//! in `parser` and serialization in `writer`. A missing file yields the
//! defaults.
//!
//! # Example
//!
//! ```
//! use parcelmap::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let layout = config.layout().unwrap();
//! assert_eq!(layout.grid_size(), 38);
//! assert_eq!(layout.offset(), 13);
//! ```

pub mod defaults;
mod file;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{default_config_path, ConfigFileError};
pub use settings::{BuildSettings, ConfigFile, GridSettings, LoggingSettings, PathSettings};
