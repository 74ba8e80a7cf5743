//! Generate a supervisord configuration file from a flat option set.
//!
//! The pipeline is: `options` resolves settings, `lines` parses the program,
//! event listener, group and plugin blocks, `render` turns records into
//! sections, `assemble` orders them into one document and `install` writes
//! it out.

pub mod assemble;
pub mod error;
pub mod install;
pub mod lines;
pub mod options;
pub mod render;

pub use assemble::{Generation, generate};
pub use error::GenerateError;
pub use options::{OptionSet, RecipeContext};

pub type Result<T> = anyhow::Result<T>;
