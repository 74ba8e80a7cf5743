//! Section renderers. Every function here is pure: a typed record in, a
//! `Section` out.

pub mod process;
pub mod section;
pub mod supervisord;

pub use section::{Document, Section};
