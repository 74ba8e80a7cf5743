//! Line grammars for the program, event listener, group and plugin blocks.

pub mod parse;
pub mod record;
pub mod scan;

pub use parse::{LineGrammar, LineKind, parse_block, parse_line};
pub use record::{EventListenerSpec, Extras, GroupSpec, PluginSpec, ProgramSpec};
