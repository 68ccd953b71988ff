//! One module per subcommand, each exposing an `execute` function.

pub mod completions;
pub mod create;
pub mod purge;
pub mod reveal;
pub mod version;
