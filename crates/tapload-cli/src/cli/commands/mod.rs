//! CLI command handlers. Each command is in its own file.

mod check;
mod extract;

pub use check::run_check;
pub use extract::{run_extract, ExtractOptions};
