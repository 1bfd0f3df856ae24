//! CLI command handlers. Each command is in its own file.

mod completions;
mod emit;
mod serve;
mod validate;

pub use completions::run_completions;
pub use emit::{parse_var, run_emit};
pub use serve::run_serve;
pub use validate::run_validate;
