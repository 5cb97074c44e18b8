//! Per-format adapters for reading and writing native configuration files.

mod claude;
mod cline;
mod cursor;
pub(crate) mod mcp;
mod opencode;
pub mod traits;
pub(crate) mod utils;
mod windsurf;

pub use claude::ClaudeCodeAdapter;
pub use cline::ClineAdapter;
pub use cursor::CursorAdapter;
pub use opencode::OpenCodeAdapter;
pub use traits::{FieldSupport, FormatAdapter};
pub use windsurf::WindsurfAdapter;
