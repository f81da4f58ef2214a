pub mod artifact;
pub mod compile;
pub mod compose;
pub mod config;
pub mod error;
pub mod mcp;
pub mod merge;
pub mod paths;
pub mod source;
pub mod subst;
pub mod target;
pub mod writer;
pub mod yaml;

pub use compile::{compile, CompileOutput};
pub use error::{PackError, Result};
pub use target::GeneratedFile;
