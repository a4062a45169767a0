pub mod codegen;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod header;
pub mod ir;
pub mod matcher;
pub mod properties;
pub mod tokenize;
pub mod tree;

pub use error::{Error, Result};
pub use tree::parse_dump;

/// Variable and kernel names declared at the top level of a dump.
pub fn declarations(dump: &str) -> (Vec<String>, Vec<String>) {
    // Stages 0+1
    let root = tree::parse_dump(dump);

    // Stage 2
    let decls = extract::extract_all(&root);
    (decls.variable_names(), decls.kernel_names())
}
