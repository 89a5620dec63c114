//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns an expression AST.
//! - `ast` is the tree shared by the parser and the code generator.
//! - `codegen` lowers the tree into AArch64 or x86-64 assembly.
//! - `error` holds the caret diagnostics shared by the other modules.
//! - `config` selects the output target.

pub mod ast;
pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;
pub mod tokenizer;

pub use config::{Config, ConfigError, Target};
pub use error::{CompileError, CompileResult, ErrorKind};

/// Compile a source string into assembly for the host architecture.
pub fn generate_assembly(expr: &str) -> CompileResult<String> {
  generate_assembly_for(expr, Target::host())
}

/// Compile a source string into a complete program for `target`.
pub fn generate_assembly_for(expr: &str, target: Target) -> CompileResult<String> {
  let tokens = tokenizer::tokenize(expr)?;
  log::debug!("tokenized {} tokens", tokens.len());
  let node = parser::parse(tokens, expr)?;
  log::debug!("parsed {} nodes: {node}", node.node_count());
  Ok(codegen::generate(&node, target))
}
