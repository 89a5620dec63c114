//! Diagnostics shared across the compilation pipeline.
//!
//! Every failure carries the original input and a byte offset so the driver
//! can print the offending line with a caret under the failing character,
//! chibicc style. The core never exits the process; it hands the error back
//! and lets `main` decide what to do with it.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

/// The two classes of fatal diagnostics the front-end produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Lexical,
  Syntax,
}

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// A character the tokenizer does not recognise, or a literal it cannot hold.
  #[snafu(display("{}", render(input, *loc, message)))]
  Lexical {
    input: String,
    loc: usize,
    message: String,
  },

  /// The token sequence does not match the grammar.
  #[snafu(display("{}", render(input, *loc, message)))]
  Syntax {
    input: String,
    loc: usize,
    message: String,
  },
}

impl CompileError {
  /// Construct a lexical error anchored at a byte offset in the source.
  pub fn lexical(input: &str, loc: usize, message: impl Into<String>) -> Self {
    LexicalSnafu {
      input,
      loc: loc.min(input.len()),
      message: message.into(),
    }
    .build()
  }

  /// Construct a syntax error anchored at a byte offset in the source.
  pub fn syntax(input: &str, loc: usize, message: impl Into<String>) -> Self {
    SyntaxSnafu {
      input,
      loc: loc.min(input.len()),
      message: message.into(),
    }
    .build()
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Lexical { .. } => ErrorKind::Lexical,
      Self::Syntax { .. } => ErrorKind::Syntax,
    }
  }

  /// Byte offset of the offending character.
  pub fn offset(&self) -> usize {
    match self {
      Self::Lexical { loc, .. } | Self::Syntax { loc, .. } => *loc,
    }
  }

  pub fn message(&self) -> &str {
    match self {
      Self::Lexical { message, .. } | Self::Syntax { message, .. } => message,
    }
  }
}

/// Lay out the input line, then a caret line aligned to `loc`.
fn render(input: &str, loc: usize, message: &str) -> String {
  let safe_loc = loc.min(input.len());
  // Columns are counted in characters so multi-byte input still lines up.
  let column = input
    .get(..safe_loc)
    .map_or(safe_loc, |prefix| prefix.chars().count());
  format!("{input}\n{}^ {message}", " ".repeat(column))
}
