//! Recursive-descent parser producing an expression AST.
//!
//! Precedence is encoded by grammar layering:
//!
//! ```text
//! expr    = mul ("+" mul | "-" mul)*
//! mul     = primary ("*" primary | "/" primary)*
//! primary = "(" expr ")" | num
//! ```
//!
//! Each loop folds the next operand onto the tree built so far as the new
//! left child, so equal-precedence chains lean left.

use crate::ast::{AstNode, BinaryOp};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Parse a whole expression; every token up to `Eof` must be consumed.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::syntax(source, 0, "expression is empty"));
  }

  let node = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let token = stream.peek().ok_or_else(|| {
      CompileError::syntax(source, source.len(), "unexpected end of input after expression")
    })?;
    let got = describe_token(Some(token), source);
    return Err(CompileError::syntax(
      source,
      token.loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  log::trace!("parsed {node}");
  Ok(node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_mul(stream)?;

  loop {
    let op = if stream.equal("+") {
      BinaryOp::Add
    } else if stream.equal("-") {
      BinaryOp::Sub
    } else {
      return Ok(node);
    };

    let rhs = parse_mul(stream)?;
    node = AstNode::binary(op, node, rhs);
  }
}

fn parse_mul(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_primary(stream)?;

  loop {
    let op = if stream.equal("*") {
      BinaryOp::Mul
    } else if stream.equal("/") {
      BinaryOp::Div
    } else {
      return Ok(node);
    };

    let rhs_loc = stream.loc();
    let rhs = parse_primary(stream)?;
    if op == BinaryOp::Div && rhs == AstNode::number(0) {
      return Err(CompileError::syntax(stream.source, rhs_loc, "division by zero"));
    }
    node = AstNode::binary(op, node, rhs);
  }
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<AstNode> {
  if stream.equal("(") {
    let node = parse_expr(stream)?;
    stream.skip(")")?;
    return Ok(node);
  }

  let value = stream.get_number()?;
  Ok(AstNode::number(value))
}

/// Cursor over the token vector. `pos` only moves forward.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  /// Offset of the current token, or end of input.
  fn loc(&self) -> usize {
    self.peek().map_or(self.source.len(), |token| token.loc)
  }

  /// Consume the current token if it matches the provided punctuator.
  fn equal(&mut self, op: &str) -> bool {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Punctuator
      && token_text(token, self.source) == op
    {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, s: &str) -> CompileResult<()> {
    if self.equal(s) {
      return Ok(());
    }
    let got = describe_token(self.peek(), self.source);
    Err(CompileError::syntax(
      self.source,
      self.loc(),
      format!("expected \"{s}\", but got \"{got}\""),
    ))
  }

  /// Consume an integer literal, returning its value.
  fn get_number(&mut self) -> CompileResult<i64> {
    let Some(token) = self.peek() else {
      return Err(CompileError::syntax(
        self.source,
        self.source.len(),
        "expected a number, but reached end of input",
      ));
    };

    if token.kind == TokenKind::Num {
      let loc = token.loc;
      let value = token.value.ok_or_else(|| {
        CompileError::syntax(self.source, loc, "internal error: numeric token missing value")
      })?;
      self.pos += 1;
      return Ok(value);
    }

    let got = describe_token(Some(token), self.source);
    Err(CompileError::syntax(
      self.source,
      token.loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek().map(|token| token.kind), Some(TokenKind::Eof))
  }
}
