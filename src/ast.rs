//! Expression tree shared by the parser and the code generator.
//!
//! Binary nodes own both children outright, so the whole tree is owned by its
//! root and dropped with it. Nodes are never mutated after construction.

use std::fmt;

/// Binary operators recognised by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl BinaryOp {
  pub fn symbol(self) -> char {
    match self {
      Self::Add => '+',
      Self::Sub => '-',
      Self::Mul => '*',
      Self::Div => '/',
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
  Num {
    value: i64,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: i64) -> Self {
    Self::Num { value }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  /// Evaluate the tree the way the generated code does: 64-bit wrapping
  /// arithmetic, division truncating toward zero. `None` when a division has
  /// no portable result: a zero divisor, or `i64::MIN / -1`.
  pub fn eval(&self) -> Option<i64> {
    match self {
      Self::Num { value } => Some(*value),
      Self::Binary { op, lhs, rhs } => {
        let (l, r) = (lhs.eval()?, rhs.eval()?);
        match op {
          BinaryOp::Add => Some(l.wrapping_add(r)),
          BinaryOp::Sub => Some(l.wrapping_sub(r)),
          BinaryOp::Mul => Some(l.wrapping_mul(r)),
          BinaryOp::Div => l.checked_div(r),
        }
      }
    }
  }

  /// Number of nodes in the tree.
  pub fn node_count(&self) -> usize {
    match self {
      Self::Num { .. } => 1,
      Self::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
    }
  }

}

/// Prefix rendering, e.g. `(+ 1 (* 2 3))`. Used in logs and tests.
impl fmt::Display for AstNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Num { value } => write!(f, "{value}"),
      Self::Binary { op, lhs, rhs } => write!(f, "({} {lhs} {rhs})", op.symbol()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bin(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> AstNode {
    AstNode::binary(op, lhs, rhs)
  }

  #[test]
  fn eval_respects_operand_order() {
    let sub = bin(BinaryOp::Sub, AstNode::number(10), AstNode::number(3));
    assert_eq!(sub.eval(), Some(7));
    let div = bin(BinaryOp::Div, AstNode::number(7), AstNode::number(2));
    assert_eq!(div.eval(), Some(3));
  }

  #[test]
  fn division_truncates_toward_zero() {
    let neg = bin(BinaryOp::Sub, AstNode::number(0), AstNode::number(7));
    let div = bin(BinaryOp::Div, neg, AstNode::number(2));
    assert_eq!(div.eval(), Some(-3));
  }

  #[test]
  fn zero_divisor_has_no_value() {
    let zero = bin(BinaryOp::Sub, AstNode::number(1), AstNode::number(1));
    let div = bin(BinaryOp::Div, AstNode::number(1), zero);
    assert_eq!(div.eval(), None);
  }

  #[test]
  fn min_over_minus_one_has_no_value() {
    let min = bin(BinaryOp::Sub, AstNode::number(0), AstNode::number(i64::MAX));
    let min = bin(BinaryOp::Sub, min, AstNode::number(1));
    let minus_one = bin(BinaryOp::Sub, AstNode::number(0), AstNode::number(1));
    assert_eq!(min.eval(), Some(i64::MIN));
    assert_eq!(bin(BinaryOp::Div, min, minus_one).eval(), None);
  }

  #[test]
  fn overflow_wraps() {
    let add = bin(BinaryOp::Add, AstNode::number(i64::MAX), AstNode::number(1));
    assert_eq!(add.eval(), Some(i64::MIN));
  }

  #[test]
  fn display_is_prefix() {
    let tree = bin(
      BinaryOp::Add,
      AstNode::number(1),
      bin(BinaryOp::Mul, AstNode::number(2), AstNode::number(3)),
    );
    assert_eq!(tree.to_string(), "(+ 1 (* 2 3))");
    assert_eq!(tree.node_count(), 5);
  }
}
