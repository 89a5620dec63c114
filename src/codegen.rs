//! Code generation: lower the parsed AST into assembly text.
//!
//! The emitter is a stack machine. Every subtree leaves exactly one value on
//! the machine stack: literals push their constant, binary nodes pop the right
//! operand into the second register, the left operand into the first, combine
//! them into the first register and push the result. The epilogue pops the
//! single remaining value into the return register.
//!
//! Two targets are supported. AArch64 keeps `sp` 16-byte aligned by giving
//! each slot 16 bytes; x86-64 uses plain `push`/`pop`.

use crate::ast::{AstNode, BinaryOp};
use crate::config::Target;

/// Instruction listing for an expression, without preamble or epilogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
  pub body: String,
  pub instructions: usize,
  pub pushes: usize,
  pub pops: usize,
}

/// Emit a complete program: entry-point preamble, body, epilogue.
pub fn generate(node: &AstNode, target: Target) -> String {
  let listing = generate_body(node, target);
  let mut asm = String::new();
  asm.push_str(preamble(target));
  asm.push_str(&listing.body);
  asm.push_str(epilogue(target));
  asm.push_str(stack_note());
  asm
}

/// Emit the stack-machine code for `node` alone.
pub fn generate_body(node: &AstNode, target: Target) -> Listing {
  let mut cg = CodeGen::new(target);
  cg.emit_expr(node);
  debug_assert_eq!(cg.depth, 1, "expression must leave one value on the stack");
  log::debug!(
    "emitted {} instructions for {} ({} pushes, {} pops)",
    cg.instructions,
    target,
    cg.pushes,
    cg.pops
  );
  Listing {
    body: cg.asm,
    instructions: cg.instructions,
    pushes: cg.pushes,
    pops: cg.pops,
  }
}

/// Declares the global entry point.
pub fn preamble(target: Target) -> &'static str {
  match target {
    Target::Aarch64 => ".globl main\nmain:\n",
    Target::X86_64 => ".global main\nmain:\n",
  }
}

/// Pops the final value into the return register and returns.
pub fn epilogue(target: Target) -> &'static str {
  match target {
    Target::Aarch64 => "    ldr x0, [sp], #16\n    ret\n",
    Target::X86_64 => "    pop %rax\n    ret\n",
  }
}

/// Marks the stack non-executable so ELF linkers do not warn.
pub fn stack_note() -> &'static str {
  ".section .note.GNU-stack,\"\",%progbits\n"
}

/// Which scratch register an operand is popped into.
#[derive(Debug, Clone, Copy)]
enum Reg {
  First,
  Second,
}

struct CodeGen {
  target: Target,
  asm: String,
  depth: usize,
  instructions: usize,
  pushes: usize,
  pops: usize,
}

impl CodeGen {
  fn new(target: Target) -> Self {
    Self {
      target,
      asm: String::new(),
      depth: 0,
      instructions: 0,
      pushes: 0,
      pops: 0,
    }
  }

  fn emit(&mut self, insn: &str) {
    self.asm.push_str("    ");
    self.asm.push_str(insn);
    self.asm.push('\n');
    self.instructions += 1;
  }

  fn emit_expr(&mut self, node: &AstNode) {
    match node {
      AstNode::Num { value } => {
        self.load_imm(*value);
        self.push();
      }
      AstNode::Binary { op, lhs, rhs } => {
        self.emit_expr(lhs);
        self.emit_expr(rhs);
        self.pop(Reg::Second);
        self.pop(Reg::First);
        self.emit_op(*op);
        self.push();
      }
    }
  }

  /// Load a constant into the first register.
  fn load_imm(&mut self, value: i64) {
    match self.target {
      Target::Aarch64 => {
        if (0..=0xffff).contains(&value) {
          self.emit(&format!("mov x0, #{value}"));
          return;
        }
        // Wider constants do not fit a move immediate; build them 16 bits at a time.
        let bits = value as u64;
        self.emit(&format!("movz x0, #{}", bits & 0xffff));
        for shift in [16, 32, 48] {
          let chunk = (bits >> shift) & 0xffff;
          if chunk != 0 {
            self.emit(&format!("movk x0, #{chunk}, lsl #{shift}"));
          }
        }
      }
      Target::X86_64 => self.emit(&format!("mov ${value}, %rax")),
    }
  }

  fn push(&mut self) {
    match self.target {
      Target::Aarch64 => self.emit("str x0, [sp, #-16]!"),
      Target::X86_64 => self.emit("push %rax"),
    }
    self.depth += 1;
    self.pushes += 1;
  }

  fn pop(&mut self, reg: Reg) {
    let insn = match (self.target, reg) {
      (Target::Aarch64, Reg::First) => "ldr x0, [sp], #16",
      (Target::Aarch64, Reg::Second) => "ldr x1, [sp], #16",
      (Target::X86_64, Reg::First) => "pop %rax",
      (Target::X86_64, Reg::Second) => "pop %rdi",
    };
    self.emit(insn);
    self.depth -= 1;
    self.pops += 1;
  }

  /// Combine first (left) and second (right) registers into the first.
  fn emit_op(&mut self, op: BinaryOp) {
    match self.target {
      Target::Aarch64 => match op {
        BinaryOp::Add => self.emit("add x0, x0, x1"),
        BinaryOp::Sub => self.emit("sub x0, x0, x1"),
        BinaryOp::Mul => self.emit("mul x0, x0, x1"),
        BinaryOp::Div => self.emit("sdiv x0, x0, x1"),
      },
      Target::X86_64 => match op {
        BinaryOp::Add => self.emit("add %rdi, %rax"),
        BinaryOp::Sub => self.emit("sub %rdi, %rax"),
        BinaryOp::Mul => self.emit("imul %rdi, %rax"),
        BinaryOp::Div => {
          self.emit("cqo");
          self.emit("idiv %rdi");
        }
      },
    }
  }
}
