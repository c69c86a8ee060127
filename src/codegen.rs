use std::fmt::Display;

use crate::{ExprKind, ExprNode};

/// Lowers a tree into stack-machine style x86-64 assembly: every literal is
/// pushed, every operator pops its two operands and pushes its result.
pub struct Codegen<'a> {
    pub node: &'a ExprNode,
    pub asm: String,
    pub depth: i64,
}

pub fn generate(node: &ExprNode) -> String {
    Codegen::new(node).program()
}

impl<'a> Codegen<'a> {
    pub fn new(node: &'a ExprNode) -> Self {
        Self {
            node,
            asm: String::new(),
            depth: 0,
        }
    }

    pub fn program(mut self) -> String {
        self.emit(".intel_syntax noprefix");
        self.emit(".globl main");
        self.emit("main:");
        let node = self.node;
        self.expr(node);
        self.pop("rax");
        self.emit("  ret");

        assert!(self.depth == 0, "unbalanced operand stack");
        self.asm
    }

    fn emit(&mut self, line: &str) {
        self.asm.push_str(line);
        self.asm.push('\n');
    }

    fn push(&mut self, operand: impl Display) {
        self.emit(&format!("  push {}", operand));
        self.depth += 1;
    }

    fn pop(&mut self, arg: &str) {
        self.emit(&format!("  pop {}", arg));
        self.depth -= 1;
    }

    // push only takes a sign-extended 32-bit immediate
    fn number(&mut self, val: i64) {
        if i32::try_from(val).is_ok() {
            self.push(val);
        } else {
            self.emit(&format!("  mov rax, {}", val));
            self.push("rax");
        }
    }

    fn operands(&mut self, lhs: &ExprNode, rhs: &ExprNode) {
        self.expr(lhs);
        self.expr(rhs);
        self.pop("rdi");
        self.pop("rax");
    }

    fn expr(&mut self, node: &ExprNode) {
        match node.kind {
            ExprKind::Number(val) => self.number(val),
            ExprKind::Add(ref lhs, ref rhs) => {
                self.operands(lhs, rhs);
                self.emit("  add rax, rdi");
                self.push("rax");
            }
            ExprKind::Sub(ref lhs, ref rhs) => {
                self.operands(lhs, rhs);
                self.emit("  sub rax, rdi");
                self.push("rax");
            }
            ExprKind::Mul(ref lhs, ref rhs) => {
                self.operands(lhs, rhs);
                self.emit("  imul rax, rdi");
                self.push("rax");
            }
            ExprKind::Div(ref lhs, ref rhs) => {
                self.operands(lhs, rhs);
                self.emit("  cqo");
                self.emit("  idiv rdi");
                self.push("rax");
            }
        };
    }
}
