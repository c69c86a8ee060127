use crate::{ExprKind, ExprNode};

/// Value the generated program leaves in `rax`.
///
/// Arithmetic wraps at 64 bits like the emitted `add`/`sub`/`imul`, and
/// division truncates toward zero like `idiv`. Returns `None` where `idiv`
/// would fault: a zero divisor, or `i64::MIN / -1`.
pub fn eval(node: &ExprNode) -> Option<i64> {
    match node.kind {
        ExprKind::Number(val) => Some(val),
        ExprKind::Add(ref lhs, ref rhs) => Some(eval(lhs)?.wrapping_add(eval(rhs)?)),
        ExprKind::Sub(ref lhs, ref rhs) => Some(eval(lhs)?.wrapping_sub(eval(rhs)?)),
        ExprKind::Mul(ref lhs, ref rhs) => Some(eval(lhs)?.wrapping_mul(eval(rhs)?)),
        ExprKind::Div(ref lhs, ref rhs) => eval(lhs)?.checked_div(eval(rhs)?),
    }
}
