use super::{Expression, Position};

/// Arithmetic operator verbs. `Add` doubles as string concatenation when
/// either operand is a String (see `loom::interpreter`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryVerb {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub verb: BinaryVerb,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub position: Position,
}

impl BinaryOp {
    pub fn new(verb: BinaryVerb, lhs: Expression, rhs: Expression, position: Position) -> Self {
        Self {
            verb,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            position,
        }
    }
}
