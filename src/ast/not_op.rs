use super::{Expression, Position};

/// Prefix `Not`.
#[derive(Debug, Clone, PartialEq)]
pub struct NotOp {
    pub operand: Box<Expression>,
    pub position: Position,
}

impl NotOp {
    pub fn new(operand: Expression, position: Position) -> Self {
        Self {
            operand: Box::new(operand),
            position,
        }
    }
}
