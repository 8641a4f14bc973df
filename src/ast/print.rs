use super::{Expression, Position};

/// `Print expr` — emits `expr` to stdout followed by a newline.
#[derive(Debug, Clone, PartialEq)]
pub struct Print {
    pub value: Box<Expression>,
    pub position: Position,
}

impl Print {
    pub fn new(value: Expression, position: Position) -> Self {
        Self {
            value: Box::new(value),
            position,
        }
    }
}
