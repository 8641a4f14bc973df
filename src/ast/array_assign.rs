use super::{Expression, Position};

/// `name[index] = value` (statement).
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAssign {
    pub name: String,
    pub index: Box<Expression>,
    pub value: Box<Expression>,
    pub position: Position,
}

impl ArrayAssign {
    pub fn new(
        name: impl Into<String>,
        index: Expression,
        value: Expression,
        position: Position,
    ) -> Self {
        Self {
            name: name.into(),
            index: Box::new(index),
            value: Box::new(value),
            position,
        }
    }
}
