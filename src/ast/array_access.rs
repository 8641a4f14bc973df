use super::{Expression, Position};

/// `name[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub name: String,
    pub index: Box<Expression>,
    pub position: Position,
}

impl ArrayAccess {
    pub fn new(name: impl Into<String>, index: Expression, position: Position) -> Self {
        Self {
            name: name.into(),
            index: Box::new(index),
            position,
        }
    }
}
