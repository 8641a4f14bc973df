use super::{Block, Expression, Position};

/// `For IDENT = expression To expression ... End` — inclusive, integer-
/// stepping loop. `start`/`end` are evaluated once, before the first
/// iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub var: String,
    pub start: Box<Expression>,
    pub end: Box<Expression>,
    pub body: Block,
    pub position: Position,
}

impl For {
    pub fn new(
        var: impl Into<String>,
        start: Expression,
        end: Expression,
        body: Block,
        position: Position,
    ) -> Self {
        Self {
            var: var.into(),
            start: Box::new(start),
            end: Box::new(end),
            body,
            position,
        }
    }
}
