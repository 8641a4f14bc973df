use super::{Block, Expression, Position};

/// A (condition, body) pair making up an `Elif` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    pub condition: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Expression>,
    pub body: Block,
    pub elifs: Vec<ElifClause>,
    pub else_body: Option<Block>,
    pub position: Position,
}

impl If {
    pub fn new(
        condition: Expression,
        body: Block,
        elifs: Vec<ElifClause>,
        else_body: Option<Block>,
        position: Position,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            body,
            elifs,
            else_body,
            position,
        }
    }
}
