use super::{Expression, Position};

/// Relational operators. Non-associative: the grammar allows at most one
/// comparison per `comparison` production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareVerb {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub verb: CompareVerb,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub position: Position,
}

impl Comparison {
    pub fn new(verb: CompareVerb, lhs: Expression, rhs: Expression, position: Position) -> Self {
        Self {
            verb,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            position,
        }
    }
}
