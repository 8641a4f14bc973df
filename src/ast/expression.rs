use super::{
    Array, ArrayAccess, BinaryOp, Boolean, Comparison, FuncCall, LogicalOp, NotOp, Number,
    Position, StringOp, Str, Variable,
};

/// A closed sum type over every expression-position node, dispatched by
/// exhaustive pattern matching in `loom::interpreter`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(Number),
    Str(Str),
    Boolean(Boolean),
    Array(Array),
    Variable(Variable),
    ArrayAccess(ArrayAccess),
    BinaryOp(BinaryOp),
    LogicalOp(LogicalOp),
    NotOp(NotOp),
    Comparison(Comparison),
    Call(FuncCall),
    StringOp(StringOp),
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Expression::Number(Number { position, .. })
            | Expression::Str(Str { position, .. })
            | Expression::Boolean(Boolean { position, .. })
            | Expression::Array(Array { position, .. })
            | Expression::Variable(Variable { position, .. })
            | Expression::ArrayAccess(ArrayAccess { position, .. })
            | Expression::BinaryOp(BinaryOp { position, .. })
            | Expression::LogicalOp(LogicalOp { position, .. })
            | Expression::NotOp(NotOp { position, .. })
            | Expression::Comparison(Comparison { position, .. })
            | Expression::Call(FuncCall { position, .. })
            | Expression::StringOp(StringOp { position, .. }) => *position,
        }
    }
}
