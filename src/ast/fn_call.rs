use super::{Expression, Position};

/// `IDENT ( args )` — invokes a user function. Never constructed for the
/// builtin names the parser lowers to [`StringOp`](super::StringOp); see
/// `Parser::call_or_string_op`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub name: String,
    pub args: Vec<Expression>,
    pub position: Position,
}

impl FuncCall {
    pub fn new(name: impl Into<String>, args: Vec<Expression>, position: Position) -> Self {
        Self {
            name: name.into(),
            args,
            position,
        }
    }
}
