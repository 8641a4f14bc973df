use super::{
    ArrayAssign, Assignment, For, FuncCall, FuncDef, If, Position, Print, Return, While,
};

/// A closed sum type over every statement-position node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Print(Print),
    Assignment(Assignment),
    ArrayAssign(ArrayAssign),
    If(If),
    While(While),
    For(For),
    FuncDef(FuncDef),
    Return(Return),
    Call(FuncCall),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Print(Print { position, .. })
            | Statement::Assignment(Assignment { position, .. })
            | Statement::ArrayAssign(ArrayAssign { position, .. })
            | Statement::If(If { position, .. })
            | Statement::While(While { position, .. })
            | Statement::For(For { position, .. })
            | Statement::FuncDef(FuncDef { position, .. })
            | Statement::Return(Return { position, .. })
            | Statement::Call(FuncCall { position, .. }) => *position,
        }
    }
}
