use super::{Block, Position};

/// `Func IDENT ( params ) ... End` — declares a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub position: Position,
}

impl FuncDef {
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Block, position: Position) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            position,
        }
    }
}
