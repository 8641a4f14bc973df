use std::collections::HashMap;

use crate::ast::FuncDef;

use super::Value;

/// The two process-local mappings of §3.4: variables (copy-on-call) and
/// functions (registered as their `FuncDef` statement executes, never
/// mutated afterward).
#[derive(Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    functions: HashMap<String, FuncDef>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn function(&self, name: &str) -> Option<&FuncDef> {
        self.functions.get(name)
    }

    pub fn define_function(&mut self, func: FuncDef) {
        self.functions.insert(func.name.clone(), func);
    }

    /// Snapshot the variables map on call entry.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.variables.clone()
    }

    /// Restore the variables map on any call exit path.
    pub fn restore(&mut self, snapshot: HashMap<String, Value>) {
        self.variables = snapshot;
    }
}
