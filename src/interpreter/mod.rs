//! Tree-walking interpreter.
//!
//! Walks the AST directly against a process-local [`Environment`], driving
//! `Print` output and propagating `Return` as a [`Flow`] value instead of
//! unwinding through a thrown exception.
mod environment;
mod error;
mod flow;
mod value;

pub use self::environment::*;
pub use self::error::*;
pub use self::flow::*;
pub use self::value::*;

use log::debug;

use crate::ast::{
    Array, ArrayAccess, ArrayAssign, Assignment, BinaryOp, BinaryVerb, Block, Boolean,
    CompareVerb, Comparison, Expression, For, FuncCall, FuncDef, If, LogicalOp, LogicalVerb,
    NotOp, Number, Position, Print, Return, Statement, Str, StringOp, StringOpKind, Variable,
    While,
};

pub struct Interpreter {
    env: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Runs a full program. A `Return` reaching the top level is a runtime
    /// error.
    pub fn run(&mut self, program: &[Statement]) -> RuntimeResult<()> {
        for statement in program {
            match self.execute_statement(statement)? {
                Flow::Continue => {}
                Flow::Return(_) => {
                    return Err(RuntimeError::new(
                        "Return outside of function",
                        statement.position(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn execute_block(&mut self, block: &Block) -> RuntimeResult<Flow> {
        for statement in &block.statements {
            match self.execute_statement(statement)? {
                Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_statement(&mut self, statement: &Statement) -> RuntimeResult<Flow> {
        match statement {
            Statement::Print(print) => self.execute_print(print),
            Statement::Assignment(assignment) => self.execute_assignment(assignment),
            Statement::ArrayAssign(assign) => self.execute_array_assign(assign),
            Statement::If(if_stmt) => self.execute_if(if_stmt),
            Statement::While(while_stmt) => self.execute_while(while_stmt),
            Statement::For(for_stmt) => self.execute_for(for_stmt),
            Statement::FuncDef(func_def) => self.execute_func_def(func_def),
            Statement::Return(ret) => self.execute_return(ret),
            Statement::Call(call) => self.execute_call_statement(call),
        }
    }

    fn execute_print(&mut self, print: &Print) -> RuntimeResult<Flow> {
        let value = self.evaluate(&print.value)?;
        println!("{}", value.display());
        Ok(Flow::Continue)
    }

    fn execute_assignment(&mut self, assignment: &Assignment) -> RuntimeResult<Flow> {
        let value = self.evaluate(&assignment.value)?;
        self.env.set(assignment.name.clone(), value);
        Ok(Flow::Continue)
    }

    fn execute_array_assign(&mut self, assign: &ArrayAssign) -> RuntimeResult<Flow> {
        let handle = self.array_handle(&assign.name, assign.position)?;
        let index_value = self.evaluate(&assign.index)?;
        let len = handle.borrow().len();
        let index = Self::index_of(&index_value, assign.position, len)?;
        let value = self.evaluate(&assign.value)?;
        handle.borrow_mut()[index] = value;
        Ok(Flow::Continue)
    }

    fn execute_if(&mut self, if_stmt: &If) -> RuntimeResult<Flow> {
        if self.evaluate(&if_stmt.condition)?.truthy() {
            return self.execute_block(&if_stmt.body);
        }
        for elif in &if_stmt.elifs {
            if self.evaluate(&elif.condition)?.truthy() {
                return self.execute_block(&elif.body);
            }
        }
        if let Some(else_body) = &if_stmt.else_body {
            return self.execute_block(else_body);
        }
        Ok(Flow::Continue)
    }

    fn execute_while(&mut self, while_stmt: &While) -> RuntimeResult<Flow> {
        while self.evaluate(&while_stmt.condition)?.truthy() {
            match self.execute_block(&while_stmt.body)? {
                Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Continue)
    }

    /// `start`/`end` are evaluated once, before the first iteration; the
    /// loop variable remains bound in the environment after the loop ends.
    fn execute_for(&mut self, for_stmt: &For) -> RuntimeResult<Flow> {
        let start_value = self.evaluate(&for_stmt.start)?;
        let start = Self::expect_number(&start_value, for_stmt.position)?;
        let end_value = self.evaluate(&for_stmt.end)?;
        let end = Self::expect_number(&end_value, for_stmt.position)?;

        let mut i = start;
        while i <= end {
            self.env.set(for_stmt.var.clone(), Value::Number(i));
            match self.execute_block(&for_stmt.body)? {
                Flow::Continue => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
            i += 1.0;
        }
        Ok(Flow::Continue)
    }

    fn execute_func_def(&mut self, func_def: &FuncDef) -> RuntimeResult<Flow> {
        self.env.define_function(func_def.clone());
        Ok(Flow::Continue)
    }

    fn execute_return(&mut self, ret: &Return) -> RuntimeResult<Flow> {
        let value = self.evaluate(&ret.value)?;
        Ok(Flow::Return(value))
    }

    /// `Push`/`Pop` are intercepted here by name before any user-function
    /// lookup happens; any other name falls through to an ordinary call
    /// whose result is discarded.
    fn execute_call_statement(&mut self, call: &FuncCall) -> RuntimeResult<Flow> {
        match call.name.as_str() {
            "Push" => self.execute_push_statement(call)?,
            "Pop" => self.execute_pop_statement(call)?,
            _ => {
                self.call_function(call)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn execute_push_statement(&mut self, call: &FuncCall) -> RuntimeResult<()> {
        if call.args.len() != 2 {
            return Err(RuntimeError::new("Push requires 2 arguments", call.position));
        }
        let name = Self::variable_arg_name(&call.args, "Push", call.position)?.to_owned();
        let handle = self.array_handle(&name, call.position)?;
        let value = self.evaluate(&call.args[1])?;
        handle.borrow_mut().push(value);
        Ok(())
    }

    fn execute_pop_statement(&mut self, call: &FuncCall) -> RuntimeResult<()> {
        if call.args.len() != 1 {
            return Err(RuntimeError::new("Pop requires 1 argument", call.position));
        }
        let name = Self::variable_arg_name(&call.args, "Pop", call.position)?.to_owned();
        let handle = self.array_handle(&name, call.position)?;
        let mut items = handle.borrow_mut();
        if items.is_empty() {
            return Err(RuntimeError::new("Cannot Pop from empty array", call.position));
        }
        items.pop();
        Ok(())
    }

    fn variable_arg_name<'a>(
        args: &'a [Expression],
        op: &str,
        position: Position,
    ) -> RuntimeResult<&'a str> {
        match args.first() {
            Some(Expression::Variable(Variable { name, .. })) => Ok(name.as_str()),
            _ => Err(RuntimeError::new(
                format!("{op} first argument must be a variable"),
                position,
            )),
        }
    }

    fn evaluate(&mut self, expression: &Expression) -> RuntimeResult<Value> {
        match expression {
            Expression::Number(Number { value, .. }) => Ok(Value::Number(*value)),
            Expression::Str(Str { value, .. }) => Ok(Value::String(value.clone())),
            Expression::Boolean(Boolean { value, .. }) => Ok(Value::Boolean(*value)),
            Expression::Array(array) => self.evaluate_array(array),
            Expression::Variable(Variable { name, position }) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::new(format!("Undefined variable: {name}"), *position)),
            Expression::ArrayAccess(access) => self.evaluate_array_access(access),
            Expression::BinaryOp(binary_op) => self.evaluate_binary_op(binary_op),
            Expression::LogicalOp(logical_op) => self.evaluate_logical_op(logical_op),
            Expression::NotOp(not_op) => {
                Ok(Value::Boolean(!self.evaluate(&not_op.operand)?.truthy()))
            }
            Expression::Comparison(comparison) => self.evaluate_comparison(comparison),
            Expression::Call(call) => self.call_function(call),
            Expression::StringOp(op) => self.evaluate_string_op(op),
        }
    }

    fn evaluate_array(&mut self, array: &Array) -> RuntimeResult<Value> {
        let mut items = Vec::with_capacity(array.elements.len());
        for element in &array.elements {
            items.push(self.evaluate(element)?);
        }
        Ok(Value::array(items))
    }

    fn evaluate_array_access(&mut self, access: &ArrayAccess) -> RuntimeResult<Value> {
        let handle = self.array_handle(&access.name, access.position)?;
        let index_value = self.evaluate(&access.index)?;
        let len = handle.borrow().len();
        let index = Self::index_of(&index_value, access.position, len)?;
        Ok(handle.borrow()[index].clone())
    }

    fn array_handle(&self, name: &str, position: Position) -> RuntimeResult<ArrayHandle> {
        match self.env.get(name) {
            Some(Value::Array(handle)) => Ok(handle.clone()),
            Some(_) => Err(RuntimeError::new(format!("{name} is not an array"), position)),
            None => Err(RuntimeError::new(format!("Undefined variable: {name}"), position)),
        }
    }

    /// Truncates toward zero; negative or out-of-range indices are a
    /// runtime error.
    fn index_of(value: &Value, position: Position, len: usize) -> RuntimeResult<usize> {
        let n = Self::expect_number(value, position)?;
        let truncated = n.trunc();
        if truncated < 0.0 || truncated as usize >= len {
            return Err(RuntimeError::new("Array index out of bounds", position));
        }
        Ok(truncated as usize)
    }

    fn expect_number(value: &Value, position: Position) -> RuntimeResult<f64> {
        match value {
            Value::Number(n) => Ok(*n),
            _ => Err(RuntimeError::new("Arithmetic requires numbers", position)),
        }
    }

    fn expect_numbers(lhs: &Value, rhs: &Value, position: Position) -> RuntimeResult<(f64, f64)> {
        match (lhs, rhs) {
            (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
            _ => Err(RuntimeError::new("Arithmetic requires numbers", position)),
        }
    }

    /// `+` is overloaded for string concatenation when either operand is a
    /// String; every other operator requires two Numbers.
    fn evaluate_binary_op(&mut self, binary_op: &BinaryOp) -> RuntimeResult<Value> {
        let lhs = self.evaluate(&binary_op.lhs)?;
        let rhs = self.evaluate(&binary_op.rhs)?;
        match binary_op.verb {
            BinaryVerb::Add => {
                if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
                    Ok(Value::String(format!("{}{}", lhs.display(), rhs.display())))
                } else {
                    let (l, r) = Self::expect_numbers(&lhs, &rhs, binary_op.position)?;
                    Ok(Value::Number(l + r))
                }
            }
            BinaryVerb::Sub => {
                let (l, r) = Self::expect_numbers(&lhs, &rhs, binary_op.position)?;
                Ok(Value::Number(l - r))
            }
            BinaryVerb::Mul => {
                let (l, r) = Self::expect_numbers(&lhs, &rhs, binary_op.position)?;
                Ok(Value::Number(l * r))
            }
            BinaryVerb::Div => {
                let (l, r) = Self::expect_numbers(&lhs, &rhs, binary_op.position)?;
                if r == 0.0 {
                    return Err(RuntimeError::new("Division by zero", binary_op.position));
                }
                Ok(Value::Number(l / r))
            }
        }
    }

    /// Both operands are evaluated unconditionally; short-circuiting is not
    /// guaranteed.
    fn evaluate_logical_op(&mut self, logical_op: &LogicalOp) -> RuntimeResult<Value> {
        let lhs = self.evaluate(&logical_op.lhs)?.truthy();
        let rhs = self.evaluate(&logical_op.rhs)?.truthy();
        Ok(Value::Boolean(match logical_op.verb {
            LogicalVerb::And => lhs && rhs,
            LogicalVerb::Or => lhs || rhs,
        }))
    }

    fn evaluate_comparison(&mut self, comparison: &Comparison) -> RuntimeResult<Value> {
        let lhs = self.evaluate(&comparison.lhs)?;
        let rhs = self.evaluate(&comparison.rhs)?;

        if let (Value::String(l), Value::String(r)) = (&lhs, &rhs) {
            return match comparison.verb {
                CompareVerb::Equal => Ok(Value::Boolean(l == r)),
                CompareVerb::NotEqual => Ok(Value::Boolean(l != r)),
                _ => Err(RuntimeError::new(
                    "Only == and != supported for string comparison",
                    comparison.position,
                )),
            };
        }

        let (l, r) = match (&lhs, &rhs) {
            (Value::Number(l), Value::Number(r)) => (*l, *r),
            _ => {
                return Err(RuntimeError::new(
                    "Comparison requires matching types",
                    comparison.position,
                ))
            }
        };

        Ok(Value::Boolean(match comparison.verb {
            CompareVerb::Equal => l == r,
            CompareVerb::NotEqual => l != r,
            CompareVerb::LessThan => l < r,
            CompareVerb::GreaterThan => l > r,
            CompareVerb::LessEqual => l <= r,
            CompareVerb::GreaterEqual => l >= r,
        }))
    }

    /// Evaluates the call target once, then dispatches on its runtime
    /// type.
    fn evaluate_string_op(&mut self, op: &StringOp) -> RuntimeResult<Value> {
        let target = self.evaluate(&op.target)?;
        match op.op {
            StringOpKind::Length => match &target {
                Value::String(s) => Ok(Value::Number(s.len() as f64)),
                Value::Array(arr) => Ok(Value::Number(arr.borrow().len() as f64)),
                _ => Err(RuntimeError::new("Length requires a string or array", op.position)),
            },
            StringOpKind::Upper => match &target {
                Value::String(s) => Ok(Value::String(s.to_ascii_uppercase())),
                _ => Err(RuntimeError::new("Upper requires a string", op.position)),
            },
            StringOpKind::Lower => match &target {
                Value::String(s) => Ok(Value::String(s.to_ascii_lowercase())),
                _ => Err(RuntimeError::new("Lower requires a string", op.position)),
            },
            StringOpKind::Contains => {
                let Value::String(s) = &target else {
                    return Err(RuntimeError::new("Contains requires a string", op.position));
                };
                let needle = self.evaluate(op.args.first().ok_or_else(|| {
                    RuntimeError::new("Contains requires 2 arguments", op.position)
                })?)?;
                Ok(Value::Number(if s.contains(&needle.display()) { 1.0 } else { 0.0 }))
            }
            StringOpKind::Substring => {
                let Value::String(s) = &target else {
                    return Err(RuntimeError::new("Substring requires a string", op.position));
                };
                let start_value = self.evaluate(op.args.first().ok_or_else(|| {
                    RuntimeError::new("Substring requires 3 arguments", op.position)
                })?)?;
                let len_value = self.evaluate(op.args.get(1).ok_or_else(|| {
                    RuntimeError::new("Substring requires 3 arguments", op.position)
                })?)?;
                let start = Self::expect_number(&start_value, op.position)? as isize;
                let len = Self::expect_number(&len_value, op.position)? as isize;
                Ok(Value::String(substring(s, start, len)))
            }
            StringOpKind::Push => {
                let Value::Array(arr) = &target else {
                    return Err(RuntimeError::new("Push requires an array", op.position));
                };
                let value = self.evaluate(
                    op.args
                        .first()
                        .ok_or_else(|| RuntimeError::new("Push requires 2 arguments", op.position))?,
                )?;
                arr.borrow_mut().push(value);
                Ok(target.clone())
            }
            StringOpKind::Pop => {
                let Value::Array(arr) = &target else {
                    return Err(RuntimeError::new("Pop requires an array", op.position));
                };
                let mut items = arr.borrow_mut();
                if items.is_empty() {
                    return Err(RuntimeError::new("Cannot pop from empty array", op.position));
                }
                Ok(items.pop().unwrap())
            }
        }
    }

    /// Arguments are evaluated left-to-right against the caller's
    /// environment *before* the variables map is snapshotted and
    /// overwritten with the callee's parameter bindings, so an argument
    /// expression never observes a sibling parameter's new binding.
    fn call_function(&mut self, call: &FuncCall) -> RuntimeResult<Value> {
        let func = self.env.function(&call.name).cloned().ok_or_else(|| {
            RuntimeError::new(format!("Undefined function: {}", call.name), call.position)
        })?;
        if call.args.len() != func.params.len() {
            return Err(RuntimeError::new(
                format!("Function '{}' expects {} arguments", call.name, func.params.len()),
                call.position,
            ));
        }

        let mut arguments = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            arguments.push(self.evaluate(arg)?);
        }

        debug!("calling '{}' with {} argument(s)", call.name, arguments.len());
        let snapshot = self.env.snapshot();
        for (param, value) in func.params.iter().zip(arguments) {
            self.env.set(param.clone(), value);
        }

        let outcome = self.execute_block(&func.body);
        self.env.restore(snapshot);
        debug!("returned from '{}'", call.name);

        match outcome? {
            Flow::Continue => Ok(Value::Number(0.0)),
            Flow::Return(value) => Ok(value),
        }
    }
}

/// Byte-offset substring, clamped to the string's bounds rather than
/// erroring on an out-of-range request. This diverges from
/// `interpreter.cpp`'s `substr(start, len)`, which throws when
/// `start > size()`; spec.md §4.3 is silent on out-of-range `Substring`
/// bounds, so clamping was chosen over reproducing that throw.
fn substring(s: &str, start: isize, len: isize) -> String {
    let bytes = s.as_bytes();
    let total = bytes.len() as isize;
    let start = start.clamp(0, total);
    let end = (start + len.max(0)).min(total);
    if end <= start {
        return String::new();
    }
    String::from_utf8_lossy(&bytes[start as usize..end as usize]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Parser;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> Vec<Statement> {
        let tokens = Lexer::new(source).lex().expect("lex failed");
        Parser::new(tokens).parse().expect("parse failed")
    }

    fn interpret(source: &str) -> RuntimeResult<()> {
        let program = parse(source);
        Interpreter::new().run(&program)
    }

    #[test]
    fn arithmetic_precedence_is_respected() {
        interpret("x = 2\ny = 3\nPrint x + y * 4\n").unwrap();
    }

    #[test]
    fn undefined_variable_errors() {
        let err = interpret("Print x\n").unwrap_err();
        assert_eq!(err.message, "Undefined variable: x");
    }

    #[test]
    fn division_by_zero_errors() {
        let err = interpret("Print 1 / 0\n").unwrap_err();
        assert_eq!(err.message, "Division by zero");
    }

    #[test]
    fn array_push_pop_round_trip() {
        let program = parse("a = [1, 2, 3]\nPush(a, 4)\nb = Pop(a)\nPrint Length(a)\n");
        let mut interp = Interpreter::new();
        interp.run(&program).unwrap();
        assert_eq!(interp.env.get("b").unwrap().display(), "4");
        assert_eq!(interp.env.get("a").unwrap().display(), "[1, 2, 3]");
    }

    #[test]
    fn push_requires_a_variable_first_argument() {
        let err = interpret("Push([1], 2)\n").unwrap_err();
        assert_eq!(err.message, "Push first argument must be a variable");
    }

    #[test]
    fn pop_from_empty_array_via_statement_is_capital_p() {
        let err = interpret("a = []\nPop(a)\n").unwrap_err();
        assert_eq!(err.message, "Cannot Pop from empty array");
    }

    #[test]
    fn pop_from_empty_array_via_expression_is_lowercase_p() {
        let err = interpret("a = []\nPrint Pop(a)\n").unwrap_err();
        assert_eq!(err.message, "Cannot pop from empty array");
    }

    #[test]
    fn function_call_and_return() {
        interpret("Func add(a, b)\n  Return a + b\nEnd\nPrint add(2, 40)\n").unwrap();
    }

    #[test]
    fn function_arity_mismatch_errors() {
        let program = parse("Func add(a, b)\n  Return a + b\nEnd\nPrint add(2)\n");
        let err = Interpreter::new().run(&program).unwrap_err();
        assert_eq!(err.message, "Function 'add' expects 2 arguments");
    }

    #[test]
    fn caller_scope_is_restored_after_call() {
        let program =
            parse("x = 1\nFunc identity(x)\n  Return x\nEnd\ny = identity(99)\nPrint x\n");
        let mut interp = Interpreter::new();
        interp.run(&program).unwrap();
        assert_eq!(interp.env.get("x").unwrap().display(), "1");
    }

    #[test]
    fn return_at_top_level_errors() {
        let program = parse("Return 1\n");
        let err = Interpreter::new().run(&program).unwrap_err();
        assert_eq!(err.message, "Return outside of function");
    }

    #[test]
    fn for_loop_bound_is_inclusive() {
        let program = parse("n = 0\nFor i = 5 To 5\n  n = n + 1\nEnd\nPrint n\n");
        let mut interp = Interpreter::new();
        interp.run(&program).unwrap();
        assert_eq!(interp.env.get("n").unwrap().display(), "1");
    }

    #[test]
    fn for_loop_with_descending_bounds_runs_zero_times() {
        let program = parse("n = 0\nFor i = 5 To 4\n  n = n + 1\nEnd\nPrint n\n");
        let mut interp = Interpreter::new();
        interp.run(&program).unwrap();
        assert_eq!(interp.env.get("n").unwrap().display(), "0");
    }

    #[test]
    fn array_index_out_of_range_errors() {
        let err = interpret("a = [1, 2]\nPrint a[5]\n").unwrap_err();
        assert_eq!(err.message, "Array index out of bounds");
    }

    #[test]
    fn string_comparison_only_supports_equality() {
        let err = interpret("Print \"a\" < \"b\"\n").unwrap_err();
        assert_eq!(err.message, "Only == and != supported for string comparison");
    }

    #[test]
    fn mismatched_comparison_types_error() {
        let err = interpret("Print 1 < \"a\"\n").unwrap_err();
        assert_eq!(err.message, "Comparison requires matching types");
    }

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(Value::Number(14.0).display(), "14");
        assert_eq!(Value::Number(3.5).display(), "3.500000");
    }

    #[test]
    fn array_display_is_recursive() {
        let value = Value::array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert_eq!(value.display(), "[1, 2]");
    }

    #[test]
    fn substring_clamps_to_bounds() {
        assert_eq!(substring("hello", 1, 3), "ell");
        assert_eq!(substring("hello", 2, 100), "llo");
        assert_eq!(substring("hello", -5, 2), "he");
    }
}