use std::cell::RefCell;
use std::rc::Rc;

/// A shared, mutable array handle. Cloning a `Value::Array` clones the
/// handle, not the storage — this is how `Push`/`Pop` through one binding
/// stay visible through another binding to the same array.
pub type ArrayHandle = Rc<RefCell<Vec<Value>>>;

/// A runtime value. Numbers, strings and booleans have value semantics
/// (copied on assignment); arrays have reference semantics via
/// [`ArrayHandle`].
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Array(ArrayHandle),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    /// §4.3 truthiness: Boolean is itself, Number is non-zero, String/Array
    /// are non-empty.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(arr) => !arr.borrow().is_empty(),
        }
    }

    /// §6.3 `Print` rendering: integral-valued numbers print without a
    /// fractional part, booleans print as `True`/`False`, strings print
    /// verbatim, arrays print recursively as `[e0, e1, ...]`.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => if *b { "True".to_owned() } else { "False".to_owned() },
            Value::String(s) => s.clone(),
            Value::Array(arr) => {
                let rendered: Vec<String> = arr.borrow().iter().map(Value::display).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n == n.trunc() && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{n:.6}")
    }
}
