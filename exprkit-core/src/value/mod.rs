//! Terminal payload representation

pub mod error;

pub use error::{ValueError, ValueResult};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared cell behind a [`Value::Ref`]
pub type Cell = Arc<Mutex<Value>>;

/// Signature of a host function wrapped by [`NativeFunction`]
pub type NativeFn = dyn Fn(&[Value]) -> ValueResult<Value> + Send + Sync;

/// Payload carried by a terminal node
#[derive(Clone)]
pub enum Value {
    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// Boolean value
    Boolean(bool),

    /// String value
    String(String),

    /// Identifier
    Symbol(String),

    /// Stand-in for a value supplied later, 1-based
    Placeholder(u32),

    /// List of values
    List(Vec<Value>),

    /// Host function
    Function(NativeFunction),

    /// Intrinsic call target understood by the evaluator
    Form(Form),

    /// Mutable reference; clones share the same cell
    Ref(Cell),

    /// Nil/null value
    Nil,
}

/// Runtime type key of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    Float,
    Boolean,
    String,
    Symbol,
    Placeholder,
    List,
    Function,
    Form,
    Ref,
    Nil,
}

/// Intrinsic constructs recognised in call position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    /// `if(cond, then, else)`; only one branch is evaluated
    If,
    /// `for_each(range)[body]`; body is evaluated once per element
    ForEach,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::If => write!(f, "if"),
            Form::ForEach => write!(f, "for_each"),
        }
    }
}

/// Named host function with an optional fixed arity
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    /// `None` accepts any number of arguments
    pub arity: Option<usize>,
    function: Arc<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: Option<usize>, function: F) -> Self
    where
        F: Fn(&[Value]) -> ValueResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            function: Arc::new(function),
        }
    }

    /// Invoke the function, checking the argument count first
    pub fn call(&self, args: &[Value]) -> ValueResult<Value> {
        if let Some(expected) = self.arity {
            if expected != args.len() {
                return Err(ValueError::ArityMismatch {
                    function: self.name.clone(),
                    expected,
                    actual: args.len(),
                });
            }
        }
        (self.function)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl Value {
    /// Create a fresh reference cell holding `value`
    pub fn new_ref(value: Value) -> Value {
        Value::Ref(Arc::new(Mutex::new(value)))
    }

    /// Type checking predicates
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Value::Placeholder(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Value::Ref(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Type conversion helpers
    pub fn as_integer(&self) -> ValueResult<i64> {
        match self {
            Value::Integer(n) => Ok(*n),
            _ => Err(self.type_error("integer")),
        }
    }

    pub fn as_float(&self) -> ValueResult<f64> {
        match self {
            Value::Float(x) => Ok(*x),
            _ => Err(self.type_error("float")),
        }
    }

    /// Numeric value widened to `f64`
    pub fn as_number(&self) -> ValueResult<f64> {
        match self {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(x) => Ok(*x),
            _ => Err(self.type_error("number")),
        }
    }

    pub fn as_boolean(&self) -> ValueResult<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.type_error("boolean")),
        }
    }

    pub fn as_string(&self) -> ValueResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.type_error("string")),
        }
    }

    pub fn as_symbol(&self) -> ValueResult<&str> {
        match self {
            Value::Symbol(s) => Ok(s),
            _ => Err(self.type_error("symbol")),
        }
    }

    pub fn as_list(&self) -> ValueResult<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            _ => Err(self.type_error("list")),
        }
    }

    pub fn as_function(&self) -> ValueResult<&NativeFunction> {
        match self {
            Value::Function(f) => Ok(f),
            _ => Err(self.type_error("function")),
        }
    }

    pub fn as_placeholder(&self) -> Option<u32> {
        match self {
            Value::Placeholder(i) => Some(*i),
            _ => None,
        }
    }

    /// Read through a reference; other values are returned as-is
    pub fn load(&self) -> Value {
        match self {
            Value::Ref(cell) => cell.lock().clone(),
            other => other.clone(),
        }
    }

    /// Replace the contents of a reference cell
    pub fn store(&self, value: Value) -> ValueResult<()> {
        match self {
            Value::Ref(cell) => {
                *cell.lock() = value;
                Ok(())
            }
            _ => Err(self.type_error("ref")),
        }
    }

    fn type_error(&self, expected: &'static str) -> ValueError {
        ValueError::TypeError {
            expected,
            actual: self.type_name(),
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Integer(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::String(_) => TypeTag::String,
            Value::Symbol(_) => TypeTag::Symbol,
            Value::Placeholder(_) => TypeTag::Placeholder,
            Value::List(_) => TypeTag::List,
            Value::Function(_) => TypeTag::Function,
            Value::Form(_) => TypeTag::Form,
            Value::Ref(_) => TypeTag::Ref,
            Value::Nil => TypeTag::Nil,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Placeholder(_) => "placeholder",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::Form(_) => "form",
            Value::Ref(_) => "ref",
            Value::Nil => "nil",
        }
    }

    /// Check if value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Ref(cell) => cell.lock().is_truthy(),
            _ => true,
        }
    }

    /// Numeric comparison
    pub fn compare_numeric(&self, other: &Value) -> ValueResult<std::cmp::Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (a, b) if a.is_number() && b.is_number() => {
                let (a, b) = (a.as_number()?, b.as_number()?);
                a.partial_cmp(&b).ok_or_else(|| {
                    ValueError::InvalidOperation(format!("Cannot order {} and {}", a, b))
                })
            }
            _ => Err(ValueError::InvalidOperation(format!(
                "Cannot compare {} and {} numerically",
                self.type_name(),
                other.type_name()
            ))),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({})", n),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Symbol(s) => write!(f, "Symbol({:?})", s),
            Value::Placeholder(i) => write!(f, "Placeholder({})", i),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Function(func) => func.fmt(f),
            Value::Form(form) => write!(f, "Form({:?})", form),
            Value::Ref(cell) => match cell.try_lock() {
                Some(inner) => write!(f, "Ref({:?})", *inner),
                None => write!(f, "Ref(<locked>)"),
            },
            Value::Nil => write!(f, "Nil"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // exact comparison; NaN payloads are structurally equal to each other
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Placeholder(a), Value::Placeholder(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Form(a), Value::Form(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Placeholder(i) => write!(f, "_{}", i),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Function(func) => write!(f, "{}", func.name),
            Value::Form(form) => write!(f, "{}", form),
            Value::Ref(cell) => match cell.try_lock() {
                Some(inner) => write!(f, "&{}", *inner),
                None => write!(f, "&<locked>"),
            },
            Value::Nil => write!(f, "nil"),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

impl_from_for_value! {
    i64 => Integer,
    i32 => Integer as i64,
    u32 => Integer as i64,
    f64 => Float,
    f32 => Float as f64,
    bool => Boolean,
    String => String,
    NativeFunction => Function,
    Form => Form,
    Vec<Value> => List,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

#[cfg(test)]
#[path = "../value_tests.rs"]
mod tests;
