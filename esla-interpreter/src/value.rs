use std::fmt::Display;
use std::rc::Rc;

use esla_core::ast::{self, format_double, Literal};
use gc::{Finalize, Gc, Trace};

use crate::environment::Environment;
use crate::error::EvaluationError;
use crate::native::NativeObject;

#[derive(Clone, Default, Trace, Finalize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(#[unsafe_ignore_trace] Rc<str>),
    Function(Gc<Function>),
    Native(#[unsafe_ignore_trace] Rc<dyn NativeObject>),
}

/// A user-defined function together with the environment it was declared in.
#[derive(Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub name: Rc<str>,
    #[unsafe_ignore_trace]
    pub parameters: Vec<ast::Identifier>,
    #[unsafe_ignore_trace]
    pub body: Rc<ast::Block>,
    pub closure: Environment,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.parameters.len())
            .finish()
    }
}

impl Function {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl Value {
    pub fn function(
        name: Rc<str>,
        parameters: Vec<ast::Identifier>,
        body: Rc<ast::Block>,
        closure: Environment,
    ) -> Value {
        Value::Function(Gc::new(Function {
            name,
            parameters,
            body,
            closure,
        }))
    }

    pub fn native(object: impl NativeObject + 'static) -> Value {
        Value::Native(Rc::new(object))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Native(object) => object.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    /// Numeric view of the value. Booleans count as `1` and `0`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Double(value) => Some(*value),
            Value::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(left), Value::Bool(right)) => left == right,
            (Value::Int(left), Value::Int(right)) => left == right,
            (Value::Double(left), Value::Double(right)) => left == right,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Gc::ptr_eq(left, right),
            (Value::Native(left), Value::Native(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Value::Int(value) => f.debug_tuple("Int").field(value).finish(),
            Value::Double(value) => f.debug_tuple("Double").field(value).finish(),
            Value::String(value) => f.debug_tuple("String").field(value).finish(),
            Value::Function(function) => f.debug_tuple("Function").field(&**function).finish(),
            Value::Native(object) => f.debug_tuple("Native").field(&object.type_name()).finish(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Double(value) => write!(f, "{}", format_double(*value)),
            Value::String(value) => write!(f, "'{}'", value),
            Value::Function(function) => write!(f, "<function {}>", function.name),
            Value::Native(object) => write!(f, "<native {}>", object.type_name()),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(value) => Value::Int(*value),
            Literal::Double(value) => Value::Double(*value),
            Literal::String(value) => Value::String(value.clone()),
            Literal::Bool(value) => Value::Bool(*value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

fn mismatch(expected: &str, got: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch(format!("expected {}, got {}", expected, got.type_name()))
}

impl TryFrom<Value> for i64 {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(value) => Ok(value),
            other => Err(mismatch("int", &other)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Double(value) => Ok(value),
            Value::Int(value) => Ok(value as f64),
            other => Err(mismatch("number", &other)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(value) => Ok(value),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = EvaluationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(ref value) => Ok(value.to_string()),
            other => Err(mismatch("string", &other)),
        }
    }
}
