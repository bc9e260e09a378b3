//! Runtime values and their coercion contract.
//!
//! Values are immutable once constructed. Operators never mutate an operand;
//! every operation builds a fresh value. Coercion between integers and
//! strings is applied here, uniformly, never in the AST layer:
//!
//! - arithmetic coerces strings through integer parsing and fails on
//!   non-canonical literals,
//! - string operators coerce anything through [`Value::stringify`] and are
//!   total,
//! - comparisons prefer same-kind native comparison, then integer coercion
//!   of both sides, then string coercion of both sides, and are total,
//! - logic reduces operands to their string form and tests emptiness.
//!
//! Totality is enforced by signature: fallible operators return `Result`,
//! total ones a plain [`Value`]. Truth is represented as `"true"` and
//! falsehood as `""`, so results compose with string-emptiness truthiness.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::bytecode::chunk::Chunk;
use crate::error::ValueError;

/// A named callable owning its compiled body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: String,
    pub arity: usize,
    pub chunk: Chunk,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(Rc<String>),
    Function(Rc<FunctionValue>),
    /// Placeholder pre-allocating a parameter slot before argument binding.
    /// Exists only in function prologues; never reaches an operator.
    Dummy,
}

impl Value {
    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    fn truth(truth: bool) -> Value {
        if truth {
            Value::str("true")
        } else {
            Value::str("")
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Integer coercion. Strings must be canonical integer literals.
    pub fn to_int(&self) -> Result<i64, ValueError> {
        self.int_operand("coerce")
    }

    fn int_operand(&self, op: &'static str) -> Result<i64, ValueError> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Str(s) => s.parse().map_err(|_| ValueError::NonNumeric(op)),
            Value::Function(_) | Value::Dummy => Err(ValueError::NonNumeric(op)),
        }
    }

    /// String view of an integer or string value. Failing on a function or
    /// dummy marks a broken VM invariant, not a user error.
    pub fn to_str(&self) -> Result<Rc<String>, ValueError> {
        match self {
            Value::Int(n) => Ok(Rc::new(itoa::Buffer::new().format(*n).to_string())),
            Value::Str(s) => Ok(Rc::clone(s)),
            Value::Function(_) => Err(ValueError::NoStringForm("function")),
            Value::Dummy => Err(ValueError::NoStringForm("dummy")),
        }
    }

    /// Total string conversion, used by `put`, the string operators, and
    /// the comparison fallback.
    pub fn stringify(&self) -> Rc<String> {
        match self {
            Value::Str(s) => Rc::clone(s),
            other => Rc::new(other.to_string()),
        }
    }

    /// Language truthiness: the empty string is false-like, everything else
    /// true-like, judged on the value's string form.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(_) | Value::Function(_) | Value::Dummy => true,
        }
    }

    // ============ Arithmetic ============

    pub fn add(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("add")?;
        let b = other.int_operand("add")?;
        Ok(Value::Int(a.wrapping_add(b)))
    }

    pub fn sub(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("subtract")?;
        let b = other.int_operand("subtract")?;
        Ok(Value::Int(a.wrapping_sub(b)))
    }

    pub fn mul(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("multiply")?;
        let b = other.int_operand("multiply")?;
        Ok(Value::Int(a.wrapping_mul(b)))
    }

    pub fn div(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("divide")?;
        let b = other.int_operand("divide")?;
        if b == 0 {
            return Err(ValueError::DivisionByZero);
        }
        Ok(Value::Int(a.wrapping_div(b)))
    }

    pub fn modulo(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("modulo")?;
        let b = other.int_operand("modulo")?;
        if b == 0 {
            return Err(ValueError::DivisionByZero);
        }
        Ok(Value::Int(a.wrapping_rem(b)))
    }

    pub fn pow(&self, other: &Value) -> Result<Value, ValueError> {
        let a = self.int_operand("exponentiate")?;
        let b = other.int_operand("exponentiate")?;
        if b < 0 {
            return Err(ValueError::NegativeExponent);
        }
        let exp = u32::try_from(b).unwrap_or(u32::MAX);
        Ok(Value::Int(a.wrapping_pow(exp)))
    }

    pub fn negate(&self) -> Result<Value, ValueError> {
        Ok(Value::Int(self.int_operand("negate")?.wrapping_neg()))
    }

    // ============ Strings ============

    pub fn concat(&self, other: &Value) -> Value {
        let a = self.stringify();
        let b = other.stringify();
        let mut out = String::with_capacity(a.len() + b.len());
        out.push_str(&a);
        out.push_str(&b);
        Value::Str(Rc::new(out))
    }

    /// Symmetric character difference: characters of self absent from
    /// other, then characters of other absent from self, each side keeping
    /// its original order.
    pub fn diff(&self, other: &Value) -> Value {
        let a = self.stringify();
        let b = other.stringify();
        let mut out = String::new();
        for c in a.chars() {
            if !b.contains(c) {
                out.push(c);
            }
        }
        for c in b.chars() {
            if !a.contains(c) {
                out.push(c);
            }
        }
        Value::Str(Rc::new(out))
    }

    // ============ Comparison ============

    /// Fallback chain shared by the six comparison operators: same-kind
    /// native comparison, else integer coercion of both sides, else string
    /// coercion of both sides.
    fn ordering(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => match (self.to_int(), other.to_int()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => self.stringify().cmp(&other.stringify()),
            },
        }
    }

    pub fn eq(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) == Ordering::Equal)
    }

    pub fn ne(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) != Ordering::Equal)
    }

    pub fn gt(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) == Ordering::Greater)
    }

    pub fn lt(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) == Ordering::Less)
    }

    pub fn ge(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) != Ordering::Less)
    }

    pub fn le(&self, other: &Value) -> Value {
        Value::truth(self.ordering(other) != Ordering::Greater)
    }

    // ============ Logic ============

    pub fn logical_and(&self, other: &Value) -> Value {
        Value::truth(self.is_truthy() && other.is_truthy())
    }

    pub fn logical_or(&self, other: &Value) -> Value {
        Value::truth(self.is_truthy() || other.is_truthy())
    }

    pub fn logical_not(&self) -> Value {
        Value::truth(!self.is_truthy())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => f.write_str(itoa::Buffer::new().format(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Function(func) => write!(f, "<fn {}>", func.name),
            Value::Dummy => f.write_str("<dummy>"),
        }
    }
}
