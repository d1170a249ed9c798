//! The typed cell value used at the [`CandidateTable`](crate::table::CandidateTable)
//! accessor boundary.

use std::fmt;

/// A single, type-tagged cell value.
///
/// `Value` is never stored inside a [`CandidateTable`](crate::table::CandidateTable) —
/// columns are typed, NA-bitmapped arrays — but every typed read/write
/// crosses this boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A real-valued parameter's current value.
    Real(f64),
    /// An integer parameter's current value.
    Int(i64),
    /// A categorical parameter's current value, as an index into its `levels`.
    Cat(usize),
    /// A boolean parameter's current value.
    Bool(bool),
    /// The cell is inactive: its parameter's activation conditions don't all hold.
    Na,
}

impl Value {
    /// Returns `true` for [`Value::Na`].
    pub fn is_na(&self) -> bool {
        matches!(self, Value::Na)
    }

    /// Extracts the real value, if this is [`Value::Real`].
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Extracts the integer value, if this is [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extracts the level index, if this is [`Value::Cat`].
    pub fn as_cat(&self) -> Option<usize> {
        match self {
            Value::Cat(v) => Some(*v),
            _ => None,
        }
    }

    /// Extracts the boolean value, if this is [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Compares two values for equality using the condition contract's
    /// floating-point tolerance (`1e-8` for `Real`).
    ///
    /// Values of different kinds (including either side being [`Value::Na`])
    /// are never equal under this relation.
    pub fn cond_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Real(a), Value::Real(b)) => (a - b).abs() < 1e-8,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Cat(a), Value::Cat(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Cat(v) => write!(f, "#{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Na => write!(f, "NA"),
        }
    }
}
