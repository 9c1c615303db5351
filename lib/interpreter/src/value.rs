use std::fmt;
use std::fmt::{Display, Formatter};

/// A runtime value. Also serves as the payload carried from literal AST
/// nodes into evaluation.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy, including
    /// `0` and `""`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

// Language equality is exactly the derived one: nil equals only nil,
// values of different kinds are never equal, same-kind values compare by
// value. No operand combination faults.

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // f64's default formatting is the shortest round-trippable
            // decimal, so integral numbers print without a ".0" suffix.
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(true).is_truthy());
        assert!(Value::from(0.0).is_truthy());
        assert!(Value::from("").is_truthy());
    }

    #[test]
    fn equality() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_ne!(Value::Nil, Value::from(false));
        assert_ne!(Value::from(1.0), Value::from("1"));
        assert_eq!(Value::from("a"), Value::from("a"));
        assert_eq!(Value::from(2.0), Value::from(2.0));
    }

    #[test]
    fn display_numbers_without_trailing_zero() {
        assert_eq!(Value::from(1.0).to_string(), "1");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(-0.25).to_string(), "-0.25");
    }
}
