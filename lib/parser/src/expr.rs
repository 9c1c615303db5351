use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use scanner::Token;

/// Expression nodes. Strict trees: every child is exclusively owned and
/// nothing is mutated after parsing.
#[derive(Debug)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Logical { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Ternary { condition: Box<Expr<'a>>, if_true: Box<Expr<'a>>, if_false: Box<Expr<'a>> },
    /// Comma sequence, always at least two elements. Evaluates all, yields
    /// the last.
    Comma(Vec<Expr<'a>>),
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Literal(LiteralValue<'a>),
    Variable(Token<'a>),
    Assign { name: Token<'a>, value: Box<Expr<'a>> },
}

// Parenthesized prefix rendering, e.g. `1 + 2 * 3` as `(+ 1 (* 2 3))`.
// Purely diagnostic output.
impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Logical { left, operator, right } => {
                write!(f, "({} {} {})", operator, left, right)
            }
            Expr::Ternary { condition, if_true, if_false } => {
                write!(f, "(ternary {} {} {})", condition, if_true, if_false)
            }
            Expr::Comma(exprs) => {
                write!(f, "(comma {})", exprs.iter().map(|e| e.to_string()).join(" "))
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator, right)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
            Expr::Variable(token) => {
                write!(f, "{}", token.lexeme())
            }
            Expr::Assign { name, value } => {
                write!(f, "(assign {} {})", name.lexeme(), value)
            }
        }
    }
}

#[derive(Debug)]
pub enum LiteralValue<'a> {
    Number(f64),
    Str(&'a str),
    Boolean(bool),
    Nil,
}

impl Display for LiteralValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{}", s),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Nil => write!(f, "nil"),
        }
    }
}
