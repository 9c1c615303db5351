use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use scanner::Token;

use crate::Expr;

#[derive(Debug)]
pub enum Stmt<'a> {
    Expression(Expr<'a>),
    /// The keyword token is kept so output faults can be located.
    Print { keyword: Token<'a>, value: Expr<'a> },
    Var { name: Token<'a>, initializer: Option<Expr<'a>> },
    Block(Vec<Stmt<'a>>),
    If { condition: Expr<'a>, then_branch: Box<Stmt<'a>>, else_branch: Option<Box<Stmt<'a>>> },
    While { condition: Expr<'a>, body: Box<Stmt<'a>> },
}

// Prefix rendering matching Expr, used by `--print-ast` and trace logging.
impl Display for Stmt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "(expr {})", expr),
            Stmt::Print { value, .. } => write!(f, "(print {})", value),
            Stmt::Var { name, initializer: Some(init) } => {
                write!(f, "(var {} {})", name.lexeme(), init)
            }
            Stmt::Var { name, initializer: None } => write!(f, "(var {})", name.lexeme()),
            Stmt::Block(stmts) => {
                if stmts.is_empty() {
                    write!(f, "(block)")
                } else {
                    write!(f, "(block {})", stmts.iter().map(|s| s.to_string()).join(" "))
                }
            }
            Stmt::If { condition, then_branch, else_branch: None } => {
                write!(f, "(if {} {})", condition, then_branch)
            }
            Stmt::If { condition, then_branch, else_branch: Some(else_branch) } => {
                write!(f, "(if {} {} {})", condition, then_branch, else_branch)
            }
            Stmt::While { condition, body } => write!(f, "(while {} {})", condition, body),
        }
    }
}
