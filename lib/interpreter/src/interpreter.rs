use std::{io::Write, unreachable};

use cursor::Line;
use parser::{Expr, LiteralValue, Stmt};
use scanner::{token::TokenData, Token};

mod environment;
mod value;

use environment::Environment;
pub use value::Value;

/// A runtime fault: the structured error kind plus the source line of the
/// token it was raised at. Everything else that can go wrong during
/// evaluation is a logic defect and panics.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: Line,
}

impl RuntimeError {
    fn new(kind: RuntimeErrorKind, token: &Token) -> Self {
        Self { kind, line: token.line() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or strings and a number.")]
    InvalidPlusOperands,
    #[error("Cannot divide by zero.")]
    DivisionByZero,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Variable '{0}' was never initialized.")]
    UninitializedVariable(String),
    #[error("Could not write output: {0}")]
    Output(std::io::Error),
}

/// Walks statements against a persistent global environment. One instance
/// lives for a whole session, so in a REPL definitions accumulate across
/// lines and a fault on one line leaves earlier definitions intact.
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interpret(
        &mut self,
        stmts: &[Stmt],
        out: &mut impl Write,
    ) -> Result<(), RuntimeError> {
        let out: &mut dyn Write = out;
        for stmt in stmts {
            self.execute(stmt, out)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt, out: &mut dyn Write) -> Result<(), RuntimeError> {
        log::trace!("executing {stmt}");
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { keyword, value } => {
                let value = self.evaluate(value)?;
                writeln!(out, "{}", value)
                    .map_err(|e| RuntimeError::new(RuntimeErrorKind::Output(e), keyword))
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => Some(self.evaluate(init)?),
                    None => None,
                };
                self.environment.define(name.lexeme(), value);
                Ok(())
            }
            Stmt::Block(stmts) => self.execute_block(stmts, out),
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch, out)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, out)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body, out)?;
                }
                Ok(())
            }
        }
    }

    /// Runs the block in a fresh scope. The scope is popped on every exit
    /// path, including a propagating fault.
    fn execute_block(&mut self, stmts: &[Stmt], out: &mut dyn Write) -> Result<(), RuntimeError> {
        self.environment.push_scope();
        let result = stmts.iter().try_for_each(|stmt| self.execute(stmt, out));
        self.environment.pop_scope();
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        use RuntimeErrorKind::*;

        match expr {
            Expr::Literal(LiteralValue::Number(n)) => Ok((*n).into()),
            Expr::Literal(LiteralValue::Str(s)) => Ok((*s).into()),
            Expr::Literal(LiteralValue::Boolean(b)) => Ok((*b).into()),
            Expr::Literal(LiteralValue::Nil) => Ok(Value::Nil),

            Expr::Grouping(expr) => self.evaluate(expr),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (&operator.data, right) {
                    (TokenData::Minus, Value::Number(n)) => Ok((-n).into()),
                    (TokenData::Minus, _) => Err(RuntimeError::new(OperandMustBeNumber, operator)),
                    (TokenData::Bang, v) => Ok((!v.is_truthy()).into()),
                    _ => unreachable!("unary operator {:?}", operator.data),
                }
            }

            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;
                match operator.data {
                    // The deciding operand is returned as-is, not coerced
                    // to a boolean.
                    TokenData::Or if left.is_truthy() => Ok(left),
                    TokenData::And if !left.is_truthy() => Ok(left),
                    TokenData::Or | TokenData::And => self.evaluate(right),
                    _ => unreachable!("logical operator {:?}", operator.data),
                }
            }

            Expr::Ternary { condition, if_true, if_false } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(if_true)
                } else {
                    self.evaluate(if_false)
                }
            }

            Expr::Comma(exprs) => {
                let mut last = Value::Nil;
                for expr in exprs {
                    last = self.evaluate(expr)?;
                }
                Ok(last)
            }

            Expr::Variable(name) => match self.environment.get(name.lexeme()) {
                Some(Some(value)) => Ok(value.clone()),
                Some(None) => Err(RuntimeError::new(
                    UninitializedVariable(name.lexeme().to_string()),
                    name,
                )),
                None => {
                    Err(RuntimeError::new(UndefinedVariable(name.lexeme().to_string()), name))
                }
            },

            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                if self.environment.assign(name.lexeme(), value.clone()) {
                    // An assignment expression yields the assigned value,
                    // which is what makes chained assignment work.
                    Ok(value)
                } else {
                    Err(RuntimeError::new(UndefinedVariable(name.lexeme().to_string()), name))
                }
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (&left, &right, &operator.data) {
                    (Value::Number(l), Value::Number(r), TokenData::Minus) => Ok((l - r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::Star) => Ok((l * r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::Slash) => {
                        if *r == 0.0 {
                            Err(RuntimeError::new(DivisionByZero, operator))
                        } else {
                            Ok((l / r).into())
                        }
                    }

                    (Value::Number(l), Value::Number(r), TokenData::Plus) => Ok((l + r).into()),
                    (Value::Str(l), Value::Str(r), TokenData::Plus) => {
                        Ok(format!("{l}{r}").into())
                    }
                    // Mixed +: the number side is coerced to its shortest
                    // decimal text and concatenated.
                    (Value::Str(l), Value::Number(r), TokenData::Plus) => {
                        Ok(format!("{l}{r}").into())
                    }
                    (Value::Number(l), Value::Str(r), TokenData::Plus) => {
                        Ok(format!("{l}{r}").into())
                    }

                    (Value::Number(l), Value::Number(r), TokenData::Greater) => Ok((l > r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::GreaterEqual) => {
                        Ok((l >= r).into())
                    }
                    (Value::Number(l), Value::Number(r), TokenData::Less) => Ok((l < r).into()),
                    (Value::Number(l), Value::Number(r), TokenData::LessEqual) => {
                        Ok((l <= r).into())
                    }

                    (_, _, TokenData::EqualEqual) => Ok((left == right).into()),
                    (_, _, TokenData::BangEqual) => Ok((left != right).into()),

                    (_, _, TokenData::Plus) => {
                        Err(RuntimeError::new(InvalidPlusOperands, operator))
                    }
                    (
                        _,
                        _,
                        TokenData::Minus
                        | TokenData::Star
                        | TokenData::Slash
                        | TokenData::Greater
                        | TokenData::GreaterEqual
                        | TokenData::Less
                        | TokenData::LessEqual,
                    ) => Err(RuntimeError::new(OperandsMustBeNumbers, operator)),

                    _ => unreachable!("binary operator {:?}", operator.data),
                }
            }
        }
    }
}
