mod expr;
mod stmt;

pub use expr::{Expr, LiteralValue};
pub use stmt::Stmt;

use errors::{Result, SiltError, SiltErrors};
use scanner::{token::TokenData, Token};

use TokenData::*;

#[derive(Debug)]
pub struct ParserError<'a> {
    kind: ParserErrorKind,
    token: Token<'a>,
}

impl<'a> ParserError<'a> {
    fn new(kind: ParserErrorKind, token: Token<'a>) -> Self {
        Self { kind, token }
    }
}

impl From<ParserError<'_>> for SiltError {
    fn from(error: ParserError<'_>) -> Self {
        let location = match error.token.data {
            Eof => " at end".to_string(),
            _ => format!(" at '{}'", error.token.lexeme()),
        };
        SiltError::new(
            error.token.line(),
            error.token.col(),
            format!("{}{}", error.kind, location),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParserErrorKind {
    #[error("Missing opening `(` before condition")]
    MissingLeftParen,
    #[error("Missing closing `)` after expression")]
    MissingRightParen,
    #[error("Expected expression")]
    ExpectedExpression,
    #[error("Expected ';' after expression")]
    ExpectedSemicolon,
    #[error("Expected variable name")]
    ExpectedVariableName,
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("Expected '}}' after block")]
    ExpectedRightBrace,
    #[error("Expected ':' after ternary then-branch")]
    ExpectedColon,
}

/// Recursive-descent parser over the scanned tokens, one production per
/// precedence level. A malformed statement is recorded and skipped via
/// synchronization, so everything that did parse is still returned.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        debug_assert!(
            matches!(tokens.last().map(|t| &t.data), Some(Eof)),
            "token sequence must end with Eof"
        );
        Self { tokens, current: 0 }
    }

    pub fn parse(mut self) -> (Vec<Stmt<'a>>, SiltErrors) {
        let mut stmts = Vec::new();
        let mut errors = SiltErrors::default();
        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => {
                    log::trace!("parsed {stmt}");
                    stmts.push(stmt);
                }
                Err(e) => {
                    errors.push(e);
                    self.synchronize();
                }
            }
        }
        (stmts, errors)
    }

    fn declaration(&mut self) -> Result<Stmt<'a>> {
        if self.consume_if(Var).is_some() {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>> {
        let name = self.consume_or_error(Identifier, ParserErrorKind::ExpectedVariableName)?;

        let initializer = match self.consume_if(Equal) {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        self.consume_or_error(Semicolon, ParserErrorKind::ExpectedSemicolon)?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt<'a>> {
        if let Some(keyword) = self.consume_if(Print) {
            return self.print_statement(keyword);
        }

        if self.consume_if(LeftBrace).is_some() {
            return self.block();
        }

        if self.consume_if(If).is_some() {
            return self.if_statement();
        }

        if self.consume_if(While).is_some() {
            return self.while_statement();
        }

        self.expression_statement()
    }

    fn print_statement(&mut self, keyword: Token<'a>) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorKind::ExpectedSemicolon)?;

        Ok(Stmt::Print { keyword, value })
    }

    fn block(&mut self) -> Result<Stmt<'a>> {
        let mut stmts = Vec::new();

        while !matches!(self.peek(), RightBrace | Eof) {
            stmts.push(self.declaration()?);
        }

        self.consume_or_error(RightBrace, ParserErrorKind::ExpectedRightBrace)?;
        Ok(Stmt::Block(stmts))
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume_or_error(LeftParen, ParserErrorKind::MissingLeftParen)?;
        let condition = self.expression()?;
        self.consume_or_error(RightParen, ParserErrorKind::MissingRightParen)?;

        let then_branch = Box::new(self.statement()?);

        let else_branch = match self.consume_if(Else) {
            Some(_) => Some(Box::new(self.statement()?)),
            None => None,
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn while_statement(&mut self) -> Result<Stmt<'a>> {
        self.consume_or_error(LeftParen, ParserErrorKind::MissingLeftParen)?;
        let condition = self.expression()?;
        self.consume_or_error(RightParen, ParserErrorKind::MissingRightParen)?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>> {
        let value = self.expression()?;

        self.consume_or_error(Semicolon, ParserErrorKind::ExpectedSemicolon)?;

        Ok(Stmt::Expression(value))
    }

    fn expression(&mut self) -> Result<Expr<'a>> {
        self.comma()
    }

    fn comma(&mut self) -> Result<Expr<'a>> {
        let first = self.assignment()?;

        if self.peek() != &Comma {
            return Ok(first);
        }

        let mut exprs = vec![first];
        while self.consume_if(Comma).is_some() {
            exprs.push(self.assignment()?);
        }
        Ok(Expr::Comma(exprs))
    }

    fn assignment(&mut self) -> Result<Expr<'a>> {
        let expr = self.ternary()?;

        if let Some(equals) = self.consume_if(Equal) {
            let value = Box::new(self.assignment()?);

            if let Expr::Variable(name) = expr {
                return Ok(Expr::Assign { name, value });
            }

            // Reported at the `=` token; synchronization takes it from here.
            return Err(ParserError::new(ParserErrorKind::InvalidAssignmentTarget, equals).into());
        }

        Ok(expr)
    }

    fn ternary(&mut self) -> Result<Expr<'a>> {
        let expr = self.logic_or()?;

        if self.consume_if(Question).is_some() {
            let if_true = Box::new(self.expression()?);
            self.consume_or_error(Colon, ParserErrorKind::ExpectedColon)?;
            // Recursing into ternary (not logic_or) makes `?:` right-associative.
            let if_false = Box::new(self.ternary()?);
            return Ok(Expr::Ternary { condition: Box::new(expr), if_true, if_false });
        }

        Ok(expr)
    }

    fn logic_or(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.logic_and()?;

        while let Some(operator) = self.consume_if(Or) {
            let right = Box::new(self.logic_and()?);
            expr = Expr::Logical { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.equality()?;

        while let Some(operator) = self.consume_if(And) {
            let right = Box::new(self.equality()?);
            expr = Expr::Logical { left: Box::new(expr), operator, right };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.comparison()?;

        while matches!(self.peek(), BangEqual | EqualEqual) {
            let operator = self.advance();
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.term()?;

        while matches!(self.peek(), Greater | GreaterEqual | Less | LessEqual) {
            let operator = self.advance();
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.factor()?;

        while matches!(self.peek(), Plus | Minus) {
            let operator = self.advance();
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>> {
        let mut expr = self.unary()?;

        while matches!(self.peek(), Star | Slash) {
            let operator = self.advance();
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>> {
        if matches!(self.peek(), Minus | Bang) {
            let operator = self.advance();
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr<'a>> {
        let token = self.peek_token().clone();
        let expr = match &token.data {
            False => Expr::Literal(LiteralValue::Boolean(false)),
            True => Expr::Literal(LiteralValue::Boolean(true)),
            Nil => Expr::Literal(LiteralValue::Nil),
            Number(n) => Expr::Literal(LiteralValue::Number(*n)),
            Str(s) => Expr::Literal(LiteralValue::Str(*s)),
            Identifier => Expr::Variable(token.clone()),
            LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume_or_error(RightParen, ParserErrorKind::MissingRightParen)?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            // The offending token stays put, synchronization decides how
            // far to skip.
            _ => return Err(ParserError::new(ParserErrorKind::ExpectedExpression, token).into()),
        };
        self.advance();
        Ok(expr)
    }

    /// Discards tokens until a statement boundary: just past a `;`, or right
    /// before a token that starts a new statement.
    fn synchronize(&mut self) {
        log::debug!("synchronizing parser at line {}", self.peek_token().line());

        let mut previous = self.advance();
        while !self.is_at_end() {
            if previous.data == Semicolon {
                return;
            }
            match self.peek() {
                Class | Fun | For | If | Print | Return | Var | While => return,
                _ => previous = self.advance(),
            }
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek_token(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn peek(&self) -> &TokenData<'a> {
        &self.peek_token().data
    }

    /// Returns the current token; moves on unless already at `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn consume_if(&mut self, data: TokenData<'a>) -> Option<Token<'a>> {
        debug_assert!(!matches!(data, Number(_) | Str(_)));
        (self.peek() == &data).then(|| self.advance())
    }

    fn consume_or_error(
        &mut self,
        data: TokenData<'a>,
        kind: ParserErrorKind,
    ) -> Result<Token<'a>> {
        match self.consume_if(data) {
            Some(token) => Ok(token),
            None => Err(ParserError::new(kind, self.peek_token().clone()).into()),
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek() == &Eof
    }
}

#[cfg(test)]
mod tests {
    use cursor::{Col, Line};
    use pretty_assertions::assert_eq;
    use scanner::Scanner;

    use super::*;

    fn parse(source: &str) -> (Vec<Stmt>, SiltErrors) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        assert_eq!(scan_errors, SiltErrors::default(), "unexpected scan errors");
        Parser::new(tokens).parse()
    }

    fn parse_ok(source: &str) -> Vec<Stmt> {
        let (stmts, errors) = parse(source);
        assert_eq!(errors, SiltErrors::default(), "unexpected parse errors");
        stmts
    }

    fn expr_ast(source: &str) -> String {
        let source = format!("{source};");
        let stmts = parse_ok(&source);
        match stmts.as_slice() {
            [Stmt::Expression(e)] => e.to_string(),
            other => panic!("expected a single expression statement, got {other:?}"),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(expr_ast("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(expr_ast("(1 + 2) * 3"), "(* (group (+ 1 2)) 3)");
        assert_eq!(expr_ast("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(expr_ast("1 < 2 == true"), "(== (< 1 2) true)");
        assert_eq!(expr_ast("-1 * !x"), "(* (- 1) (! x))");
    }

    #[test]
    fn unary_is_right_associative() {
        assert_eq!(expr_ast("!!x"), "(! (! x))");
        assert_eq!(expr_ast("--1"), "(- (- 1))");
    }

    #[test]
    fn logical_precedence() {
        assert_eq!(expr_ast("a or b and c"), "(or a (and b c))");
        assert_eq!(expr_ast("a and b or c"), "(or (and a b) c)");
    }

    #[test]
    fn ternary_is_right_associative() {
        assert_eq!(expr_ast("a ? b : c ? d : e"), "(ternary a b (ternary c d e))");
        assert_eq!(expr_ast("a ? b ? c : d : e"), "(ternary a (ternary b c d) e)");
    }

    #[test]
    fn comma_sequences() {
        assert_eq!(expr_ast("1, 2, 3"), "(comma 1 2 3)");
        // Comma binds looser than assignment.
        assert_eq!(expr_ast("a = 1, b = 2"), "(comma (assign a 1) (assign b 2))");
    }

    #[test]
    fn assignment_chains() {
        assert_eq!(expr_ast("a = b = 3"), "(assign a (assign b 3))");
    }

    #[test]
    fn invalid_assignment_target() {
        let (_, errors) = parse("1 = 2;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(
                Line(1),
                Col(3),
                "Invalid assignment target at '='"
            )])
        );
    }

    #[test]
    fn statements_render() {
        assert_eq!(parse_ok("var a;")[0].to_string(), "(var a)");
        assert_eq!(parse_ok("var a = 1 + 2;")[0].to_string(), "(var a (+ 1 2))");
        assert_eq!(parse_ok("print x;")[0].to_string(), "(print x)");
        assert_eq!(parse_ok("{ var a = 1; print a; }")[0].to_string(), "(block (var a 1) (print a))");
        assert_eq!(parse_ok("{}")[0].to_string(), "(block)");
        assert_eq!(
            parse_ok("while (x < 3) x = x + 1;")[0].to_string(),
            "(while (< x 3) (expr (assign x (+ x 1))))"
        );
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        assert_eq!(
            parse_ok("if (a) if (b) print 1; else print 2;")[0].to_string(),
            "(if a (if b (print 1) (print 2)))"
        );
    }

    #[test]
    fn missing_semicolon() {
        let (_, errors) = parse("print 1");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(
                Line(1),
                Col(8),
                "Expected ';' after expression at end"
            )])
        );
    }

    #[test]
    fn expected_expression() {
        let (_, errors) = parse("print ;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(Line(1), Col(7), "Expected expression at ';'")])
        );
    }

    #[test]
    fn ternary_missing_colon() {
        let (_, errors) = parse("a ? b;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(
                Line(1),
                Col(6),
                "Expected ':' after ternary then-branch at ';'"
            )])
        );
    }

    #[test]
    fn structural_error_messages() {
        let (_, errors) = parse("if x) print 1;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(
                Line(1),
                Col(4),
                "Missing opening `(` before condition at 'x'"
            )])
        );

        let (_, errors) = parse("(1;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(
                Line(1),
                Col(3),
                "Missing closing `)` after expression at ';'"
            )])
        );

        let (_, errors) = parse("{ print 1;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(Line(1), Col(11), "Expected '}' after block at end")])
        );

        let (_, errors) = parse("var 1;");
        assert_eq!(
            errors,
            SiltErrors(vec![SiltError::new(Line(1), Col(5), "Expected variable name at '1'")])
        );
    }

    #[test]
    fn synchronize_after_error() {
        let (_, errors) = parse("var a = 1 var b = 2;\nvar c = 3");
        assert_eq!(
            errors,
            SiltErrors(vec![
                SiltError::new(Line(1), Col(11), "Expected ';' after expression at 'var'"),
                SiltError::new(Line(2), Col(10), "Expected ';' after expression at end"),
            ])
        );
    }

    #[test]
    fn recovery_keeps_later_statements() {
        let (stmts, errors) = parse("1 +;\nprint 2;");
        assert_eq!(errors.len(), 1);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].to_string(), "(print 2)");
    }
}
