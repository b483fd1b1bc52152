//! Recursive descent expression parser.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! stmt    := path "=" expr | expr
//! expr    := or
//! or      := and ( "||" and )*
//! and     := cmp ( "&&" cmp )*
//! cmp     := add ( ("=="|"!="|"<"|"<="|">"|">=") add )?
//! add     := mul ( ("+"|"-") mul )*
//! mul     := unary ( ("*"|"/") unary )*
//! unary   := ("-"|"!") unary | primary
//! primary := int | float | string | "true" | "false" | "null"
//!          | ident "(" args ")" | path | "(" expr ")"
//! path    := ident ( "." ident )*
//! ```
//!
//! Parse failures are [`Error::Expression`]s carrying the full source text.

use crate::error::{Error, Result};
use crate::expr::tokenizer::{tokenize, Token};
use crate::value::Value;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// A dotted name path; the head resolves through the scope.
    Path(Vec<String>),
    /// Unary application.
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary application.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Host function call by name.
    Call { name: String, args: Vec<Expr> },
}

/// A statement: either an assignment into the store namespace, or a bare
/// expression evaluated for its effects.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { path: Vec<String>, value: Expr },
    Expr(Expr),
}

/// Parse `src` as a single expression; trailing tokens are an error.
pub fn parse_expression(src: &str) -> Result<Expr> {
    let mut parser = Parser::new(src)?;
    let expr = parser.expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Parse `src` as a statement (assignment or expression).
pub fn parse_statement(src: &str) -> Result<Stmt> {
    let mut parser = Parser::new(src)?;
    // An assignment looks like `path = expr` where `=` is not `==`; try that
    // shape first, rewinding if it does not fit.
    let start = parser.pos;
    if let Some(path) = parser.try_path() {
        if parser.eat(Token::Assign) {
            let value = parser.expr()?;
            parser.expect_eof()?;
            return Ok(Stmt::Assign { path, value });
        }
        parser.pos = start;
    }
    let expr = parser.expr()?;
    parser.expect_eof()?;
    Ok(Stmt::Expr(expr))
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<(Token, String)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self> {
        let tokens = tokenize(src).map_err(|offset| {
            Error::expression(src, format!("unrecognized input at byte {offset}"))
        })?;
        Ok(Self { src, tokens, pos: 0 })
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::expression(self.src, message)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn advance(&mut self) -> Option<&(Token, String)> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token if it matches.
    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<String> {
        match self.advance().cloned() {
            Some((t, text)) if t == token => Ok(text),
            Some((_, text)) => Err(self.err(format!("expected {what}, found `{text}`"))),
            None => Err(self.err(format!("expected {what}, found end of input"))),
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.tokens.get(self.pos) {
            None => Ok(()),
            Some((_, text)) => Err(self.err(format!("unexpected trailing `{text}`"))),
        }
    }

    /// Try to consume `ident (. ident)*`; rewinds and returns `None` if the
    /// next token is not an identifier.
    fn try_path(&mut self) -> Option<Vec<String>> {
        let start = self.pos;
        if self.peek() != Some(Token::Ident) {
            return None;
        }
        let mut segments = vec![self.advance().map(|(_, s)| s.clone())?];
        while self.eat(Token::Dot) {
            match self.peek() {
                Some(Token::Ident) => {
                    segments.push(self.advance().map(|(_, s)| s.clone()).unwrap_or_default());
                }
                _ => {
                    self.pos = start;
                    return None;
                }
            }
        }
        Some(segments)
    }

    fn expr(&mut self) -> Result<Expr> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr> {
        let mut left = self.and_expr()?;
        while self.eat(Token::OrOr) {
            let right = self.and_expr()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Expr> {
        let mut left = self.cmp_expr()?;
        while self.eat(Token::AndAnd) {
            let right = self.cmp_expr()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    /// Comparisons are non-associative: `a < b < c` is a parse error.
    fn cmp_expr(&mut self) -> Result<Expr> {
        let left = self.add_expr()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::NotEq,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.add_expr()?;
        Ok(binary(op, left, right))
    }

    fn add_expr(&mut self) -> Result<Expr> {
        let mut left = self.mul_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.mul_expr()?;
            left = binary(op, left, right);
        }
    }

    fn mul_expr(&mut self) -> Result<Expr> {
        let mut left = self.unary_expr()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary_expr()?;
            left = binary(op, left, right);
        }
    }

    fn unary_expr(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Bang) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            let operand = self.unary_expr()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Int) => {
                let text = self.advance().map(|(_, s)| s.clone()).unwrap_or_default();
                let value = text
                    .parse::<i64>()
                    .map_err(|_| self.err(format!("integer `{text}` out of range")))?;
                Ok(Expr::Literal(Value::Int(value)))
            }
            Some(Token::Float) => {
                let text = self.advance().map(|(_, s)| s.clone()).unwrap_or_default();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| self.err(format!("bad float `{text}`")))?;
                Ok(Expr::Literal(Value::Float(value)))
            }
            Some(Token::StringLiteral) | Some(Token::StringLiteralSingle) => {
                let text = self.advance().map(|(_, s)| s.clone()).unwrap_or_default();
                // Strip the surrounding quotes.
                let inner = &text[1..text.len() - 1];
                Ok(Expr::Literal(Value::Str(inner.to_owned())))
            }
            Some(Token::ParenOpen) => {
                self.pos += 1;
                let inner = self.expr()?;
                self.expect(Token::ParenClose, "`)`")?;
                Ok(inner)
            }
            Some(Token::Ident) => self.ident_expr(),
            Some(_) => {
                let text = self.tokens[self.pos].1.clone();
                Err(self.err(format!("unexpected `{text}`")))
            }
            None => Err(self.err("unexpected end of input")),
        }
    }

    /// Keyword literal, host call, or dotted path — all start with an ident.
    fn ident_expr(&mut self) -> Result<Expr> {
        let name = self.expect(Token::Ident, "identifier")?;
        match name.as_str() {
            "true" => return Ok(Expr::Literal(Value::Bool(true))),
            "false" => return Ok(Expr::Literal(Value::Bool(false))),
            "null" => return Ok(Expr::Literal(Value::Null)),
            _ => {}
        }

        if self.eat(Token::ParenOpen) {
            let mut args = Vec::new();
            if !self.eat(Token::ParenClose) {
                loop {
                    args.push(self.expr()?);
                    if self.eat(Token::ParenClose) {
                        break;
                    }
                    self.expect(Token::Comma, "`,` or `)`")?;
                }
            }
            return Ok(Expr::Call { name, args });
        }

        let mut segments = vec![name];
        while self.eat(Token::Dot) {
            segments.push(self.expect(Token::Ident, "property name after `.`")?);
        }
        Ok(Expr::Path(segments))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Expr {
        Expr::Path(segments.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse_expression("42").unwrap(), Expr::Literal(Value::Int(42)));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse_expression("1.5").unwrap(), Expr::Literal(Value::Float(1.5)));
    }

    #[test]
    fn literal_keywords() {
        assert_eq!(parse_expression("true").unwrap(), Expr::Literal(Value::Bool(true)));
        assert_eq!(parse_expression("false").unwrap(), Expr::Literal(Value::Bool(false)));
        assert_eq!(parse_expression("null").unwrap(), Expr::Literal(Value::Null));
    }

    #[test]
    fn literal_strings() {
        assert_eq!(
            parse_expression(r#""hi""#).unwrap(),
            Expr::Literal(Value::from("hi"))
        );
        assert_eq!(
            parse_expression("'hi'").unwrap(),
            Expr::Literal(Value::from("hi"))
        );
    }

    #[test]
    fn dotted_path() {
        assert_eq!(
            parse_expression("user.address.city").unwrap(),
            path(&["user", "address", "city"])
        );
    }

    #[test]
    fn precedence_mul_over_add() {
        let expr = parse_expression("a + b * c").unwrap();
        match expr {
            Expr::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn parens_override_precedence() {
        let expr = parse_expression("(a + b) * c").unwrap();
        match expr {
            Expr::Binary { op: BinaryOp::Mul, left, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn comparison_over_logic() {
        let expr = parse_expression("a < 3 && b == 1").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn chained_comparison_rejected() {
        assert!(parse_expression("a < b < c").is_err());
    }

    #[test]
    fn unary_nesting() {
        let expr = parse_expression("!!done").unwrap();
        assert!(matches!(
            expr,
            Expr::Unary { op: UnaryOp::Not, .. }
        ));
        let expr = parse_expression("-x").unwrap();
        assert!(matches!(expr, Expr::Unary { op: UnaryOp::Neg, .. }));
    }

    #[test]
    fn call_no_args() {
        assert_eq!(
            parse_expression("now()").unwrap(),
            Expr::Call { name: "now".into(), args: vec![] }
        );
    }

    #[test]
    fn call_with_args() {
        assert_eq!(
            parse_expression("range(0, 3)").unwrap(),
            Expr::Call {
                name: "range".into(),
                args: vec![Expr::Literal(Value::Int(0)), Expr::Literal(Value::Int(3))],
            }
        );
    }

    #[test]
    fn trailing_tokens_rejected() {
        assert!(parse_expression("a b").is_err());
        assert!(parse_expression("1 2").is_err());
    }

    #[test]
    fn empty_input_rejected() {
        assert!(parse_expression("").is_err());
        assert!(parse_expression("   ").is_err());
    }

    #[test]
    fn garbage_carries_expression_text() {
        let err = parse_expression("a + @").unwrap_err();
        assert!(err.to_string().contains("a + @"));
    }

    #[test]
    fn statement_assignment() {
        assert_eq!(
            parse_statement("count = count + 1").unwrap(),
            Stmt::Assign {
                path: vec!["count".into()],
                value: Expr::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(path(&["count"])),
                    right: Box::new(Expr::Literal(Value::Int(1))),
                },
            }
        );
    }

    #[test]
    fn statement_nested_assignment_target() {
        let stmt = parse_statement("user.name = 'bo'").unwrap();
        assert!(matches!(stmt, Stmt::Assign { ref path, .. } if path == &["user", "name"]));
    }

    #[test]
    fn statement_bare_expression() {
        let stmt = parse_statement("publish('t', 1)").unwrap();
        assert!(matches!(stmt, Stmt::Expr(Expr::Call { .. })));
    }

    #[test]
    fn statement_equality_is_not_assignment() {
        let stmt = parse_statement("a == b").unwrap();
        assert!(matches!(stmt, Stmt::Expr(Expr::Binary { op: BinaryOp::Eq, .. })));
    }

    #[test]
    fn assignment_to_call_rejected() {
        assert!(parse_statement("range(0) = 1").is_err());
    }
}
