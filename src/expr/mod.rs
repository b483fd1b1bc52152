//! Expression language: tokenizer, parser, evaluator.
//!
//! Expressions are the glue between markup and data: `{{count + 1}}` in a
//! text node, `range(0, n)` in a `for-expr`, `done == false` in an
//! `if-expr`, `count = count + 1` in a `click-expr`. They evaluate against an
//! explicit [`Scope`](crate::scope::Scope) plus a fixed allow-list of host
//! functions, and nothing else — no ambient state is reachable.

pub mod eval;
pub mod parser;
pub mod tokenizer;

pub use eval::{evaluate, execute, Host, Builtins};
pub use parser::{parse_expression, parse_statement, BinaryOp, Expr, Stmt, UnaryOp};
