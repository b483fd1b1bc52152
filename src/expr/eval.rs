//! Tree-walking evaluator over [`Value`].
//!
//! Evaluation is sandboxed: an expression can see the scope it is handed,
//! the host-function allow-list, and nothing else. The [`Host`] trait is the
//! allow-list seam — the view controller's host exposes `range` and
//! `publish`; unit tests use [`Builtins`] (`range` only).
//!
//! [`execute`] is the statement form used by UI actions: an assignment
//! writes through the store (triggering its mutation notification), a bare
//! expression runs for its side effects.

use crate::error::{Error, Result};
use crate::expr::parser::{parse_expression, parse_statement, BinaryOp, Expr, Stmt, UnaryOp};
use crate::scope::Scope;
use crate::store::Store;
use crate::value::Value;

/// Host-function allow-list visible inside expressions.
///
/// `call` receives already-evaluated arguments. Errors are plain messages;
/// the evaluator wraps them with the offending expression text.
pub trait Host {
    fn call(&self, name: &str, args: Vec<Value>) -> std::result::Result<Value, String>;
}

/// Minimal host: `range` only. The view controller layers `publish` on top.
#[derive(Debug, Default, Clone, Copy)]
pub struct Builtins;

impl Host for Builtins {
    fn call(&self, name: &str, args: Vec<Value>) -> std::result::Result<Value, String> {
        match name {
            "range" => range(&args),
            other => Err(format!("unknown function `{other}`")),
        }
    }
}

/// `range(start, stop[, step])`: ordered list of ints, stop exclusive.
///
/// A negative step counts down. Step zero is an error.
pub fn range(args: &[Value]) -> std::result::Result<Value, String> {
    let int_arg = |value: &Value, position: &str| match value {
        Value::Int(i) => Ok(*i),
        other => Err(format!("range {position} must be an int, got {}", other.type_name())),
    };
    let (start, stop, step) = match args {
        [start, stop] => (int_arg(start, "start")?, int_arg(stop, "stop")?, 1),
        [start, stop, step] => (
            int_arg(start, "start")?,
            int_arg(stop, "stop")?,
            int_arg(step, "step")?,
        ),
        _ => return Err(format!("range takes 2 or 3 arguments, got {}", args.len())),
    };
    if step == 0 {
        return Err("range step must not be zero".into());
    }
    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Int(current));
        current += step;
    }
    Ok(Value::List(items))
}

/// Parse and evaluate `src` against `scope`, with `host` as the allow-list.
pub fn evaluate(src: &str, scope: &Scope, host: &dyn Host) -> Result<Value> {
    let expr = parse_expression(src)?;
    eval_expr(&expr, src, scope, host)
}

/// Parse and run `src` as a statement. Assignments write through `store`;
/// bare expressions run for their effects. Returns the produced value
/// (`Null` for assignments).
pub fn execute(src: &str, scope: &Scope, host: &dyn Host, store: &Store) -> Result<Value> {
    match parse_statement(src)? {
        Stmt::Assign { path, value } => {
            // Local frames (loop variables) are per-iteration clones; only
            // the store namespace is writable.
            if scope.is_local(&path[0]) {
                return Err(Error::observation(
                    path.join("."),
                    format!("`{}` is a local binding, not a store property", path[0]),
                ));
            }
            let value = eval_expr(&value, src, scope, host)?;
            store.set(&path.join("."), value)?;
            Ok(Value::Null)
        }
        Stmt::Expr(expr) => eval_expr(&expr, src, scope, host),
    }
}

fn eval_expr(expr: &Expr, src: &str, scope: &Scope, host: &dyn Host) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Path(segments) => eval_path(segments, src, scope),
        Expr::Unary { op, operand } => {
            let value = eval_expr(operand, src, scope, host)?;
            eval_unary(*op, value, src)
        }
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, src, scope, host),
        Expr::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| eval_expr(arg, src, scope, host))
                .collect::<Result<Vec<_>>>()?;
            host.call(name, args)
                .map_err(|message| Error::expression(src, message))
        }
    }
}

fn eval_path(segments: &[String], src: &str, scope: &Scope) -> Result<Value> {
    let head = &segments[0];
    let mut current = scope.resolve(head).ok_or_else(|| Error::UnboundName {
        name: head.clone(),
        expression: src.to_owned(),
    })?;
    for segment in &segments[1..] {
        current = match current {
            Value::Map(mut entries) => entries.remove(segment).ok_or_else(|| {
                Error::expression(src, format!("no property `{segment}`"))
            })?,
            other => {
                return Err(Error::expression(
                    src,
                    format!("cannot read `{segment}` of a {}", other.type_name()),
                ));
            }
        };
    }
    Ok(current)
}

fn eval_unary(op: UnaryOp, value: Value, src: &str) -> Result<Value> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Error::expression(src, "integer overflow")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, other) => Err(Error::expression(
            src,
            format!("cannot negate a {}", other.type_name()),
        )),
        (UnaryOp::Not, other) => Err(Error::expression(
            src,
            format!("`!` needs a bool, got {}", other.type_name()),
        )),
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    src: &str,
    scope: &Scope,
    host: &dyn Host,
) -> Result<Value> {
    // Logical operators short-circuit; everything else is strict.
    if matches!(op, BinaryOp::And | BinaryOp::Or) {
        let lhs = eval_expr(left, src, scope, host)?;
        let lhs = lhs.as_bool().ok_or_else(|| {
            Error::expression(src, format!("logical operand must be bool, got {}", lhs.type_name()))
        })?;
        let short = match op {
            BinaryOp::And => !lhs,
            _ => lhs,
        };
        if short {
            return Ok(Value::Bool(lhs));
        }
        let rhs = eval_expr(right, src, scope, host)?;
        return rhs.as_bool().map(Value::Bool).ok_or_else(|| {
            Error::expression(src, format!("logical operand must be bool, got {}", rhs.type_name()))
        });
    }

    let lhs = eval_expr(left, src, scope, host)?;
    let rhs = eval_expr(right, src, scope, host)?;
    match op {
        BinaryOp::Add => add(lhs, rhs, src),
        BinaryOp::Sub => numeric(lhs, rhs, src, "-", |a, b| a - b, |a, b| {
            a.checked_sub(b).ok_or("integer overflow")
        }),
        BinaryOp::Mul => numeric(lhs, rhs, src, "*", |a, b| a * b, |a, b| {
            a.checked_mul(b).ok_or("integer overflow")
        }),
        BinaryOp::Div => numeric(lhs, rhs, src, "/", |a, b| a / b, |a, b| {
            if b == 0 {
                Err("division by zero")
            } else {
                a.checked_div(b).ok_or("integer overflow")
            }
        }),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(&lhs, &rhs))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(&lhs, &rhs))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => compare(op, lhs, rhs, src),
        BinaryOp::And | BinaryOp::Or => unreachable!("logical ops are handled above"),
    }
}

/// `+` is numeric addition, or string concatenation when either side is a
/// string (the non-string side renders via `Display`).
fn add(lhs: Value, rhs: Value, src: &str) -> Result<Value> {
    match (&lhs, &rhs) {
        (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{lhs}{rhs}"))),
        _ => numeric(lhs, rhs, src, "+", |a, b| a + b, |a, b| {
            a.checked_add(b).ok_or("integer overflow")
        }),
    }
}

fn numeric(
    lhs: Value,
    rhs: Value,
    src: &str,
    symbol: &str,
    float_op: impl Fn(f64, f64) -> f64,
    int_op: impl Fn(i64, i64) -> std::result::Result<i64, &'static str>,
) -> Result<Value> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .map_err(|message| Error::expression(src, message)),
        _ => {
            let a = lhs.as_f64().ok_or_else(|| {
                Error::expression(src, format!("`{symbol}` needs numbers, got {}", lhs.type_name()))
            })?;
            let b = rhs.as_f64().ok_or_else(|| {
                Error::expression(src, format!("`{symbol}` needs numbers, got {}", rhs.type_name()))
            })?;
            Ok(Value::Float(float_op(a, b)))
        }
    }
}

/// Equality with Int/Float cross-comparison; other types use structural
/// equality, and mismatched types are unequal.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    }
}

fn compare(op: BinaryOp, lhs: Value, rhs: Value, src: &str) -> Result<Value> {
    let ordering = match (&lhs, &rhs) {
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    let Some(ordering) = ordering else {
        return Err(Error::expression(
            src,
            format!(
                "cannot order {} and {}",
                lhs.type_name(),
                rhs.type_name()
            ),
        ));
    };
    let result = match op {
        BinaryOp::Lt => ordering.is_lt(),
        BinaryOp::Le => ordering.is_le(),
        BinaryOp::Gt => ordering.is_gt(),
        BinaryOp::Ge => ordering.is_ge(),
        _ => unreachable!("compare only handles ordering ops"),
    };
    Ok(Value::Bool(result))
}
