//! Expression grammar and evaluation (spec.md §4.2): `path [ op rhs ]`,
//! comparison semantics (type rank ordering, within-rank rules), and
//! truthiness — used by `sort`, `filter`, and operator-less jump/query
//! expressions.

use std::cmp::Ordering;

use serde_json::Value;

use crate::path::{self, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone)]
pub enum Rhs {
    Path(Path),
    Literal(Value),
}

#[derive(Debug, Clone)]
pub struct Expression {
    pub path: Path,
    pub comparison: Option<(Op, Rhs)>,
}

/// Parse an expression: a path, optionally followed by a comparison
/// operator and a right-hand side (another path, or a JSON literal).
pub fn parse_expression(input: &str) -> Expression {
    let (path, rest) = path::parse_path(input);
    let rest = rest.trim_start();
    let Some((op, after_op)) = parse_op(rest) else {
        return Expression {
            path,
            comparison: None,
        };
    };
    let after_op = after_op.trim_start();
    let rhs = parse_rhs(after_op);
    Expression {
        path,
        comparison: Some((op, rhs)),
    }
}

fn parse_op(input: &str) -> Option<(Op, &str)> {
    const OPS: &[(&str, Op)] = &[
        ("==", Op::Eq),
        ("!=", Op::Ne),
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("<", Op::Lt),
        (">", Op::Gt),
    ];
    for (text, op) in OPS {
        if let Some(rest) = input.strip_prefix(text) {
            return Some((*op, rest));
        }
    }
    None
}

fn parse_rhs(input: &str) -> Rhs {
    if let Ok(v) = serde_json::from_str::<Value>(input.trim()) {
        return Rhs::Literal(v);
    }
    let (path, _rest) = path::parse_path(input);
    if path.is_empty() {
        Rhs::Literal(Value::String(input.trim().to_string()))
    } else {
        Rhs::Path(path)
    }
}

/// Evaluate an expression's truth value against `root`.
pub fn eval_truthy(root: &Value, expr: &Expression) -> bool {
    let Some(lhs) = path::eval(root, &expr.path) else {
        return false;
    };
    match &expr.comparison {
        None => truthy(lhs),
        Some((op, rhs)) => {
            let rhs_value = match rhs {
                Rhs::Literal(v) => v.clone(),
                Rhs::Path(p) => match path::eval(root, p) {
                    Some(v) => v.clone(),
                    None => return false,
                },
            };
            let ord = compare(lhs, &rhs_value);
            matches!(
                (op, ord),
                (Op::Eq, Ordering::Equal)
                    | (Op::Ne, Ordering::Less | Ordering::Greater)
                    | (Op::Lt, Ordering::Less)
                    | (Op::Le, Ordering::Less | Ordering::Equal)
                    | (Op::Gt, Ordering::Greater)
                    | (Op::Ge, Ordering::Greater | Ordering::Equal)
            )
        }
    }
}

/// Truthiness predicate (spec.md §4.2): null/false/0/0.0/empty-string/
/// empty-container are false, everything else is true.
pub fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i != 0
            } else if let Some(u) = n.as_u64() {
                u != 0
            } else {
                n.as_f64().is_some_and(|f| f != 0.0)
            }
        }
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order comparison per spec.md §4.2's type rank and within-rank
/// rules. `compare(a, b) == -compare(b, a)` for all `a`, `b`.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    let (ra, rb) = (type_rank(a), type_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (fx, fy) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            fx.partial_cmp(&fy).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            x.as_bytes().cmp(y.as_bytes()).then(x.len().cmp(&y.len()))
        }
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()),
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => unreachable!("type ranks matched so variants must match"),
    }
}
