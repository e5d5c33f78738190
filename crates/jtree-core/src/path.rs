//! Path grammar: `segment ( ('.' segment) | ('[' integer ']') )*`.
//!
//! Grounded on `rsonpath-lib`'s use of `nom` for its JSONPath-like query
//! grammar (this workspace's teacher has no tree-path parser of its own to
//! generalize, so the parsing *approach* — small `nom` combinators, one per
//! grammar production — is borrowed from the pack's JSONPath engine rather
//! than the teacher).
//!
//! The parser is greedy and never fails: any input that begins with a
//! valid path is consumed as far as possible, and the unconsumed remainder
//! is handed back so expression parsing (spec.md §4.2) can chain a
//! comparison operator after it.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char as nchar, digit1},
    combinator::{map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use serde_json::Value;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// An ordered sequence of path steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(pub Vec<Step>);

impl Path {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn push(&mut self, step: Step) {
        self.0.push(step);
    }

    /// Render back to the dotted/indexed textual form, e.g. `a.b[2]`.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (i, step) in self.0.iter().enumerate() {
            match step {
                Step::Key(k) => {
                    if i > 0 {
                        out.push('.');
                    }
                    if is_bare_ident(k) {
                        out.push_str(k);
                    } else {
                        out.push('"');
                        out.push_str(&k.replace('"', "\\\""));
                        out.push('"');
                    }
                }
                Step::Index(idx) => {
                    out.push('[');
                    out.push_str(&idx.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

fn is_bare_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Greedily parse a leading path out of `input`, returning the path and the
/// unconsumed remainder. Always succeeds: if no path prefix matches, an
/// empty path and the original input are returned.
pub fn parse_path(input: &str) -> (Path, &str) {
    match full_path(input) {
        Ok((rest, path)) => (path, rest),
        Err(_) => (Path::default(), input),
    }
}

fn full_path(input: &str) -> IResult<&str, Path> {
    let (rest, first) = first_step(input)?;
    let (rest, more) = many0(more_step).parse(rest)?;
    let mut steps = vec![first];
    steps.extend(more);
    Ok((rest, Path::new(steps)))
}

fn first_step(input: &str) -> IResult<&str, Step> {
    alt((bracket_index, map(segment_text, Step::Key))).parse(input)
}

fn more_step(input: &str) -> IResult<&str, Step> {
    alt((
        bracket_index,
        preceded(nchar('.'), map(segment_text, Step::Key)),
    ))
    .parse(input)
}

fn bracket_index(input: &str) -> IResult<&str, Step> {
    delimited(
        nchar('['),
        map_res(digit1, |s: &str| s.parse::<usize>().map(Step::Index)),
        nchar(']'),
    )
    .parse(input)
}

fn segment_text(input: &str) -> IResult<&str, String> {
    alt((quoted_string, map(bare_ident, str::to_string))).parse(input)
}

fn bare_ident(input: &str) -> IResult<&str, &str> {
    recognize(take_while1(|c: char| {
        c.is_alphanumeric() || c == '_' || c == '-'
    }))
    .parse(input)
}

fn quoted_string(input: &str) -> IResult<&str, String> {
    alt((double_quoted, single_quoted)).parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    let (rest, inner) = delimited(
        nchar('"'),
        recognize(many0(alt((
            recognize(pair(nchar('\\'), nchar('"'))),
            is_not("\""),
        )))),
        nchar('"'),
    )
    .parse(input)?;
    Ok((rest, inner.replace("\\\"", "\"")))
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    let (rest, inner) = delimited(
        nchar('\''),
        recognize(many0(alt((
            recognize(pair(nchar('\\'), nchar('\''))),
            is_not("'"),
        )))),
        nchar('\''),
    )
    .parse(input)?;
    Ok((rest, inner.replace("\\'", "'")))
}

/// Evaluate a path against a value. Any step that cannot be resolved
/// (object step on a non-object, index step on a non-array, missing key,
/// out-of-range index) yields `None` and no later step is attempted.
pub fn eval<'v>(root: &'v Value, path: &Path) -> Option<&'v Value> {
    let mut current = root;
    for step in &path.0 {
        current = match (step, current) {
            (Step::Key(k), Value::Object(map)) => map.get(k)?,
            (Step::Index(i), Value::Array(arr)) => arr.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Like [`eval`], but returns a mutable reference so the command
/// dispatcher's `sort`/`filter` handlers can rewrite a container in place.
pub fn eval_mut<'v>(root: &'v mut Value, path: &Path) -> Option<&'v mut Value> {
    let mut current = root;
    for step in &path.0 {
        current = match (step, current) {
            (Step::Key(k), Value::Object(map)) => map.get_mut(k)?,
            (Step::Index(i), Value::Array(arr)) => arr.get_mut(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Build the path from `root` down to `target`, where `target` is reached
/// by following `steps` (used by the navigation engine to serialize a nav
/// item's position for cursor preservation across rebuilds).
pub fn steps_to_path(steps: Vec<Step>) -> Path {
    Path::new(steps)
}
