use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use crate::domain::{DomainError, FilterSpec};

/// A compiled query filter over JSON documents.
///
/// Supports the subset of the MongoDB query language that product filters use:
/// implicit equality, dotted paths, `$eq $ne $gt $gte $lt $lte $in $nin $all
/// $exists $regex/$options $not` on fields and `$and $or $nor` at any level.
/// Anything else is rejected at compile time so a filter is either fully
/// understood or not applied at all.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
enum Clause {
    Field { path: Vec<String>, condition: Condition },
    And(Vec<DocumentFilter>),
    Or(Vec<DocumentFilter>),
    Nor(Vec<DocumentFilter>),
}

/// All operators must hold.
#[derive(Debug, Clone)]
struct Condition {
    ops: Vec<Op>,
}

#[derive(Debug, Clone)]
enum Op {
    Eq(Value),
    Ne(Value),
    Cmp(Ordering, bool, Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    All(Vec<Value>),
    Exists(bool),
    Regex(Regex),
    Not(Box<Condition>),
}

impl DocumentFilter {
    pub fn compile(filter: &FilterSpec) -> Result<Self, DomainError> {
        Self::compile_map(filter.as_map())
    }

    fn compile_map(map: &Map<String, Value>) -> Result<Self, DomainError> {
        let mut clauses = Vec::with_capacity(map.len());

        for (key, value) in map {
            let clause = match key.as_str() {
                "$and" => Clause::And(compile_list(key, value)?),
                "$or" => Clause::Or(compile_list(key, value)?),
                "$nor" => Clause::Nor(compile_list(key, value)?),
                op if op.starts_with('$') => {
                    return Err(DomainError::invalid_input(format!(
                        "Unsupported top-level operator: {}",
                        op
                    )))
                }
                field => Clause::Field {
                    path: field.split('.').map(str::to_string).collect(),
                    condition: compile_condition(field, value)?,
                },
            };
            clauses.push(clause);
        }

        Ok(Self { clauses })
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Field { path, condition } => {
                let mut candidates = Vec::new();
                collect_values(document, path, &mut candidates);
                condition.matches(&candidates)
            }
            Clause::And(filters) => filters.iter().all(|f| f.matches(document)),
            Clause::Or(filters) => filters.iter().any(|f| f.matches(document)),
            Clause::Nor(filters) => !filters.iter().any(|f| f.matches(document)),
        })
    }
}

fn compile_list(op: &str, value: &Value) -> Result<Vec<DocumentFilter>, DomainError> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| DomainError::invalid_input(format!("{} expects a non-empty array", op)))?;

    items
        .iter()
        .map(|item| match item {
            Value::Object(map) => DocumentFilter::compile_map(map),
            _ => Err(DomainError::invalid_input(format!(
                "{} entries must be objects",
                op
            ))),
        })
        .collect()
}

fn is_operator_object(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| k.starts_with('$'))
}

fn compile_condition(field: &str, value: &Value) -> Result<Condition, DomainError> {
    match value {
        Value::Object(map) if is_operator_object(map) => compile_ops(field, map),
        Value::Object(map) if map.keys().any(|k| k.starts_with('$')) => {
            Err(DomainError::invalid_input(format!(
                "Filter on '{}' mixes operators and plain fields",
                field
            )))
        }
        other => Ok(Condition {
            ops: vec![Op::Eq(other.clone())],
        }),
    }
}

fn compile_ops(field: &str, map: &Map<String, Value>) -> Result<Condition, DomainError> {
    let mut ops = Vec::with_capacity(map.len());

    for (op, arg) in map {
        let compiled = match op.as_str() {
            "$eq" => Op::Eq(arg.clone()),
            "$ne" => Op::Ne(arg.clone()),
            "$gt" => Op::Cmp(Ordering::Greater, false, arg.clone()),
            "$gte" => Op::Cmp(Ordering::Greater, true, arg.clone()),
            "$lt" => Op::Cmp(Ordering::Less, false, arg.clone()),
            "$lte" => Op::Cmp(Ordering::Less, true, arg.clone()),
            "$in" => Op::In(expect_array(field, op, arg)?),
            "$nin" => Op::Nin(expect_array(field, op, arg)?),
            "$all" => Op::All(expect_array(field, op, arg)?),
            "$exists" => Op::Exists(truthy(arg)),
            "$regex" => {
                let options = map.get("$options").and_then(Value::as_str).unwrap_or("");
                Op::Regex(compile_regex(field, arg, options)?)
            }
            "$options" => {
                if !map.contains_key("$regex") {
                    return Err(DomainError::invalid_input(format!(
                        "$options on '{}' without $regex",
                        field
                    )));
                }
                continue;
            }
            "$not" => match arg {
                Value::Object(inner) if is_operator_object(inner) => {
                    Op::Not(Box::new(compile_ops(field, inner)?))
                }
                Value::String(_) => Op::Not(Box::new(Condition {
                    ops: vec![Op::Regex(compile_regex(field, arg, "")?)],
                })),
                _ => {
                    return Err(DomainError::invalid_input(format!(
                        "$not on '{}' expects an operator object",
                        field
                    )))
                }
            },
            other => {
                return Err(DomainError::invalid_input(format!(
                    "Unsupported operator {} on '{}'",
                    other, field
                )))
            }
        };
        ops.push(compiled);
    }

    Ok(Condition { ops })
}

fn expect_array(field: &str, op: &str, arg: &Value) -> Result<Vec<Value>, DomainError> {
    arg.as_array().cloned().ok_or_else(|| {
        DomainError::invalid_input(format!("{} on '{}' expects an array", op, field))
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Null => false,
        _ => true,
    }
}

fn compile_regex(field: &str, pattern: &Value, options: &str) -> Result<Regex, DomainError> {
    let pattern = pattern.as_str().ok_or_else(|| {
        DomainError::invalid_input(format!("$regex on '{}' expects a string", field))
    })?;

    let mut builder = RegexBuilder::new(pattern);
    for flag in options.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            other => {
                return Err(DomainError::invalid_input(format!(
                    "Unsupported regex option '{}' on '{}'",
                    other, field
                )))
            }
        };
    }

    builder.build().map_err(|e| {
        DomainError::invalid_input(format!("Invalid regex on '{}': {}", field, e))
    })
}

/// Gather every value reachable through `path`, descending into arrays on the way.
fn collect_values<'a>(value: &'a Value, path: &[String], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = path.split_first() else {
        out.push(value);
        return;
    };

    match value {
        Value::Object(map) => {
            if let Some(next) = map.get(head) {
                collect_values(next, rest, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_values(item, path, out);
            }
        }
        _ => {}
    }
}

impl Condition {
    fn matches(&self, candidates: &[&Value]) -> bool {
        self.ops.iter().all(|op| op.matches(candidates))
    }
}

impl Op {
    fn matches(&self, candidates: &[&Value]) -> bool {
        match self {
            Op::Eq(expected) => eq_any(candidates, expected),
            Op::Ne(expected) => !eq_any(candidates, expected),
            Op::Cmp(direction, inclusive, bound) => any_scalar(candidates, |v| {
                match compare(v, bound) {
                    Some(Ordering::Equal) => *inclusive,
                    Some(ord) => ord == *direction,
                    None => false,
                }
            }),
            Op::In(options) => options.iter().any(|o| eq_any(candidates, o)),
            Op::Nin(options) => !options.iter().any(|o| eq_any(candidates, o)),
            Op::All(required) => {
                !required.is_empty() && required.iter().all(|r| eq_any(candidates, r))
            }
            Op::Exists(expected) => !candidates.is_empty() == *expected,
            Op::Regex(regex) => {
                any_scalar(candidates, |v| v.as_str().is_some_and(|s| regex.is_match(s)))
            }
            Op::Not(inner) => !inner.matches(candidates),
        }
    }
}

/// Apply `pred` to each candidate, and to the elements of array candidates.
fn any_scalar(candidates: &[&Value], pred: impl Fn(&Value) -> bool) -> bool {
    candidates.iter().any(|c| match *c {
        Value::Array(items) => items.iter().any(&pred),
        other => pred(other),
    })
}

fn eq_any(candidates: &[&Value], expected: &Value) -> bool {
    if candidates.is_empty() {
        return expected.is_null();
    }
    candidates.iter().any(|c| {
        values_equal(c, expected)
            || matches!(c, Value::Array(items) if items.iter().any(|v| values_equal(v, expected)))
    })
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
