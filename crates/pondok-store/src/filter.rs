//! Single-field query filters.

use crate::document::Fields;
use crate::error::Error;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Most values accepted by `in`, `not-in` and `array-contains-any`.
pub const MAX_DISJUNCTION: usize = 30;

/// Comparison operators. This set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    ArrayContains,
    ArrayContainsAny,
    In,
    NotIn,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::ArrayContains,
        Operator::ArrayContainsAny,
        Operator::In,
        Operator::NotIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::ArrayContains => "array-contains",
            Operator::ArrayContainsAny => "array-contains-any",
            Operator::In => "in",
            Operator::NotIn => "not-in",
        }
    }

    /// Operators whose value is a list of candidates.
    pub fn takes_list(self) -> bool {
        matches!(
            self,
            Operator::ArrayContainsAny | Operator::In | Operator::NotIn
        )
    }

    fn is_range(self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown query operator `{s}`")))
    }
}

/// `field <op> value`, the one filter a query may carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Filter {
    /// Build a filter, checking the value is usable with the operator.
    pub fn new(
        field: impl Into<String>,
        op: Operator,
        value: impl Into<Value>,
    ) -> Result<Self, Error> {
        let filter = Filter {
            field: field.into(),
            op,
            value: value.into(),
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter {
            field: field.into(),
            op: Operator::Eq,
            value: value.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.field.is_empty() {
            return Err(Error::validation("query field name is empty"));
        }
        if self.op.takes_list() {
            let Value::Array(candidates) = &self.value else {
                return Err(Error::validation(format!("`{}` expects a list of values", self.op)));
            };
            if candidates.is_empty() {
                return Err(Error::validation(format!("`{}` needs at least one value", self.op)));
            }
            if candidates.len() > MAX_DISJUNCTION {
                return Err(Error::validation(format!(
                    "`{}` accepts at most {MAX_DISJUNCTION} values, got {}",
                    self.op,
                    candidates.len()
                )));
            }
        }
        if self.op.is_range() && !is_orderable(&self.value) {
            return Err(Error::validation(format!(
                "`{}` needs a number, string or boolean",
                self.op
            )));
        }
        Ok(())
    }

    /// Evaluate against a document body.
    pub fn matches(&self, fields: &Fields) -> bool {
        let Some(actual) = fields.get(&self.field) else {
            return false;
        };
        match self.op {
            Operator::Eq => values_equal(actual, &self.value),
            Operator::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            Operator::Le => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::ArrayContains => match actual {
                Value::Array(items) => items.iter().any(|v| values_equal(v, &self.value)),
                _ => false,
            },
            Operator::ArrayContainsAny => match actual {
                Value::Array(items) => items
                    .iter()
                    .any(|v| self.candidates().any(|c| values_equal(v, c))),
                _ => false,
            },
            Operator::In => self.candidates().any(|c| values_equal(actual, c)),
            Operator::NotIn => {
                !actual.is_null() && !self.candidates().any(|c| values_equal(actual, c))
            }
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &Value> {
        self.value.as_array().into_iter().flatten()
    }
}

fn is_orderable(value: &Value) -> bool {
    matches!(value, Value::Number(_) | Value::String(_) | Value::Bool(_))
}

/// JSON equality where numbers compare by value (`1 == 1.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Ordering between two values of the same orderable type, `None` otherwise.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
