use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Value of the ordering field for a single item.
///
/// Values of different kinds are totally ordered so that heterogeneous
/// collections still page deterministically:
/// `Null < Bool < numeric < Text`. `Int` and `Float` compare numerically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SortValue {
    /// Converts a JSON scalar into a sort value.
    ///
    /// Arrays and objects have no natural order and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(SortValue::Null),
            serde_json::Value::Bool(b) => Some(SortValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(SortValue::Int)
                .or_else(|| n.as_f64().map(SortValue::Float)),
            serde_json::Value::String(s) => Some(SortValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    pub fn kind(&self) -> SortValueKind {
        match self {
            SortValue::Null => SortValueKind::Null,
            SortValue::Bool(_) => SortValueKind::Bool,
            SortValue::Int(_) | SortValue::Float(_) => SortValueKind::Number,
            SortValue::Text(_) => SortValueKind::Text,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SortValue::Int(v) => Some(*v as f64),
            SortValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SortValue::Null)
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => compare_floats(*a, *b),
            (Int(a), Float(b)) => compare_int_float(*a, *b),
            (Float(a), Int(b)) => compare_int_float(*b, *a).reverse(),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

/// Numeric order with `-0.0 == 0.0`; NaNs sort by sign beyond every number.
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

/// Exact comparison of an integer with a float, without rounding the
/// integer through `f64`.
fn compare_int_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float above every i64
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I64_END {
        return Ordering::Less;
    }
    if float < -I64_END {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    // exact: `whole` is integral and within i64 range
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float).unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

/// Coarse kind of a [`SortValue`], in cross-kind sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SortValueKind {
    Null,
    Bool,
    Number,
    Text,
}

impl fmt::Display for SortValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValueKind::Null => write!(f, "null"),
            SortValueKind::Bool => write!(f, "bool"),
            SortValueKind::Number => write!(f, "number"),
            SortValueKind::Text => write!(f, "text"),
        }
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<i64> for SortValue {
    fn from(v: i64) -> Self {
        SortValue::Int(v)
    }
}

impl From<i32> for SortValue {
    fn from(v: i32) -> Self {
        SortValue::Int(v as i64)
    }
}

impl From<f64> for SortValue {
    fn from(v: f64) -> Self {
        SortValue::Float(v)
    }
}

impl From<bool> for SortValue {
    fn from(v: bool) -> Self {
        SortValue::Bool(v)
    }
}

impl From<&str> for SortValue {
    fn from(v: &str) -> Self {
        SortValue::Text(v.to_string())
    }
}

impl From<String> for SortValue {
    fn from(v: String) -> Self {
        SortValue::Text(v)
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortValue::Null => write!(f, "null"),
            SortValue::Bool(v) => write!(f, "{v}"),
            SortValue::Int(v) => write!(f, "{v}"),
            SortValue::Float(v) => write!(f, "{v}"),
            SortValue::Text(v) => write!(f, "{v:?}"),
        }
    }
}
