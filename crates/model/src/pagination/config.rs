use crate::core::value::SortValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering configuration handed to a result provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub key: String,          // ordering field, e.g. "id", "last_seen"
    pub reverse: bool,        // descending when true
    pub filters: Vec<Filter>, // all must match
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            key: "id".to_string(),
            reverse: false,
            filters: Vec::new(),
        }
    }
}

impl PageConfig {
    pub fn by(key: impl Into<String>) -> Self {
        PageConfig {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Parses an ordering expression such as `-last_seen` (descending) or
    /// `id` (ascending).
    pub fn from_order_by(order_by: &str) -> Self {
        match order_by.strip_prefix('-') {
            Some(key) => PageConfig::by(key).reversed(),
            None => PageConfig::by(order_by),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        };
        f.write_str(op)
    }
}

/// A single predicate on one field of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: SortValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<SortValue>) -> Self {
        Filter {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates the predicate against the field's value.
    ///
    /// A missing field only satisfies `Ne`.
    pub fn matches(&self, actual: Option<&SortValue>) -> bool {
        let Some(actual) = actual else {
            return self.op == FilterOp::Ne;
        };

        match self.op {
            FilterOp::Eq => *actual == self.value,
            FilterOp::Ne => *actual != self.value,
            FilterOp::Gt => *actual > self.value,
            FilterOp::Gte => *actual >= self.value,
            FilterOp::Lt => *actual < self.value,
            FilterOp::Lte => *actual <= self.value,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_order_by() {
        let desc = PageConfig::from_order_by("-last_seen");
        assert_eq!(desc.key, "last_seen");
        assert!(desc.reverse);

        let asc = PageConfig::from_order_by("id");
        assert_eq!(asc.key, "id");
        assert!(!asc.reverse);
    }

    #[test]
    fn test_filter_matches() {
        let filter = Filter::new("score", FilterOp::Gte, 10);

        assert!(filter.matches(Some(&SortValue::Int(10))));
        assert!(filter.matches(Some(&SortValue::Float(10.5))));
        assert!(!filter.matches(Some(&SortValue::Int(9))));
        assert!(!filter.matches(None));
    }

    #[test]
    fn test_missing_field_only_matches_ne() {
        let filter = Filter::new("status", FilterOp::Ne, "resolved");
        assert!(filter.matches(None));
    }
}
