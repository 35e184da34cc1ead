use crate::error::PaginationError;
use serde::{Deserialize, Serialize};

/// Page size bounds injected from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        PageLimits {
            default_per_page: 100,
            max_per_page: 100,
        }
    }
}

impl PageLimits {
    /// Checks `1 <= limit <= max_per_page`.
    pub fn check(&self, limit: usize) -> Result<usize, PaginationError> {
        if limit == 0 || limit > self.max_per_page {
            return Err(PaginationError::InvalidLimit {
                value: limit.to_string(),
                max: self.max_per_page,
            });
        }
        Ok(limit)
    }

    /// Parses a raw `per_page` value.
    pub fn parse(&self, raw: &str) -> Result<usize, PaginationError> {
        let invalid = || PaginationError::InvalidLimit {
            value: raw.to_string(),
            max: self.max_per_page,
        };

        let parsed: i64 = raw.trim().parse().map_err(|_| invalid())?;
        let limit = usize::try_from(parsed).map_err(|_| invalid())?;
        self.check(limit).map_err(|_| invalid())
    }
}

/// Pagination parameters taken from a list request's query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn new(limit: usize, cursor: Option<String>) -> Self {
        PageRequest { limit, cursor }
    }

    pub fn first(limit: usize) -> Self {
        PageRequest {
            limit,
            cursor: None,
        }
    }

    /// Reads `per_page` and `cursor`. A missing `per_page` falls back to the
    /// configured default; an empty `cursor` counts as absent.
    pub fn from_query(
        query: &[(String, String)],
        limits: &PageLimits,
    ) -> Result<Self, PaginationError> {
        let lookup = |name: &str| {
            query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        let limit = match lookup("per_page") {
            Some(raw) => limits.parse(raw)?,
            None => limits.check(limits.default_per_page)?,
        };

        let cursor = lookup("cursor")
            .filter(|c| !c.trim().is_empty())
            .map(str::to_string);

        Ok(PageRequest { limit, cursor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let request = PageRequest::from_query(&[], &PageLimits::default()).unwrap();
        assert_eq!(request, PageRequest::first(100));
    }

    #[test]
    fn test_reads_per_page_and_cursor() {
        let request = PageRequest::from_query(
            &query(&[("per_page", "25"), ("cursor", "abc")]),
            &PageLimits::default(),
        )
        .unwrap();

        assert_eq!(request.limit, 25);
        assert_eq!(request.cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn test_per_page_above_max_is_rejected() {
        let err = PageRequest::from_query(&query(&[("per_page", "101")]), &PageLimits::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PaginationError::InvalidLimit { ref value, max: 100 } if value == "101"
        ));
        assert_eq!(err.field(), Some("per_page"));
    }

    #[test]
    fn test_non_positive_and_garbage_per_page() {
        let limits = PageLimits::default();
        for raw in ["0", "-5", "ten", "", "1.5"] {
            assert!(
                PageRequest::from_query(&query(&[("per_page", raw)]), &limits).is_err(),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_cursor_is_absent() {
        let request =
            PageRequest::from_query(&query(&[("cursor", "")]), &PageLimits::default()).unwrap();
        assert_eq!(request.cursor, None);
    }
}
