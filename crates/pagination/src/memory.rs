use crate::{
    error::ProviderError,
    provider::{FetchRequest, Fetched, ResultProvider},
};
use async_trait::async_trait;
use model::{
    core::value::{SortValue, SortValueKind},
    pagination::{
        config::PageConfig,
        cursor::{Direction, Position},
    },
};
use serde_json::Value;
use std::{cmp::Ordering, collections::HashSet};

/// In-memory provider over JSON objects.
///
/// Every object must carry a unique unsigned integer id, which breaks ties on
/// the ordering field.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    items: Vec<Value>,
    id_field: String,
}

impl MemoryProvider {
    pub fn new(items: Vec<Value>) -> Result<Self, ProviderError> {
        Self::with_id_field(items, "id")
    }

    pub fn with_id_field(
        items: Vec<Value>,
        id_field: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let id_field = id_field.into();
        let mut seen = HashSet::with_capacity(items.len());

        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(ProviderError::Config(format!(
                    "item {idx} is not a JSON object"
                )));
            }

            let id = item.get(&id_field).and_then(Value::as_u64).ok_or_else(|| {
                ProviderError::Config(format!(
                    "item {idx} has no unsigned integer '{id_field}' field"
                ))
            })?;

            if !seen.insert(id) {
                return Err(ProviderError::Config(format!(
                    "duplicate {id_field} {id} at item {idx}"
                )));
            }
        }

        Ok(MemoryProvider { items, id_field })
    }

    /// Parses a JSON array of objects.
    pub fn from_json_str(source: &str) -> Result<Self, ProviderError> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| ProviderError::Read(e.to_string()))?;

        match value {
            Value::Array(items) => Self::new(items),
            _ => Err(ProviderError::Config(
                "expected a JSON array of objects".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, item: &Value, key: &str) -> Position {
        Position {
            value: field_value(item, key).unwrap_or(SortValue::Null),
            id: item.get(&self.id_field).and_then(Value::as_u64).unwrap_or(0),
        }
    }

    /// Matching items with their positions, in page order.
    fn ordered<'a>(&'a self, config: &PageConfig) -> Vec<(Position, &'a Value)> {
        let mut rows: Vec<(Position, &Value)> = self
            .items
            .iter()
            .filter(|item| {
                config
                    .filters
                    .iter()
                    .all(|f| f.matches(field_value(item, &f.field).as_ref()))
            })
            .map(|item| (self.position(item, &config.key), item))
            .collect();

        rows.sort_by(|a, b| page_order(&a.0, &b.0, config.reverse));
        rows
    }
}

#[async_trait]
impl ResultProvider for MemoryProvider {
    type Item = Value;

    async fn fetch(&self, request: FetchRequest<'_>) -> Result<Fetched<Value>, ProviderError> {
        let config = request.config;
        let rows = self.ordered(config);
        let limit = request.limit;

        let Some(anchor) = request.anchor else {
            let items = rows.iter().take(limit).map(|(_, v)| (*v).clone()).collect();
            return Ok(Fetched::new(items, rows.len() > limit));
        };

        let position = &anchor.position;
        match anchor.direction {
            Direction::Next => {
                // first row strictly after the anchor
                let start = rows.partition_point(|(p, _)| {
                    page_order(p, position, config.reverse) != Ordering::Greater
                });
                let items = rows[start..]
                    .iter()
                    .take(limit)
                    .map(|(_, v)| (*v).clone())
                    .collect();
                Ok(Fetched::new(items, rows.len() - start > limit))
            }
            Direction::Previous => {
                // rows strictly before the anchor, closest first
                let end = rows.partition_point(|(p, _)| {
                    page_order(p, position, config.reverse) == Ordering::Less
                });
                let items = rows[..end]
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|(_, v)| (*v).clone())
                    .collect();
                Ok(Fetched::new(items, end > limit))
            }
        }
    }

    fn position_of(&self, item: &Value, config: &PageConfig) -> Position {
        self.position(item, &config.key)
    }

    fn validate_position(&self, position: &Position, config: &PageConfig) -> Result<(), String> {
        let kinds: HashSet<SortValueKind> = self
            .items
            .iter()
            .map(|item| self.position(item, &config.key).value.kind())
            .collect();

        if kinds.is_empty() || kinds.contains(&position.value.kind()) {
            Ok(())
        } else {
            Err(format!(
                "{} position is outside the '{}' ordering",
                position.value.kind(),
                config.key
            ))
        }
    }
}

fn page_order(a: &Position, b: &Position, reverse: bool) -> Ordering {
    if reverse { b.cmp(a) } else { a.cmp(b) }
}

fn field_value(item: &Value, field: &str) -> Option<SortValue> {
    item.get(field).and_then(SortValue::from_json)
}
