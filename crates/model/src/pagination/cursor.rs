use crate::core::value::SortValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Position of an item in an ordered result sequence.
///
/// The sort field alone is not unique, so the item id breaks ties.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Position {
    #[serde(rename = "v")]
    pub value: SortValue,
    #[serde(rename = "i")]
    pub id: u64,
}

impl Position {
    pub fn new(value: impl Into<SortValue>, id: u64) -> Self {
        Position {
            value: value.into(),
            id,
        }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Items strictly after the position.
    #[serde(rename = "n")]
    Next,
    /// Items strictly before the position.
    #[serde(rename = "p")]
    Previous,
}

/// Represents the pagination cursor.
///
/// Only the provider that issued a cursor knows how to turn it into a token
/// and back; callers treat the token as opaque.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Ordering field the position was taken from.
    #[serde(rename = "k")]
    pub key: String,
    #[serde(rename = "p")]
    pub position: Position,
    #[serde(rename = "d")]
    pub direction: Direction,
}

impl Cursor {
    pub fn next(key: impl Into<String>, position: Position) -> Self {
        Cursor {
            key: key.into(),
            position,
            direction: Direction::Next,
        }
    }

    pub fn previous(key: impl Into<String>, position: Position) -> Self {
        Cursor {
            key: key.into(),
            position,
            direction: Direction::Previous,
        }
    }

    pub fn is_prev(&self) -> bool {
        self.direction == Direction::Previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ties_break_on_id() {
        let a = Position::new(10, 1);
        let b = Position::new(10, 2);
        let c = Position::new(9, 99);

        assert!(a < b);
        assert!(c < a);
    }

    #[test]
    fn test_cursor_json_is_compact() {
        let cursor = Cursor::next("id", Position::new(5, 3));
        let json = serde_json::to_string(&cursor).unwrap();

        assert_eq!(json, r#"{"k":"id","p":{"v":{"Int":5},"i":3},"d":"n"}"#);
    }
}
