use serde::{Deserialize, Serialize};
use std::fmt;

/// Link relation for adjacent pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Previous,
    Next,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Previous => "previous",
            Relation::Next => "next",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(relation, cursor token)` pair used to build a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub relation: Relation,
    pub cursor: String,
}

impl LinkDescriptor {
    pub fn new(relation: Relation, cursor: impl Into<String>) -> Self {
        LinkDescriptor {
            relation,
            cursor: cursor.into(),
        }
    }
}
