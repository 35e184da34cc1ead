use crate::pagination::cursor::Cursor;
use serde::Serialize;

/// One page of an ordered collection.
///
/// `previous` and `next` are `None` when no such page exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items in the collection's natural order.
    pub items: Vec<T>,
    pub previous: Option<Cursor>,
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, previous: Option<Cursor>, next: Option<Cursor>) -> Self {
        Page {
            items,
            previous,
            next,
        }
    }

    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            previous: None,
            next: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Maps every item, keeping the cursors.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            previous: self.previous,
            next: self.next,
        }
    }

    /// Replaces the whole item list at once, keeping the cursors.
    ///
    /// Useful when results are decorated in bulk (e.g. one lookup for all
    /// items) before rendering.
    pub fn map_items<U, F>(self, f: F) -> Page<U>
    where
        F: FnOnce(Vec<T>) -> Vec<U>,
    {
        Page {
            items: f(self.items),
            previous: self.previous,
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::cursor::Position;

    #[test]
    fn test_map_keeps_cursors() {
        let next = Cursor::next("id", Position::new(2, 2));
        let page = Page::new(vec![1, 2], None, Some(next.clone()));

        let mapped = page.map(|n| n.to_string());

        assert_eq!(mapped.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(mapped.next, Some(next));
        assert!(!mapped.has_previous());
    }

    #[test]
    fn test_map_items_in_bulk() {
        let page = Page::new(vec![3, 1, 2], None, None);
        let mapped = page.map_items(|mut items| {
            items.sort();
            items
        });
        assert_eq!(mapped.items, vec![1, 2, 3]);
    }
}
