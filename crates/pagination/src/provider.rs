use crate::{
    codec::CursorCodec,
    error::{CursorCodecError, ProviderError},
};
use async_trait::async_trait;
use model::pagination::{
    config::PageConfig,
    cursor::{Cursor, Position},
};

/// A single read against the provider.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// `None` reads from the start of the ordering.
    pub anchor: Option<&'a Cursor>,
    pub limit: usize,
    pub config: &'a PageConfig,
}

/// Items in traversal order: for a `Previous` anchor the item closest to the
/// anchor comes first.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Fetched<T> {
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Fetched { items, has_more }
    }
}

/// Ordered result source behind the paginator.
///
/// The provider owns the mapping between positions and cursor tokens; the
/// defaults use [`CursorCodec`].
#[async_trait]
pub trait ResultProvider: Send + Sync {
    type Item: Send;

    /// Reads up to `request.limit` items strictly after (or before) the
    /// anchor, and reports whether more exist beyond them.
    async fn fetch(
        &self,
        request: FetchRequest<'_>,
    ) -> Result<Fetched<Self::Item>, ProviderError>;

    /// Position of an item under the given ordering.
    fn position_of(&self, item: &Self::Item, config: &PageConfig) -> Position;

    /// Rejects positions that cannot come from this provider's ordering.
    fn validate_position(&self, _position: &Position, _config: &PageConfig) -> Result<(), String> {
        Ok(())
    }

    fn encode_cursor(&self, cursor: &Cursor) -> Result<String, CursorCodecError> {
        CursorCodec.encode(cursor)
    }

    fn decode_cursor(&self, token: &str) -> Result<Cursor, CursorCodecError> {
        CursorCodec.decode(token)
    }
}
