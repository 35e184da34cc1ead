use crate::{
    error::PaginationError,
    link::render_link_header,
    provider::{FetchRequest, Fetched, ResultProvider},
    request::{PageLimits, PageRequest},
};
use model::pagination::{
    config::PageConfig,
    cursor::{Cursor, Direction},
    page::Page,
};
use serde::Serialize;
use tracing::debug;

/// A page plus the rendered `Link` header, ready for the endpoint layer.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub link: Option<String>,
}

/// Produces pages of a provider's ordered results.
pub struct Paginator<P> {
    provider: P,
    config: PageConfig,
    limits: PageLimits,
}

impl<P: ResultProvider> Paginator<P> {
    pub fn new(provider: P, config: PageConfig, limits: PageLimits) -> Self {
        Paginator {
            provider,
            config,
            limits,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches one page.
    ///
    /// `next` resumes right after the last returned item and `previous` right
    /// before the first one.
    pub async fn get_page(
        &self,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<Page<P::Item>, PaginationError> {
        let limit = self.limits.check(limit)?;
        let cursor = match cursor.map(str::trim) {
            Some(token) if !token.is_empty() => Some(self.decode(token)?),
            _ => None,
        };

        debug!(
            key = %self.config.key,
            reverse = self.config.reverse,
            limit,
            direction = ?cursor.as_ref().map(|c| c.direction),
            "Fetching page"
        );

        let Fetched {
            mut items,
            mut has_more,
        } = self
            .provider
            .fetch(FetchRequest {
                anchor: cursor.as_ref(),
                limit,
                config: &self.config,
            })
            .await?;

        if items.len() > limit {
            items.truncate(limit);
            has_more = true;
        }
        let full = items.len() == limit;

        let page = match cursor.as_ref().map(|c| c.direction) {
            None | Some(Direction::Next) => {
                let previous = match (&cursor, items.first()) {
                    (Some(_), Some(first)) => Some(self.cursor_to(Direction::Previous, first)),
                    _ => None,
                };
                let next = match items.last() {
                    Some(last) if has_more && full => Some(self.cursor_to(Direction::Next, last)),
                    _ => None,
                };
                Page::new(items, previous, next)
            }
            Some(Direction::Previous) => {
                items.reverse();
                let previous = match items.first() {
                    Some(first) if has_more && full => {
                        Some(self.cursor_to(Direction::Previous, first))
                    }
                    _ => None,
                };
                let next = items.last().map(|last| self.cursor_to(Direction::Next, last));
                Page::new(items, previous, next)
            }
        };

        debug!(
            returned = page.len(),
            has_previous = page.has_previous(),
            has_next = page.has_next(),
            "Fetched page"
        );

        Ok(page)
    }

    /// Serves a list request: fetches the page, encodes its cursors and
    /// renders the `Link` header against `absolute_path` and the request's
    /// other query parameters.
    pub async fn paginate(
        &self,
        request: &PageRequest,
        absolute_path: &str,
        query: &[(String, String)],
    ) -> Result<Paginated<P::Item>, PaginationError> {
        self.paginate_with(request, absolute_path, query, |items| items)
            .await
    }

    /// Like [`Paginator::paginate`], mapping the results with `on_results`
    /// before they are returned.
    pub async fn paginate_with<U, F>(
        &self,
        request: &PageRequest,
        absolute_path: &str,
        query: &[(String, String)],
        on_results: F,
    ) -> Result<Paginated<U>, PaginationError>
    where
        F: FnOnce(Vec<P::Item>) -> Vec<U>,
    {
        let page = self
            .get_page(request.limit, request.cursor.as_deref())
            .await?
            .map_items(on_results);

        let previous = page.previous.as_ref().map(|c| self.encode(c)).transpose()?;
        let next = page.next.as_ref().map(|c| self.encode(c)).transpose()?;
        let link = render_link_header(absolute_path, query, previous.as_deref(), next.as_deref());

        Ok(Paginated {
            items: page.items,
            previous,
            next,
            link,
        })
    }

    pub fn encode(&self, cursor: &Cursor) -> Result<String, PaginationError> {
        self.provider
            .encode_cursor(cursor)
            .map_err(PaginationError::CursorEncode)
    }

    pub fn decode(&self, token: &str) -> Result<Cursor, PaginationError> {
        let cursor = self.provider.decode_cursor(token)?;

        if cursor.key != self.config.key {
            return Err(PaginationError::InvalidCursor(format!(
                "cursor was issued for ordering '{}', not '{}'",
                cursor.key, self.config.key
            )));
        }

        self.provider
            .validate_position(&cursor.position, &self.config)
            .map_err(PaginationError::InvalidCursor)?;

        Ok(cursor)
    }

    fn cursor_to(&self, direction: Direction, item: &P::Item) -> Cursor {
        Cursor {
            key: self.config.key.clone(),
            position: self.provider.position_of(item, &self.config),
            direction,
        }
    }
}
