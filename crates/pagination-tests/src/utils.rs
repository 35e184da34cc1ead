use model::pagination::{config::PageConfig, page::Page};
use pagination::{memory::MemoryProvider, paginator::Paginator, request::PageLimits};
use serde_json::{Value, json};
use tracing::info;

/// `n` issues with ids `1..=n`, a score cycling through `0..3` and every
/// third issue closed.
pub fn issues(n: u64) -> Vec<Value> {
    (1..=n)
        .map(|id| {
            json!({
                "id": id,
                "score": id % 3,
                "status": if id % 3 == 0 { "closed" } else { "open" },
                "title": format!("issue {id}"),
            })
        })
        .collect()
}

pub fn paginator(items: Vec<Value>, config: PageConfig) -> Paginator<MemoryProvider> {
    let provider = MemoryProvider::new(items).expect("valid items");
    Paginator::new(provider, config, PageLimits::default())
}

pub fn ids(items: &[Value]) -> Vec<u64> {
    items
        .iter()
        .map(|item| item["id"].as_u64().expect("id"))
        .collect()
}

/// Follows `next` cursors from the first page until none is left.
pub async fn walk_forward(
    paginator: &Paginator<MemoryProvider>,
    per_page: usize,
) -> Vec<Page<Value>> {
    let mut pages: Vec<Page<Value>> = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = paginator
            .get_page(per_page, token.as_deref())
            .await
            .expect("page");

        token = match &page.next {
            Some(cursor) => Some(paginator.encode(cursor).expect("encode")),
            None => None,
        };
        pages.push(page);

        if token.is_none() {
            break;
        }
        assert!(pages.len() <= 1_000, "forward walk does not terminate");
    }

    info!("Walked {} pages forward", pages.len());
    pages
}

/// Follows `previous` cursors starting from `start` until none is left.
pub async fn walk_backward(
    paginator: &Paginator<MemoryProvider>,
    per_page: usize,
    start: &Page<Value>,
) -> Vec<Page<Value>> {
    let mut pages: Vec<Page<Value>> = Vec::new();
    let mut token = start
        .previous
        .as_ref()
        .map(|cursor| paginator.encode(cursor).expect("encode"));

    while let Some(current) = token.take() {
        let page = paginator
            .get_page(per_page, Some(&current))
            .await
            .expect("page");

        token = page
            .previous
            .as_ref()
            .map(|cursor| paginator.encode(cursor).expect("encode"));
        pages.push(page);
        assert!(pages.len() <= 1_000, "backward walk does not terminate");
    }

    info!("Walked {} pages backward", pages.len());
    pages
}

pub fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
