//! `Link` header rendering for paginated responses.

use model::pagination::link::{LinkDescriptor, Relation};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched in query keys and values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_COMPONENT).to_string()
}

/// Rebuilds the request URL with every query parameter except `cursor`.
///
/// The result always ends in a position where `&cursor=...` can be appended:
/// `{base}?{query}` when parameters remain, `{base}?` otherwise.
pub fn base_url(absolute_path: &str, query: &[(String, String)]) -> String {
    let querystring = query
        .iter()
        .filter(|(k, _)| k != "cursor")
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&");

    if querystring.is_empty() {
        format!("{absolute_path}?")
    } else {
        format!("{absolute_path}?{querystring}")
    }
}

/// Descriptors for every navigable direction, `previous` first.
pub fn descriptors(previous: Option<&str>, next: Option<&str>) -> Vec<LinkDescriptor> {
    [(Relation::Previous, previous), (Relation::Next, next)]
        .into_iter()
        .filter_map(|(relation, cursor)| cursor.map(|c| LinkDescriptor::new(relation, c)))
        .collect()
}

/// Formats descriptors as a header value. No descriptors, no header.
pub fn format_links(url: &str, links: &[LinkDescriptor]) -> Option<String> {
    if links.is_empty() {
        return None;
    }

    let value = links
        .iter()
        .map(|link| {
            format!(
                "<{url}&cursor={cursor}>; rel=\"{rel}\"",
                cursor = link.cursor,
                rel = link.relation
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    Some(value)
}

/// Builds the full `Link` header value, or `None` when there is neither a
/// previous nor a next page.
pub fn render_link_header(
    absolute_path: &str,
    query: &[(String, String)],
    previous: Option<&str>,
    next: Option<&str>,
) -> Option<String> {
    let links = descriptors(previous, next);
    if links.is_empty() {
        return None;
    }

    format_links(&base_url(absolute_path, query), &links)
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
    fn test_base_url_drops_cursor_and_encodes() {
        let url = base_url(
            "https://api.example.com/0/events/",
            &query(&[("q", "is:open level"), ("cursor", "abc"), ("per_page", "10")]),
        );

        assert_eq!(
            url,
            "https://api.example.com/0/events/?q=is%3Aopen%20level&per_page=10"
        );

        let url = base_url("/x/", &query(&[("user", "~admin/home"), ("sort", "a+b")]));
        assert_eq!(url, "/x/?user=~admin/home&sort=a%2Bb");
    }

    #[test]
    fn test_base_url_without_query_keeps_separator() {
        assert_eq!(base_url("http://h/x/", &[]), "http://h/x/?");
        assert_eq!(
            base_url("http://h/x/", &query(&[("cursor", "abc")])),
            "http://h/x/?"
        );
    }

    #[test]
    fn test_render_both_links_previous_first() {
        let header =
            render_link_header("http://h/x/", &query(&[("per_page", "2")]), Some("P"), Some("N"))
                .unwrap();

        assert_eq!(
            header,
            "<http://h/x/?per_page=2&cursor=P>; rel=\"previous\", \
             <http://h/x/?per_page=2&cursor=N>; rel=\"next\""
        );
    }

    #[test]
    fn test_render_single_link() {
        let header = render_link_header("http://h/x/", &[], None, Some("N")).unwrap();
        assert_eq!(header, "<http://h/x/?&cursor=N>; rel=\"next\"");
    }

    #[test]
    fn test_no_links_means_no_header() {
        assert_eq!(render_link_header("http://h/x/", &[], None, None), None);
    }

    #[test]
    fn test_encode_component_keeps_unreserved() {
        assert_eq!(encode_component("a-b_c.d/e~f"), "a-b_c.d/e~f");
        assert_eq!(encode_component("é&="), "%C3%A9%26%3D");
    }
}
