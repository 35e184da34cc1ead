use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a stats time window from since / until / resolution
    Window {
        #[arg(long, help = "Window start, seconds since the UNIX epoch")]
        since: Option<String>,

        #[arg(long, help = "Window end, seconds since the UNIX epoch")]
        until: Option<String>,

        #[arg(long, help = "Rollup such as 10s, 1h or 1d")]
        resolution: Option<String>,

        #[arg(long, help = "Use this UNIX timestamp as the current time")]
        now: Option<i64>,

        #[arg(long, help = "Snap the window to its rollup and list the buckets")]
        snap: bool,

        #[arg(
            long,
            help = "If specified, writes the JSON result to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Paginate a JSON array of objects
    Page {
        #[arg(long, help = "Path to a JSON file holding an array of objects")]
        data: String,

        #[arg(long, help = "Absolute URL of the list endpoint, without query string")]
        url: String,

        #[arg(
            long = "query",
            value_name = "KEY=VALUE",
            value_parser = parse_query_pair,
            help = "Extra query parameter, repeatable"
        )]
        query: Vec<(String, String)>,

        #[arg(long, help = "Page size")]
        per_page: Option<String>,

        #[arg(long, help = "Cursor token from a previous page")]
        cursor: Option<String>,

        #[arg(long, default_value = "id", help = "Field to order by")]
        key: String,

        #[arg(long, help = "Order descending")]
        reverse: bool,

        #[arg(long, default_value = "id", help = "Unique unsigned integer field")]
        id_field: String,

        #[arg(
            long,
            help = "If specified, writes the JSON result to this file instead of stdout"
        )]
        output: Option<String>,
    },
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
