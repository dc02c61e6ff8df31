use reqwest::StatusCode;

#[derive(Debug)]
pub enum ScrapeError {
    UnknownDialect(String),
    PartNotFound {
        dialect: String,
        part: String,
    },
    MalformedDocument {
        selector: String,
    },
    MalformedRow {
        row: usize,
        field: &'static str,
    },
    Fetch {
        url: String,
        source: reqwest::Error,
    },
    Status {
        url: String,
        status: StatusCode,
    },
    Selector(String),
    Pattern(String),
}

impl ScrapeError {
    pub fn fetch(url: &str, source: reqwest::Error) -> Self {
        ScrapeError::Fetch { url: url.to_string(), source }
    }

    /// Transport hiccups and server-side failures; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Fetch { source, .. } => source.is_timeout() || source.is_connect(),
            ScrapeError::Status { status, .. } => status.is_server_error(),
            ScrapeError::UnknownDialect(_)
            | ScrapeError::PartNotFound { .. }
            | ScrapeError::MalformedDocument { .. }
            | ScrapeError::MalformedRow { .. }
            | ScrapeError::Selector(_)
            | ScrapeError::Pattern(_) => false,
        }
    }
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeError::UnknownDialect(name) => write!(f, "unknown dialect: {name}"),
            ScrapeError::PartNotFound { dialect, part } => {
                write!(f, "part not found: {part} (dialect {dialect})")
            }
            ScrapeError::MalformedDocument { selector } => {
                write!(f, "malformed document: no element matches `{selector}`")
            }
            ScrapeError::MalformedRow { row, field } => {
                write!(f, "malformed row {row}: missing {field} cell")
            }
            ScrapeError::Fetch { url, source } => write!(f, "fetch failed for {url}: {source}"),
            ScrapeError::Status { url, status } => write!(f, "http {status} for {url}"),
            ScrapeError::Selector(msg) => write!(f, "invalid selector: {msg}"),
            ScrapeError::Pattern(msg) => write!(f, "invalid sound pattern: {msg}"),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
