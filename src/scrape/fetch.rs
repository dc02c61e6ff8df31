use std::time::Duration;

use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::errors::ScrapeError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_USER_AGENT: &str = concat!("ilrdc-scraper/", env!("CARGO_PKG_VERSION"));

/// Turns a page URL into a parsed document.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError>;
}

#[derive(Clone, Debug)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_retries: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl FetcherConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Unset, blank or unparsable values keep their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(parsed) = var("ILRDC_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            cfg.timeout = Duration::from_secs(parsed);
        }
        if let Some(ua) = var("ILRDC_USER_AGENT") {
            if !ua.trim().is_empty() {
                cfg.user_agent = ua;
            }
        }
        if let Some(parsed) = var("ILRDC_MAX_RETRIES").and_then(|v| v.trim().parse::<u32>().ok()) {
            cfg.max_retries = parsed;
        }
        cfg
    }
}

#[derive(Clone)]
pub struct HttpFetcher {
    http: Client,
    cfg: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(cfg: FetcherConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.clone())
            .build()?;
        Ok(Self { http, cfg })
    }

    async fn get_once(&self, url: &str) -> Result<String, ScrapeError> {
        let resp = self.http.get(url).send().await.map_err(|e| ScrapeError::fetch(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status { url: url.to_string(), status });
        }
        resp.text().await.map_err(|e| ScrapeError::fetch(url, e))
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let mut attempt = 0u32;
        loop {
            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < self.cfg.max_retries => {
                    attempt += 1;
                    tracing::warn!(url, attempt, error = %e, "retrying fetch");
                    tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError> {
        let host = Url::parse(url).ok().and_then(|u| u.host_str().map(|s| s.to_string())).unwrap_or_default();
        tracing::debug!(host = %host, url, "fetch page");
        let body = self.fetch_text(url).await?;
        Ok(Html::parse_document(&body))
    }
}

/// Serves canned pages by URL; unknown URLs answer 404.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: std::collections::HashMap<String, String>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Html, ScrapeError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(Html::parse_document(html)),
            None => Err(ScrapeError::Status { url: url.to_string(), status: reqwest::StatusCode::NOT_FOUND }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const OK: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 19\r\nConnection: close\r\n\r\n<p class=\"x\">hi</p>";
    const UNAVAILABLE: &str = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
    const MISSING: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

    /// Answers one connection per canned response, in order, then stops listening.
    async fn serve(responses: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        tokio::spawn(async move {
            for resp in responses {
                let Ok((mut sock, _)) = listener.accept().await else { return };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 2048];
                let _ = sock.read(&mut buf).await;
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        (format!("http://{addr}/index.php?l=2&p=3"), hits)
    }

    fn fetcher(max_retries: u32) -> HttpFetcher {
        let cfg = FetcherConfig { timeout: Duration::from_secs(5), max_retries, ..FetcherConfig::default() };
        HttpFetcher::new(cfg).unwrap()
    }

    #[test]
    fn default_config_is_bounded() {
        let cfg = FetcherConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_retries, 2);
        assert!(cfg.user_agent.starts_with("ilrdc-scraper/"));
    }

    #[test]
    fn config_reads_overrides() {
        let vars: HashMap<&str, &str> =
            [("ILRDC_TIMEOUT_SECS", "5"), ("ILRDC_USER_AGENT", "corpus-bot/1"), ("ILRDC_MAX_RETRIES", " 0 ")].into();
        let cfg = FetcherConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.user_agent, "corpus-bot/1");
        assert_eq!(cfg.max_retries, 0);
    }

    #[test]
    fn config_ignores_malformed_values() {
        let vars: HashMap<&str, &str> =
            [("ILRDC_TIMEOUT_SECS", "soon"), ("ILRDC_USER_AGENT", "   "), ("ILRDC_MAX_RETRIES", "-1")].into();
        let cfg = FetcherConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));
        let default = FetcherConfig::default();
        assert_eq!(cfg.timeout, default.timeout);
        assert_eq!(cfg.user_agent, default.user_agent);
        assert_eq!(cfg.max_retries, default.max_retries);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let (url, hits) = serve(vec![UNAVAILABLE, OK]).await;
        let doc = fetcher(2).fetch(&url).await.unwrap();
        let p = scraper::Selector::parse("p.x").unwrap();
        assert_eq!(doc.select(&p).count(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (url, hits) = serve(vec![MISSING, OK]).await;
        let err = fetcher(2).fetch_text(&url).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_stop_at_the_configured_bound() {
        let (url, hits) = serve(vec![UNAVAILABLE, UNAVAILABLE, OK]).await;
        let err = fetcher(1).fetch_text(&url).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status, .. } if status.is_server_error()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let (url, hits) = serve(vec![UNAVAILABLE, OK]).await;
        assert!(fetcher(0).fetch_text(&url).await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn static_fetcher_records_calls() {
        let f = StaticFetcher::new().with_page("http://a/1", "<p>hi</p>");
        assert!(f.fetch("http://a/1").await.is_ok());
        let err = f.fetch("http://a/2").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));
        assert_eq!(f.calls(), vec!["http://a/1".to_string(), "http://a/2".to_string()]);
    }
}
