use std::time::Duration;

use log::trace;
use reqwest::Url;

use super::retry::RetryPolicy;
use crate::{Error, ErrorKind};

/// The values used for any [`SearchOptions`] field left unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Defaults {
    pub max_retry_count: u32,
    pub retry_wait_time: Duration,
    pub max_retry_wait_time: Duration,
    pub rows: u64,
    pub query: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_retry_count: 3,
            retry_wait_time: Duration::from_secs(1),
            max_retry_wait_time: Duration::from_secs(5),
            rows: 10,
            query: Query::ALL.to_owned(),
        }
    }
}

/// Options for a single search request.
///
/// Every `Option` field falls back to the matching [`Defaults`] value when the options are
/// resolved. Debug output never includes the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Absolute base URL of the search endpoint, requests are sent to it with no extra path.
    pub url: String,
    /// Retries after the first attempt.
    pub max_retry_count: Option<u32>,
    /// Wait before the first retry, doubled for each one after.
    pub retry_wait_time: Option<Duration>,
    /// Upper bound on the wait between two attempts.
    pub max_retry_wait_time: Option<Duration>,
    pub user: String,
    pub password: String,
    /// Number of records to fetch.
    pub rows: Option<u64>,
    /// Query in the service's query syntax, see [`Query`].
    pub query: Option<String>,
}

impl std::fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("url", &self.url)
            .field("max_retry_count", &self.max_retry_count)
            .field("retry_wait_time", &self.retry_wait_time)
            .field("max_retry_wait_time", &self.max_retry_wait_time)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("rows", &self.rows)
            .field("query", &self.query)
            .finish()
    }
}

impl SearchOptions {
    /// Creates options for `url` with everything else unset.
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets the credentials sent along with each request.
    #[must_use]
    pub fn with_credentials<U, P>(mut self, user: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Derives options for another request from these ones, replacing only the query and the
    /// number of rows.
    #[must_use]
    pub fn with_query<S: Into<String>>(&self, query: S, rows: u64) -> Self {
        Self {
            query: Some(query.into()),
            rows: Some(rows),
            ..self.clone()
        }
    }

    /// Validates the URL and fills every unset field from `defaults`.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Configuration`] is returned when the URL cannot be parsed or
    /// lacks a scheme or a host.
    pub fn resolve(&self, defaults: &Defaults) -> Result<SearchConfig, Error> {
        let base_url = parse_base_url(&self.url)?;

        let config = SearchConfig {
            base_url,
            retry: RetryPolicy {
                max_retries: self.max_retry_count.unwrap_or(defaults.max_retry_count),
                wait: self.retry_wait_time.unwrap_or(defaults.retry_wait_time),
                max_wait: self
                    .max_retry_wait_time
                    .unwrap_or(defaults.max_retry_wait_time),
            },
            user: self.user.clone(),
            password: self.password.clone(),
            rows: self.rows.unwrap_or(defaults.rows),
            query: self
                .query
                .clone()
                .unwrap_or_else(|| defaults.query.clone()),
        };

        trace!("Resolved search configuration: {config:?}");
        Ok(config)
    }
}

fn parse_base_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| {
        Error::wrap_with(
            ErrorKind::Configuration,
            e,
            format!("'{url}' is not a valid base URL"),
        )
    })?;

    // `mailto:` and friends parse fine but cannot be searched.
    if parsed.cannot_be_a_base() || parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::new(
            ErrorKind::Configuration,
            format!("'{url}' must be an absolute URL with a scheme and a host"),
        ));
    }

    Ok(parsed)
}

/// Fully resolved options, see [`SearchOptions::resolve`].
#[derive(Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub base_url: Url,
    pub retry: RetryPolicy,
    pub user: String,
    pub password: String,
    pub rows: u64,
    pub query: String,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("rows", &self.rows)
            .field("query", &self.query)
            .finish()
    }
}

impl SearchConfig {
    /// The query string parameters sent with every request.
    #[must_use]
    pub fn query_params(&self) -> [(&'static str, String); 5] {
        [
            ("user", self.user.clone()),
            ("pass", self.password.clone()),
            ("q", self.query.clone()),
            ("wt", "json".to_owned()),
            ("rows", self.rows.to_string()),
        ]
    }
}

/// Builders for the queries understood by the catalog.
pub struct Query;

impl Query {
    /// Matches every record.
    pub const ALL: &'static str = "*:*";

    /// Search by ISBN-13, a prefix of one also matches.
    #[must_use]
    pub fn isbn13(isbn: &str) -> String {
        format!("isbn13_search:({isbn})")
    }

    /// Search by imprint, i.e. the publisher.
    #[must_use]
    pub fn imprint(publisher: &str) -> String {
        format!("imprint_search:({publisher})")
    }
}
