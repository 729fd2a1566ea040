use log::trace;
use reqwest::Url;

mod client;
mod options;
mod retry;

pub use client::SearchClient;
pub use options::{Defaults, Query, SearchConfig, SearchOptions};
pub use retry::RetryPolicy;

use crate::{Error, ErrorKind};

/// The status and body text of an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Sends a GET request and hands back the raw response.
///
/// Implementations report connection failures and timeouts as [`ErrorKind::Transport`] and must
/// not interpret the status code, that is left to the [`SearchClient`].
pub trait Transport {
    /// Sends a GET to `url` with `params` appended as the query string.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when no response could be obtained.
    fn fetch(&self, url: &Url, params: &[(&str, String)]) -> Result<RawResponse, Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &Url, params: &[(&str, String)]) -> Result<RawResponse, Error> {
        (**self).fetch(url, params)
    }
}

impl Transport for reqwest::blocking::Client {
    fn fetch(&self, url: &Url, params: &[(&str, String)]) -> Result<RawResponse, Error> {
        trace!("GET {url}");
        let resp = self
            .get(url.clone())
            .query(params)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::Transport, e))?;

        let status = resp.status().as_u16();
        // The service labels its JSON as text/plain, so the body is always read as text.
        let body = resp
            .text()
            .map_err(|e| Error::wrap(ErrorKind::Transport, e))?;

        Ok(RawResponse { status, body })
    }
}

/// Builds the blocking HTTP client used when no other [`Transport`] is given.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::Configuration`] is returned when the TLS backend cannot be
/// initialised.
pub fn http_client() -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .build()
        .map_err(|e| Error::wrap_with(ErrorKind::Configuration, e, "Cannot build HTTP client"))
}

#[cfg(test)]
pub(crate) use test::MockTransport;
