use std::thread;

use log::{error, info, trace, warn};

use super::{
    options::{Defaults, SearchConfig, SearchOptions},
    retry::is_retryable_status,
    RawResponse, Transport,
};
use crate::{model::QueryResult, Error, ErrorKind};

/// Longest slice of an error body kept in a [`ErrorKind::Response`] message.
const BODY_EXCERPT: usize = 256;

/// A search request against the catalog, ready to be sent.
///
/// The client is immutable once built; to send a different query derive new options with
/// [`SearchOptions::with_query`] and build another client.
#[derive(Debug)]
pub struct SearchClient<T: Transport = reqwest::blocking::Client> {
    config: SearchConfig,
    transport: T,
}

impl SearchClient {
    /// Builds a client over the default blocking HTTP transport.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Configuration`] is returned when the options do not hold a
    /// usable base URL.
    pub fn new(opts: &SearchOptions) -> Result<Self, Error> {
        let config = opts.resolve(&Defaults::default())?;
        Ok(Self {
            config,
            transport: super::http_client()?,
        })
    }
}

impl<T: Transport> SearchClient<T> {
    /// Builds a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// An [`Err`] with [`ErrorKind::Configuration`] is returned when the options do not hold a
    /// usable base URL.
    pub fn with_transport(
        opts: &SearchOptions,
        defaults: &Defaults,
        transport: T,
    ) -> Result<Self, Error> {
        let config = opts.resolve(defaults)?;
        Ok(Self { config, transport })
    }

    /// The resolved configuration this client sends.
    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Sends the request and decodes the result.
    ///
    /// A summary of every successful request is logged. With `verbose` each returned record is
    /// logged as well.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Transport`] when no response was obtained within the retry policy.
    /// - [`ErrorKind::Response`] when the final response has a non-success status.
    /// - [`ErrorKind::Decode`] when a successful response is not a valid result. The service
    ///   reports malformed queries this way, so the raw body is logged.
    pub fn execute(&self, verbose: bool) -> Result<QueryResult, Error> {
        let resp = self.send()?;
        let success = resp.is_success();
        let RawResponse { status, body } = resp;

        if !success {
            return Err(Error::new(
                ErrorKind::Response,
                format!("unexpected status {status}: {}", excerpt(&body)),
            ));
        }

        let result: QueryResult = serde_json::from_str(&body).map_err(|e| {
            error!("Cannot decode response with status {status}: {body}");
            Error::wrap_with(ErrorKind::Decode, e, "Response is not a valid search result")
        })?;

        if verbose {
            for book in &result.body.docs {
                info!("{book:?}");
            }
        }

        info!(
            "Request successful - status: {}, query time: {}ms, found: {}",
            status, result.header.query_time, result.body.num_found
        );

        Ok(result)
    }

    /// Sends the request, retrying transport failures and retryable statuses within the policy.
    fn send(&self) -> Result<RawResponse, Error> {
        let params = self.config.query_params();
        let policy = self.config.retry;
        let mut retries = 0;

        loop {
            trace!("Sending search request for '{}'", self.config.query);
            let outcome = self.transport.fetch(&self.config.base_url, &params);

            let reason = match &outcome {
                Err(e) if e.kind() == ErrorKind::Transport => Some(e.to_string()),
                Ok(resp) if is_retryable_status(resp.status) => {
                    Some(format!("status {}", resp.status))
                }
                _ => None,
            };
            let reason = match reason {
                Some(reason) => reason,
                None => return outcome,
            };

            if !policy.allows(retries) {
                return outcome.map_err(|e| {
                    Error::wrap_with(
                        ErrorKind::Transport,
                        e,
                        format!("Giving up after {} attempts", retries + 1),
                    )
                });
            }

            let delay = policy.delay(retries);
            retries += 1;
            warn!(
                "Request failed ({reason}), retry {retries} of {} in {delay:?}",
                policy.max_retries
            );
            thread::sleep(delay);
        }
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT) {
        Some((i, _)) => &body[..i],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::{MockTransport, Query};

    const URL: &str = "http://solr.example.org/solr/index.php";

    fn options() -> SearchOptions {
        SearchOptions {
            retry_wait_time: Some(Duration::ZERO),
            max_retry_wait_time: Some(Duration::ZERO),
            ..SearchOptions::new(URL).with_credentials("reader", "secret")
        }
    }

    fn client(transport: &MockTransport) -> SearchClient<&MockTransport> {
        SearchClient::with_transport(&options(), &Defaults::default(), transport).unwrap()
    }

    #[test]
    fn empty_result_is_success() {
        let transport =
            MockTransport::new().respond(200, include_str!("../../tests/data/empty_response.json"));

        let result = client(&transport).execute(false).unwrap();

        assert_eq!(0, result.body.num_found);
        assert!(result.into_books().is_empty());
    }

    #[test]
    fn request_carries_all_params() {
        let transport =
            MockTransport::new().respond(200, include_str!("../../tests/data/isbn_response.json"));
        let opts = options().with_query(Query::isbn13("978960451482"), 2);

        let result = SearchClient::with_transport(&opts, &Defaults::default(), &transport)
            .unwrap()
            .execute(true)
            .unwrap();
        assert_eq!(2, result.into_books().len());

        let requests = transport.requests();
        assert_eq!(1, requests.len());
        let request = &requests[0];
        assert_eq!(URL, request.url);
        assert_eq!(Some("reader"), request.param("user"));
        assert_eq!(Some("secret"), request.param("pass"));
        assert_eq!(Some("isbn13_search:(978960451482)"), request.param("q"));
        assert_eq!(Some("json"), request.param("wt"));
        assert_eq!(Some("2"), request.param("rows"));
    }

    #[test]
    fn non_json_success_is_decode_error() {
        let transport =
            MockTransport::new().respond(200, include_str!("../../tests/data/error_response.txt"));

        let err = client(&transport).execute(false).unwrap_err();

        assert_eq!(ErrorKind::Decode, err.kind());
        assert_eq!(1, transport.requests().len(), "decode failures are not retried");
    }

    #[test]
    fn client_error_status_is_response_error() {
        let transport = MockTransport::new().respond(404, "not found");

        let err = client(&transport).execute(false).unwrap_err();

        assert_eq!(ErrorKind::Response, err.kind());
        assert!(err.to_string().contains("404"));
        assert_eq!(1, transport.requests().len());
    }

    #[test]
    fn transient_failures_are_retried() {
        let transport = MockTransport::new()
            .fail("connection reset")
            .respond(503, "busy")
            .respond(200, include_str!("../../tests/data/empty_response.json"));

        assert!(client(&transport).execute(false).is_ok());
        assert_eq!(3, transport.requests().len());
    }

    #[test]
    fn exhausted_retries_are_transport_error() {
        let transport = MockTransport::new()
            .fail("timeout")
            .fail("timeout")
            .fail("timeout")
            .fail("timeout");

        let err = client(&transport).execute(false).unwrap_err();

        assert_eq!(ErrorKind::Transport, err.kind());
        assert!(err.to_string().contains("Giving up after 4 attempts"));
        assert_eq!(4, transport.requests().len());
    }

    #[test]
    fn persistent_server_error_is_response_error() {
        let opts = SearchOptions {
            max_retry_count: Some(1),
            ..options()
        };
        let transport = MockTransport::new()
            .respond(500, "down")
            .respond(500, "still down");

        let err = SearchClient::with_transport(&opts, &Defaults::default(), &transport)
            .unwrap()
            .execute(false)
            .unwrap_err();

        assert_eq!(ErrorKind::Response, err.kind());
        assert!(err.to_string().contains("still down"));
        assert_eq!(2, transport.requests().len());
    }

    #[test]
    fn invalid_url_fails_before_any_request() {
        let transport = MockTransport::new();
        let opts = SearchOptions::new("not a url");

        let err = SearchClient::with_transport(&opts, &Defaults::default(), &transport)
            .unwrap_err();

        assert_eq!(ErrorKind::Configuration, err.kind());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn long_bodies_are_cut_in_messages() {
        let body = "é".repeat(BODY_EXCERPT * 2);
        assert_eq!(BODY_EXCERPT, excerpt(&body).chars().count());
        assert_eq!("short", excerpt("short"));
    }
}
