#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # osdel
//!
//! osdel is a library for searching a Solr backed book catalog by ISBN or publisher and
//! exporting the records found as CSV, either one query at a time or in batches of ISBNs read
//! from a CSV file.
//!
//! All requests are blocking and sent one after another.

mod api;
pub mod batch;
mod error;
pub mod file;
pub mod format;
pub mod model;

pub use api::{
    http_client, Defaults, Query, RawResponse, RetryPolicy, SearchClient, SearchConfig,
    SearchOptions, Transport,
};
pub use batch::{search_by_isbn_from_csv, write_results_to_csv};
pub use error::{Error, ErrorKind};
pub use model::{Book, CompactBook, QueryResult};

use log::trace;

/// Runs a single search over HTTP with the given options.
///
/// # Errors
///
/// See [`SearchClient::new`] and [`SearchClient::execute`].
#[inline]
pub fn search(opts: &SearchOptions, verbose: bool) -> Result<QueryResult, Error> {
    trace!("Search with options {opts:?}");
    SearchClient::new(opts)?.execute(verbose)
}
