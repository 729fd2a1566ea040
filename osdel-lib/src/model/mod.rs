//! The search result envelope and the catalog records inside it.

mod book;
mod timestamp;

use std::collections::BTreeMap;

pub use book::{Book, CompactBook};
use serde::Deserialize;
pub use timestamp::Timestamp;

/// A decoded search response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct QueryResult {
    #[serde(rename = "responseHeader")]
    pub header: ResponseHeader,
    #[serde(rename = "response")]
    pub body: ResponseBody,
}

/// Metadata the service reports about the query it ran.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub status: i64,
    /// Query time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub query_time: i64,
    #[serde(default)]
    pub params: QueryParams,
}

/// The request parameters echoed back by the service.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
    pub wt: Option<String>,
    pub rows: Option<String>,
    /// Anything else the service chose to echo.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ResponseBody {
    /// Total number of matching records, not only those returned.
    #[serde(rename = "numFound", default)]
    pub num_found: i64,
    #[serde(default)]
    pub start: i64,
    #[serde(rename = "numFoundExact", default)]
    pub num_found_exact: bool,
    #[serde(default)]
    pub docs: Vec<Book>,
}

impl QueryResult {
    /// Consumes the result returning the records it contains.
    #[must_use]
    pub fn into_books(self) -> Vec<Book> {
        self.body.docs
    }
}
