use chrono::{DateTime, Utc};
use serde::Deserialize;

/// RFC 1123 with a named UTC zone, e.g. `Mon, 02 Jan 2006 15:04:05 UTC`.
const RFC1123_UTC: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// How an absent timestamp is written: the zero instant, year 1.
const ZERO_RFC1123: &str = "Mon, 01 Jan 0001 00:00:00 UTC";

/// A point in time on a catalog record.
///
/// The service sends RFC 3339 strings, which are normalised to UTC on decode. Fields that are
/// missing or `null` decode to an empty timestamp which still has a textual form, so that every
/// CSV row keeps the same shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    /// Creates a timestamp for a known instant.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    /// The instant, if the record carried one.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Formats the timestamp as RFC 1123.
    #[must_use]
    pub fn to_rfc1123(&self) -> String {
        self.0.map_or_else(
            || ZERO_RFC1123.to_owned(),
            |instant| instant.format(RFC1123_UTC).to_string(),
        )
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant)
    }
}
