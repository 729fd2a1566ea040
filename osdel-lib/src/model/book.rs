use serde::{Deserialize, Deserializer};

use super::Timestamp;

/// A catalog entry as returned in the `docs` of a search response.
///
/// Every field is optional on the wire; missing and `null` values decode to their defaults.
/// Multi-valued fields keep the order the service returned them in.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Book {
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub translated: String,
    #[serde(deserialize_with = "null_as_default")]
    pub publishing_status: String,
    pub last_update: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub product_status: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub lcx: bool,
    pub add_product_ts: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub product_form_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_form: String,
    #[serde(deserialize_with = "null_as_default")]
    pub product_kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub imprint: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pages: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub distinctive_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub distinctive_subtitle: String,
    #[serde(deserialize_with = "null_as_default")]
    pub thema_code: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub classification: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub audience: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub language: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub edition_no: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_month: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_year: u16,
    #[serde(deserialize_with = "null_as_default")]
    pub pub_day: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub license_no: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub lcno: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub gtin13: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prefix: String,
    #[serde(deserialize_with = "null_as_default")]
    pub isbn13: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_id: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_name: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_id_role: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_id_tab: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_role: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contr_denoms: Vec<String>,
    pub last_price_update: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub price_change: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub vat: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub vat_change: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub price_type: String,
    pub price_valid_until: Timestamp,
    #[serde(deserialize_with = "null_as_default")]
    pub cover: String,
    #[serde(rename = "_version_", deserialize_with = "null_as_default")]
    pub version: i64,
}

/// The identity and pricing fields of a [`Book`], used for price tracking.
///
/// This is a view over a [`Book`] and borrows from it, see [`Book::compact`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompactBook<'a> {
    pub product_id: &'a str,
    pub publishing_status: &'a str,
    pub pub_id: &'a str,
    pub pub_name: &'a str,
    pub isbn13: &'a str,
    pub distinctive_title: &'a str,
    pub last_update: Timestamp,
    pub last_price_update: Timestamp,
    pub price_valid_until: Timestamp,
    pub price: f64,
    pub price_change: f64,
    pub vat: f64,
    pub vat_change: f64,
    pub price_type: &'a str,
}

impl Book {
    /// Projects the record down to its identity and pricing fields.
    #[must_use]
    pub fn compact(&self) -> CompactBook<'_> {
        CompactBook {
            product_id: &self.product_id,
            publishing_status: &self.publishing_status,
            pub_id: &self.pub_id,
            pub_name: &self.pub_name,
            isbn13: &self.isbn13,
            distinctive_title: &self.distinctive_title,
            last_update: self.last_update,
            last_price_update: self.last_price_update,
            price_valid_until: self.price_valid_until,
            price: self.price,
            price_change: self.price_change,
            vat: self.vat,
            vat_change: self.vat_change,
            price_type: &self.price_type,
        }
    }
}

/// Reads `null` as the type's default, the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl<'a> From<&'a Book> for CompactBook<'a> {
    fn from(book: &'a Book) -> Self {
        book.compact()
    }
}
