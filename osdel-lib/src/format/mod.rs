//! Serialisation of catalog records into flat rows.
//!
//! A [`Row`] type declares a fixed header and produces one field per header column. Field
//! formatting is shared by all row types so the full and compact outputs always agree:
//! timestamps are RFC 1123, money has two decimals, booleans are `true`/`false`, multi-valued
//! fields are joined by a single space and integers are plain decimal.

mod csv;

pub use self::csv::{write_records, write_rows};

use crate::model::{Book, CompactBook, Timestamp};

/// A record that can be written as a single row of a fixed schema.
pub trait Row {
    /// The column names, in output order.
    fn header() -> &'static [&'static str];

    /// The fields of this record, in the same order as [`Row::header`].
    fn fields(&self) -> Vec<String>;
}

const BOOK_HEADER: &[&str] = &[
    "product_id",
    "translated",
    "publishing_status",
    "last_update",
    "product_status",
    "lcx",
    "add_product_ts",
    "product_form_id",
    "product_form",
    "product_kind",
    "pub_id",
    "pub_name",
    "imprint",
    "pages",
    "distinctive_title",
    "distinctive_subtitle",
    "thema_code",
    "classification",
    "category",
    "audience",
    "language",
    "edition_no",
    "city",
    "pub_month",
    "pub_year",
    "pub_day",
    "license_no",
    "lcno",
    "gtin13",
    "prefix",
    "isbn13",
    "contr_id",
    "contr_name",
    "contr_id_role",
    "contr_id_tab",
    "contr_role",
    "contr_denoms",
    "last_price_update",
    "price",
    "price_change",
    "vat",
    "vat_change",
    "price_type",
    "price_valid_until",
    "cover",
    "version",
];

const COMPACT_HEADER: &[&str] = &[
    "product_id",
    "publishing_status",
    "pub_id",
    "pub_name",
    "isbn13",
    "distinctive_title",
    "last_update",
    "last_price_update",
    "price_valid_until",
    "price",
    "price_change",
    "vat",
    "vat_change",
    "price_type",
];

#[inline]
fn time(ts: Timestamp) -> String {
    ts.to_rfc1123()
}

#[inline]
fn money(value: f64) -> String {
    format!("{value:.2}")
}

#[inline]
fn list(values: &[String]) -> String {
    values.join(" ")
}

impl Row for Book {
    fn header() -> &'static [&'static str] {
        BOOK_HEADER
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            self.translated.clone(),
            self.publishing_status.clone(),
            time(self.last_update),
            self.product_status.to_string(),
            self.lcx.to_string(),
            time(self.add_product_ts),
            self.product_form_id.clone(),
            self.product_form.clone(),
            self.product_kind.clone(),
            self.pub_id.clone(),
            self.pub_name.clone(),
            self.imprint.clone(),
            self.pages.to_string(),
            self.distinctive_title.clone(),
            self.distinctive_subtitle.clone(),
            list(&self.thema_code),
            list(&self.classification),
            list(&self.category),
            list(&self.audience),
            list(&self.language),
            self.edition_no.to_string(),
            self.city.clone(),
            self.pub_month.to_string(),
            self.pub_year.to_string(),
            self.pub_day.to_string(),
            self.license_no.to_string(),
            self.lcno.to_string(),
            self.gtin13.clone(),
            self.prefix.clone(),
            self.isbn13.clone(),
            list(&self.contr_id),
            list(&self.contr_name),
            list(&self.contr_id_role),
            list(&self.contr_id_tab),
            list(&self.contr_role),
            list(&self.contr_denoms),
            time(self.last_price_update),
            money(self.price),
            money(self.price_change),
            money(self.vat),
            money(self.vat_change),
            self.price_type.clone(),
            time(self.price_valid_until),
            self.cover.clone(),
            self.version.to_string(),
        ]
    }
}

impl Row for CompactBook<'_> {
    fn header() -> &'static [&'static str] {
        COMPACT_HEADER
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product_id.to_owned(),
            self.publishing_status.to_owned(),
            self.pub_id.to_owned(),
            self.pub_name.to_owned(),
            self.isbn13.to_owned(),
            self.distinctive_title.to_owned(),
            time(self.last_update),
            time(self.last_price_update),
            time(self.price_valid_until),
            money(self.price),
            money(self.price_change),
            money(self.vat),
            money(self.vat_change),
            self.price_type.to_owned(),
        ]
    }
}
