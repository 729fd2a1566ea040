//! Looking up many ISBNs listed in a CSV file, and writing results back out as CSV.
//!
//! The input has a header row followed by rows of `isbn,price_tracking`. A row that cannot be
//! understood is skipped with a warning, while a failed lookup aborts the whole batch and no
//! records are returned.

use std::{io::Read, path::Path};

use log::{info, trace, warn};

use crate::{
    api::{http_client, Defaults, Query, SearchClient, SearchOptions, Transport},
    file::{create_output, open_input},
    format::write_records,
    model::Book,
    Error, ErrorKind,
};

/// Parses a boolean literal as written by spreadsheets and scripts.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false counterparts `0`, `f`, `F`,
/// `FALSE`, `false`, `False`.
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Reads the ISBNs to look up from CSV input.
///
/// The first row is always treated as a header. When `price` is set only rows flagged for price
/// tracking are kept, otherwise every row with a valid flag is.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the input cannot be read as CSV at all.
/// Individual bad rows are not errors.
pub fn read_isbns<R: Read>(reader: R, price: bool) -> Result<Vec<String>, Error> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut isbns = Vec::new();
    for record in rows.records() {
        let record =
            record.map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot read the input CSV"))?;
        let line = record.position().map_or(0, csv::Position::line);

        let (isbn, flag) = match (record.get(0), record.get(1)) {
            (Some(isbn), Some(flag)) => (isbn, flag),
            _ => {
                let err = Error::new(
                    ErrorKind::InputParse,
                    format!("line {line}: expected an ISBN and a price tracking flag"),
                );
                warn!("Skipping row - {err}");
                continue;
            }
        };

        let track = match parse_bool(flag) {
            Some(track) => track,
            None => {
                let err = Error::new(
                    ErrorKind::InputParse,
                    format!("line {line}: price tracking value '{flag}' is not a boolean"),
                );
                warn!("Skipping row - {err}");
                continue;
            }
        };

        if price && !track {
            trace!("line {line}: '{isbn}' is not price tracked");
            continue;
        }

        isbns.push(isbn.to_owned());
    }

    Ok(isbns)
}

/// Looks up each ISBN in turn, one record per ISBN requested, and collects every record found.
///
/// Each lookup uses options derived from `base` with the query and row count replaced; `base`
/// itself is never changed. Records are not deduplicated.
///
/// # Errors
///
/// The first failed lookup is returned and every record found so far is discarded.
pub fn search_isbns<T: Transport>(
    isbns: &[String],
    base: &SearchOptions,
    defaults: &Defaults,
    verbose: bool,
    transport: &T,
) -> Result<Vec<Book>, Error> {
    // Fail on bad configuration even when there is nothing to look up.
    base.resolve(defaults)?;

    let mut books = Vec::new();
    for isbn in isbns {
        info!("Searching for ISBN-13: {isbn}");
        let opts = base.with_query(Query::isbn13(isbn), 1);
        let result = SearchClient::with_transport(&opts, defaults, transport)?.execute(verbose)?;
        books.extend(result.into_books());
    }

    info!("Finished searching {} ISBNs, {} records found", isbns.len(), books.len());
    Ok(books)
}

/// Reads ISBNs from the CSV file at `path` and looks each of them up through `transport`.
///
/// # Errors
///
/// See [`read_isbns`] and [`search_isbns`]. Failing to open the file is an
/// [`ErrorKind::IO`] error.
pub fn search_by_isbn_from_csv_with<P, T>(
    path: P,
    price: bool,
    base: &SearchOptions,
    defaults: &Defaults,
    verbose: bool,
    transport: &T,
) -> Result<Vec<Book>, Error>
where
    P: AsRef<Path>,
    T: Transport,
{
    let path = path.as_ref();
    info!("Reading from CSV file: {}", path.display());
    let isbns = read_isbns(open_input(path)?, price)?;
    trace!("{} ISBNs to search for", isbns.len());
    search_isbns(&isbns, base, defaults, verbose, transport)
}

/// Reads ISBNs from the CSV file at `path` and looks each of them up over HTTP.
///
/// # Errors
///
/// See [`search_by_isbn_from_csv_with`].
pub fn search_by_isbn_from_csv<P: AsRef<Path>>(
    path: P,
    price: bool,
    base: &SearchOptions,
    verbose: bool,
) -> Result<Vec<Book>, Error> {
    let transport = http_client()?;
    search_by_isbn_from_csv_with(path, price, base, &Defaults::default(), verbose, &transport)
}

/// Writes `books` to the file at `path` as CSV, replacing any previous content.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the file cannot be created or written.
pub fn write_results_to_csv<P: AsRef<Path>>(
    path: P,
    books: &[Book],
    compact: bool,
) -> Result<(), Error> {
    let path = path.as_ref();
    info!("Writing {} records to CSV file: {}", books.len(), path.display());
    let file = create_output(path)?;
    write_records(std::io::BufWriter::new(file), books, compact)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::MockTransport;

    use assert_fs::{fixture::FileWriteStr, NamedTempFile};

    const URL: &str = "http://solr.example.org/solr/index.php";

    fn base() -> SearchOptions {
        SearchOptions {
            retry_wait_time: Some(Duration::ZERO),
            max_retry_wait_time: Some(Duration::ZERO),
            ..SearchOptions::new(URL).with_credentials("reader", "secret")
        }
    }

    fn input(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new("isbns.csv").expect("Cannot create temp file for test");
        file.write_str(content).unwrap();
        file
    }

    fn single(isbn: &str) -> String {
        format!(
            r#"{{"responseHeader":{{"status":0,"QTime":1,"params":{{"q":"isbn13_search:({isbn})"}}}},
                "response":{{"numFound":1,"start":0,"numFoundExact":true,"docs":[{{"isbn13":"{isbn}"}}]}}}}"#
        )
    }

    #[test]
    fn bool_literals() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(Some(true), parse_bool(s), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(Some(false), parse_bool(s), "{s}");
        }
        for s in ["", "yes", "tRuE", " true", "2"] {
            assert_eq!(None, parse_bool(s), "{s}");
        }
    }

    #[test]
    fn header_is_always_skipped() {
        let isbns = read_isbns("9789604514823,true\n".as_bytes(), false).unwrap();
        assert!(isbns.is_empty());
    }

    #[test]
    fn price_filter_keeps_tracked_rows() {
        let csv = "isbn,track\n1111111111111,true\n2222222222222,false\n3333333333333,1\n";

        assert_eq!(
            vec!["1111111111111", "3333333333333"],
            read_isbns(csv.as_bytes(), true).unwrap()
        );
        assert_eq!(
            vec!["1111111111111", "2222222222222", "3333333333333"],
            read_isbns(csv.as_bytes(), false).unwrap()
        );
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv = "isbn,track\n1111111111111,maybe\n2222222222222\n3333333333333,false\n";

        assert_eq!(vec!["3333333333333"], read_isbns(csv.as_bytes(), false).unwrap());
    }

    #[test]
    fn header_only_input_makes_no_requests() {
        let file = input("isbn,track\n");
        let transport = MockTransport::new();

        let books = search_by_isbn_from_csv_with(
            file.path(),
            true,
            &base(),
            &Defaults::default(),
            false,
            &transport,
        )
        .unwrap();

        assert!(books.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn tracked_isbn_is_queried_with_one_row() {
        let file = input("isbn,track\n9789604514823,true\n");
        let transport = MockTransport::new().respond(200, &single("9789604514823"));

        let books = search_by_isbn_from_csv_with(
            file.path(),
            true,
            &base(),
            &Defaults::default(),
            false,
            &transport,
        )
        .unwrap();

        assert_eq!(1, books.len());
        let requests = transport.requests();
        assert_eq!(1, requests.len());
        assert_eq!(Some("isbn13_search:(9789604514823)"), requests[0].param("q"));
        assert_eq!(Some("1"), requests[0].param("rows"));
        assert_eq!(Some("reader"), requests[0].param("user"));
    }

    #[test]
    fn bad_row_does_not_stop_later_rows() {
        let file = input("isbn,track\n1111111111111,nope\n2222222222222,true\n");
        let transport = MockTransport::new().respond(200, &single("2222222222222"));

        let books = search_by_isbn_from_csv_with(
            file.path(),
            false,
            &base(),
            &Defaults::default(),
            false,
            &transport,
        )
        .unwrap();

        assert_eq!("2222222222222", books[0].isbn13);
        assert_eq!(1, transport.requests().len());
    }

    #[test]
    fn failed_lookup_discards_the_batch() {
        let isbns = vec![
            "1111111111111".to_owned(),
            "2222222222222".to_owned(),
            "3333333333333".to_owned(),
        ];
        let opts = SearchOptions {
            max_retry_count: Some(0),
            ..base()
        };
        let transport = MockTransport::new()
            .respond(200, &single("1111111111111"))
            .fail("connection refused")
            .respond(200, &single("3333333333333"));

        let err = search_isbns(&isbns, &opts, &Defaults::default(), false, &transport).unwrap_err();

        assert_eq!(ErrorKind::Transport, err.kind());
        assert_eq!(2, transport.requests().len(), "third ISBN is never requested");
    }

    #[test]
    fn duplicates_are_kept() {
        let isbns = vec!["1111111111111".to_owned(), "1111111111111".to_owned()];
        let transport = MockTransport::new()
            .respond(200, &single("1111111111111"))
            .respond(200, &single("1111111111111"));

        let books = search_isbns(&isbns, &base(), &Defaults::default(), false, &transport).unwrap();

        assert_eq!(2, books.len());
    }

    #[test]
    fn base_options_are_not_changed_by_a_batch() {
        let base = base();
        let before = base.clone();
        let transport = MockTransport::new().respond(200, &single("1111111111111"));

        search_isbns(
            &["1111111111111".to_owned()],
            &base,
            &Defaults::default(),
            false,
            &transport,
        )
        .unwrap();

        assert_eq!(before, base);
    }

    #[test]
    fn invalid_base_url_fails_before_reading_results() {
        let transport = MockTransport::new();
        let err = search_isbns(
            &[],
            &SearchOptions::new("nowhere"),
            &Defaults::default(),
            false,
            &transport,
        )
        .unwrap_err();

        assert_eq!(ErrorKind::Configuration, err.kind());
    }

    #[test]
    fn missing_input_is_io_error() {
        let err = search_by_isbn_from_csv_with(
            "does not exist.csv",
            false,
            &base(),
            &Defaults::default(),
            false,
            &MockTransport::new(),
        )
        .unwrap_err();

        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn results_are_written_to_file() {
        let out = NamedTempFile::new("out.csv").expect("Cannot create temp file for test");
        out.write_str("stale\nstale\nstale\n").unwrap();

        let books = vec![Book {
            isbn13: "9789604514823".to_owned(),
            price: 10.0,
            ..Book::default()
        }];
        write_results_to_csv(out.path(), &books, true).unwrap();

        let content = std::fs::read_to_string(out.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(2, lines.len());
        assert!(lines[0].starts_with("product_id,publishing_status,"));
        assert!(lines[1].contains("9789604514823"));
        assert!(lines[1].contains(",10.00,"));
    }
}
