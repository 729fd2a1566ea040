use std::{
    io,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use log::info;
use osdel::{Book, Query, SearchOptions};

use crate::SearchArgs;

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    /// Search every ISBN listed in a CSV file, one row each.
    Batch { file: PathBuf, price: bool },
    /// Run one query.
    Single { query: String, rows: u64 },
}

impl Mode {
    /// `--file`, `--isbn` and `--publisher` exclude each other, which clap already enforces, so
    /// at most one of them is set here.
    pub fn from_args(args: SearchArgs) -> Self {
        let SearchArgs {
            file,
            isbn,
            publisher,
            rows,
            price,
        } = args;

        if let Some(file) = file {
            return Self::Batch { file, price };
        }

        let query = match (isbn, publisher) {
            (Some(isbn), _) => {
                info!("Searching for ISBN-13: {isbn}");
                Query::isbn13(&isbn)
            }
            (None, Some(publisher)) => {
                info!("Searching for publisher: {publisher}");
                Query::imprint(&publisher)
            }
            (None, None) => {
                info!("No ISBN-13 or publisher specified, searching all books");
                Query::ALL.to_owned()
            }
        };

        Self::Single { query, rows }
    }

    pub const fn is_price_tracking(&self) -> bool {
        matches!(self, Self::Batch { price: true, .. })
    }
}

pub fn run(
    mode: Mode,
    base: &SearchOptions,
    output: Option<&Path>,
    compact: bool,
    verbose: bool,
) -> Result<()> {
    let books = search(mode, base, verbose)?;
    info!("Finished parsing all book results: {} records", books.len());

    if let Some(path) = output {
        osdel::write_results_to_csv(path, &books, compact)
            .wrap_err_with(|| format!("Cannot write results to '{}'", path.display()))
    } else {
        let stdout = io::stdout();
        osdel::format::write_records(stdout.lock(), &books, compact)
            .wrap_err("Cannot write results to standard output")
    }
}

fn search(mode: Mode, base: &SearchOptions, verbose: bool) -> Result<Vec<Book>> {
    match mode {
        Mode::Batch { file, price } => osdel::search_by_isbn_from_csv(&file, price, base, verbose)
            .wrap_err_with(|| format!("Batch search of '{}' failed", file.display())),
        Mode::Single { query, rows } => osdel::search(&base.with_query(query, rows), verbose)
            .map(osdel::QueryResult::into_books)
            .wrap_err("Search failed"),
    }
}
