use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::trace;

use super::Row;
use crate::{
    model::{Book, CompactBook},
    Error, ErrorKind,
};

/// Writes the header of `R` followed by one line per row.
///
/// Fields are quoted only when they contain a delimiter, a quote or a line break, and lines end
/// with `\n`.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the underlying writer fails.
pub fn write_rows<'r, W, R, I>(writer: W, rows: I) -> Result<(), Error>
where
    W: Write,
    R: Row + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let mut csv = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(R::header()).map_err(write_error)?;

    let mut count = 0_usize;
    for row in rows {
        csv.write_record(row.fields()).map_err(write_error)?;
        count += 1;
    }

    csv.flush()
        .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot flush CSV output"))?;
    trace!("{count} CSV rows written");
    Ok(())
}

/// Writes `books` as CSV using either the full or the compact schema.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the underlying writer fails.
pub fn write_records<W: Write>(writer: W, books: &[Book], compact: bool) -> Result<(), Error> {
    if compact {
        let rows: Vec<CompactBook<'_>> = books.iter().map(Book::compact).collect();
        write_rows(writer, &rows)
    } else {
        write_rows(writer, books)
    }
}

fn write_error(e: csv::Error) -> Error {
    Error::wrap_with(ErrorKind::IO, e, "Cannot write CSV row")
}
