//! Opening the input and output files of a batch run.
//!
//! Files are closed when the returned handle goes out of scope, on success and error paths
//! alike.

use std::{
    fs::{File, OpenOptions},
    path::Path,
};

use crate::{Error, ErrorKind};

/// Opens an existing file for reading.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the file does not exist or the user lacks
/// permissions to read it.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<File, Error> {
    let path = path.as_ref();
    File::open(path).map_err(|e| {
        Error::wrap_with(
            ErrorKind::IO,
            e,
            format!("Failed to open the '{}' file for reading", path.display()),
        )
    })
}

/// Opens a file for writing, creating it if needed and truncating it if it exists.
///
/// # Errors
///
/// An [`Err`] with [`ErrorKind::IO`] is returned when the file cannot be created, e.g. the
/// parent directory is missing or the user lacks permissions.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<File, Error> {
    let path = path.as_ref();
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                format!("Failed to create the '{}' file for writing", path.display()),
            )
        })
}
