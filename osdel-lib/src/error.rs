pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the osdel functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The search options cannot produce a usable client, e.g. the base URL has no scheme or host.
    Configuration,
    /// The request could not be completed: connection failure, timeout or retries exhausted.
    Transport,
    /// The service answered with a non-success HTTP status.
    Response,
    /// The response body is not JSON matching the expected result envelope.
    Decode,
    /// A single row of an input CSV could not be understood.
    InputParse,
    /// An input or output file could not be opened, read or written.
    IO,
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Wraps an existing error as the source of [`Error`] with a message for added context.
    pub fn wrap_with<E, S>(kind: ErrorKind, source: E, message: S) -> Self
    where
        E: Into<DynError>,
        S: Into<String>,
    {
        Self {
            kind,
            message: Some(message.into()),
            source: Some(source.into()),
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::Configuration => f.write_str("Configuration error")?,
            ErrorKind::Transport => f.write_str("Transport error")?,
            ErrorKind::Response => f.write_str("Response error")?,
            ErrorKind::Decode => f.write_str("Decode error")?,
            ErrorKind::InputParse => f.write_str("Input parse error")?,
            ErrorKind::IO => f.write_str("IO error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
