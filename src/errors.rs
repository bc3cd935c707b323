use std::{fmt, io, num::ParseFloatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or non-2xx status.
    Fetch,
    /// The expected script block or table is missing from the page.
    NoListData,
    /// Embedded data was found but could not be parsed.
    ParseFailure,
    Io,
    Config,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
        }
    }

    pub fn fetch(url: &str, message: impl fmt::Display) -> Self {
        Error::new(ErrorKind::Fetch, format!("{url}: {message}"))
    }

    pub fn no_list_data(url: &str) -> Self {
        Error::new(ErrorKind::NoListData, format!("no list data on {url}"))
    }

    pub fn parse_failure(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::ParseFailure, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Config, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::ParseFailure,
            message: value.to_string(),
        }
    }
}

impl From<ParseFloatError> for Error {
    fn from(value: ParseFloatError) -> Self {
        Error {
            kind: ErrorKind::ParseFailure,
            message: value.to_string(),
        }
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error {
            kind: ErrorKind::ParseFailure,
            message: value.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error {
            kind: ErrorKind::ParseFailure,
            message: value,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.message, "gone");
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.kind, ErrorKind::ParseFailure);
    }

    #[test]
    fn display_names_the_kind() {
        let err = Error::no_list_data("https://example.test/objects/herbs");
        assert_eq!(
            err.to_string(),
            "NoListData: no list data on https://example.test/objects/herbs"
        );
    }
}
