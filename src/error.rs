use std::io;

use thiserror::Error;


/// Why an incoming request could not be turned into a [`crate::request::Request`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid request line")]
    MalformedRequestLine,

    #[error("invalid request method: {0}")]
    UnknownMethod(String),

    #[error("invalid HTTP version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid request target: {0}")]
    MalformedTarget(String),

    #[error("missing Host header")]
    MissingHostHeader,

    #[error("multiple Host headers")]
    DuplicateHostHeader,

    #[error("unsupported Transfer-Encoding")]
    UnsupportedTransferEncoding,

    #[error("invalid Content-Length: {0}")]
    MalformedContentLength(String),

    #[error("body shorter than Content-Length: {0}")]
    TruncatedBody(io::Error),

    #[error("stream error: {0}")]
    Stream(#[from] io::Error),
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> io::Error {
        match err {
            ParseError::Stream(e) | ParseError::TruncatedBody(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_io_error_keeps_transport_cause() {
        let err: io::Error = ParseError::Stream(io::Error::from(io::ErrorKind::ConnectionReset)).into();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);

        let err: io::Error = ParseError::MissingHostHeader.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "missing Host header");
    }
}
