use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, BufRead};
use std::str::FromStr;

use crate::error::ParseError;
use crate::reader::LineReader;


pub const HTTP_11: &str = "HTTP/1.1";

pub const HEADER_HOST: &str = "host";
pub const HEADER_CONTENT_LENGTH: &str = "content-length";
pub const HEADER_TRANSFER_ENCODING: &str = "transfer-encoding";
pub const HEADER_USER_AGENT: &str = "user-agent";
pub const HEADER_ACCEPT_ENCODING: &str = "accept-encoding";


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Method, ParseError> {
        match s {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "CONNECT" => Ok(Method::Connect),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            _ => Err(ParseError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// A fully read HTTP/1.1 request.
///
/// The target and header values are kept as the raw bytes that arrived.
/// Header names are stored lowercased. Their order on the wire is not kept.
#[derive(Debug)]
pub struct Request {
    method: Method,
    target: Vec<u8>,
    version: String,
    headers: HashMap<String, Vec<u8>>,
    content_length: u64,
    body: Vec<u8>,
}

impl Request {
    /// Read one request off the stream: request line, header block, then the
    /// body if `Content-Length` says there is one. Any failure aborts.
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Request, ParseError> {
        let line = reader.read_line()?;
        let (method, target, version) = parse_request_line(&line)?;
        let headers = parse_headers(reader)?;
        let (content_length, body) = read_body(reader, &headers)?;

        Ok(Request { method, target, version, headers, content_length, body })
    }

    pub fn method(&self) -> Method { self.method }
    pub fn target(&self) -> &[u8] { &self.target }
    pub fn version(&self) -> &str { &self.version }
    pub fn headers(&self) -> &HashMap<String, Vec<u8>> { &self.headers }
    pub fn content_length(&self) -> u64 { self.content_length }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Target for log lines.
    pub fn target_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.target)
    }

    /// Header value by name, any case.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers.get(&name.to_ascii_lowercase()).map(Vec::as_slice)
    }
}


fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// `<method> <target> <version>`, separated by single spaces.
pub fn parse_request_line(line: &[u8]) -> Result<(Method, Vec<u8>, String), ParseError> {
    let parts: Vec<&[u8]> = line.split(|b| *b == b' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine);
    };

    let method = std::str::from_utf8(method)
        .map_err(|_| ParseError::UnknownMethod(lossy(method)))?
        .parse::<Method>()?;
    if !target.starts_with(b"/") {
        return Err(ParseError::MalformedTarget(lossy(target)));
    }
    if version != HTTP_11.as_bytes() {
        return Err(ParseError::UnsupportedVersion(lossy(version)));
    }

    Ok((method, target.to_vec(), HTTP_11.to_string()))
}

/// Split a header line on its first `:`. The name is lowercased; the value
/// is what follows the colon minus its first byte, whatever it is.
/// A line with no colon at all becomes a name with an empty value.
pub fn split_header_line(line: &[u8]) -> (String, Vec<u8>) {
    let (name, rest) = match line.iter().position(|b| *b == b':') {
        Some(at) => (&line[..at], &line[at + 1..]),
        None => (line, &[][..]),
    };
    let value = rest.get(1..).unwrap_or_default().to_vec();
    (lossy(&name.to_ascii_lowercase()), value)
}

/// Collect header lines up to the empty line ending the block.
pub fn parse_headers<R: BufRead>(reader: &mut LineReader<R>) -> Result<HashMap<String, Vec<u8>>, ParseError> {
    let mut headers = HashMap::new();
    loop {
        let line = reader.read_line()?;
        if line.is_empty() {
            break;
        }

        let (name, value) = split_header_line(&line);
        if name == HEADER_HOST && headers.contains_key(HEADER_HOST) {
            return Err(ParseError::DuplicateHostHeader);
        }
        headers.insert(name, value);
    }

    if !headers.contains_key(HEADER_HOST) {
        return Err(ParseError::MissingHostHeader);
    }
    Ok(headers)
}

/// Value of `Content-Length`, accepting a comma-folded list as long as every
/// entry is the same number.
pub fn parse_content_length(raw: &[u8]) -> Result<u64, ParseError> {
    let malformed = || ParseError::MalformedContentLength(lossy(raw));

    let compact: Vec<u8> = raw.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    let mut tokens = compact.split(|b| *b == b',');
    let first = tokens.next().unwrap_or_default();
    if tokens.any(|t| t != first) {
        return Err(malformed());
    }
    if first.is_empty() || !first.iter().all(u8::is_ascii_digit) {
        return Err(malformed());
    }
    // all ASCII digits, so valid UTF-8
    std::str::from_utf8(first)
        .map_err(|_| malformed())?
        .parse::<u64>()
        .map_err(|_| malformed())
}

/// Body framing: `Transfer-Encoding` is refused, `Content-Length` decides the
/// byte count, and with neither the body is empty.
pub fn read_body<R: BufRead>(
    reader: &mut LineReader<R>,
    headers: &HashMap<String, Vec<u8>>,
) -> Result<(u64, Vec<u8>), ParseError> {
    if headers.contains_key(HEADER_TRANSFER_ENCODING) {
        return Err(ParseError::UnsupportedTransferEncoding);
    }
    let Some(raw) = headers.get(HEADER_CONTENT_LENGTH) else {
        return Ok((0, Vec::new()));
    };

    let length = parse_content_length(raw)?;
    match reader.read_exact_bytes(length) {
        Ok(body) => Ok((length, body)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ParseError::TruncatedBody(e)),
        Err(e) => Err(ParseError::Stream(e)),
    }
}
