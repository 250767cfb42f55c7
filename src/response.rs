use std::collections::HashMap;
use std::io::{self, Write};


pub const HTTP_VERSION: &str = "HTTP/1.1";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";


/// Status codes this server is able to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Created,
    BadRequest,
    NotFound,
    InternalServerError,
    NotImplemented,
    HttpVersionNotSupported,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
            Status::NotImplemented => 501,
            Status::HttpVersionNotSupported => 505,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Created => "Created",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
            Status::NotImplemented => "Not Implemented",
            Status::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}


/// A response waiting to be written out.
///
/// Header order is not kept. Nothing here computes `Content-Length`: whoever
/// builds a response with a body declares its length.
#[derive(Debug, Clone)]
pub struct Response {
    status: Status,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: Status) -> Response {
        Response { status, headers: HashMap::new(), body: Vec::new() }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Response {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Response {
        self.body = body;
        self
    }

    /// Body with its type and length headers filled in.
    pub fn with_content(self, content_type: &str, body: Vec<u8>) -> Response {
        let len = body.len().to_string();
        self.with_header(CONTENT_TYPE, content_type)
            .with_header(CONTENT_LENGTH, &len)
            .with_body(body)
    }

    pub fn status(&self) -> Status { self.status }
    pub fn headers(&self) -> &HashMap<String, String> { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Write status line, headers, blank line and body. Returns the number
    /// of bytes written.
    pub fn write_to<W: Write>(&self, version: &str, w: &mut W) -> io::Result<usize> {
        let mut head = format!("{} {} {}\r\n", version, self.status.code(), self.status.reason());
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        w.write_all(head.as_bytes())?;
        w.write_all(&self.body)?;
        Ok(head.len() + self.body.len())
    }

    pub fn to_bytes(&self, version: &str) -> Vec<u8> {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write_to(version, &mut out);
        out
    }
}
