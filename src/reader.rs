use std::io::{self, BufRead, Read};


const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Splits a raw byte stream into CRLF-terminated lines and, once the header
/// block is done, hands out a fixed number of raw body bytes.
///
/// Only the pair `\r\n` ends a line. A bare `\n` is kept as line content.
pub struct LineReader<R> {
    inner: R,
    line: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> LineReader<R> {
        LineReader { inner, line: Vec::new() }
    }

    /// Read the next logical line with its terminator stripped.
    ///
    /// An empty vector means an empty line, which ends the header block.
    /// Running out of stream before a CRLF is an `UnexpectedEof` error.
    pub fn read_line(&mut self) -> io::Result<Vec<u8>> {
        self.line.clear();
        loop {
            let n = self.inner.read_until(LF, &mut self.line)?;
            if n == 0 || self.line.last() != Some(&LF) {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended before CRLF",
                ));
            }
            if self.line.len() >= 2 && self.line[self.line.len() - 2] == CR {
                self.line.truncate(self.line.len() - 2);
                return Ok(std::mem::take(&mut self.line));
            }
            // bare LF, keep scanning
        }
    }

    /// Read exactly `count` bytes, ignoring line structure.
    pub fn read_exact_bytes(&mut self, count: u64) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        let got = (&mut self.inner).take(count).read_to_end(&mut body)?;
        if (got as u64) < count {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} body bytes, stream ended after {}", count, got),
            ));
        }
        Ok(body)
    }
}
