use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;


pub const GZIP: &str = "gzip";


/// Content codings the server can apply to a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Gzip,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Gzip => GZIP,
        }
    }

    pub fn encode(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Encoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }
}

/// Pick a coding from an `Accept-Encoding` value such as `deflate, gzip`.
/// Tokens are compared exactly; parameters like `;q=` are not understood.
pub fn negotiate(accept: &str) -> Option<Encoding> {
    accept
        .split(',')
        .map(str::trim)
        .find(|t| *t == GZIP)
        .map(|_| Encoding::Gzip)
}


#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn picks_gzip_from_list() {
        assert_eq!(negotiate("gzip"), Some(Encoding::Gzip));
        assert_eq!(negotiate("deflate, gzip, br"), Some(Encoding::Gzip));
        assert_eq!(negotiate("deflate,gzip"), Some(Encoding::Gzip));
        assert_eq!(negotiate("invalid-encoding"), None);
        assert_eq!(negotiate(""), None);
        assert_eq!(negotiate("gzipx, xgzip"), None);
    }

    #[test]
    fn gzip_output_decodes() {
        let packed = Encoding::Gzip.encode(b"abc").unwrap();
        assert_eq!(&packed[..2], &[0x1f_u8, 0x8b]);

        let mut unpacked = Vec::new();
        GzDecoder::new(&packed[..]).read_to_end(&mut unpacked).unwrap();
        assert_eq!(unpacked, b"abc");
    }
}
