//! The comux container format.
//!
//! A comux file encodes N concurrent socket conversations with a target
//! server as an ordered set of scheduled chunks. The file begins with a
//! header:
//!
//! ```text
//! +---------------------------------------------------+
//! | MAGIC      VERSION      NUM_CONNS      NUM_CHUNKS |
//! +---------------------------------------------------+
//! ```
//!
//! where MAGIC is the 8-byte identifier `comux!!!`, VERSION is a 4-byte
//! integer (currently always 0), NUM_CONNS is the 4-byte number of logical
//! connections to open, and NUM_CHUNKS is the 4-byte number of chunk records
//! that follow. Each chunk record is a 20-byte header followed by its
//! payload:
//!
//! ```text
//! +------------------------------------------+
//! | CONN_ID  DATA_LEN  SCHED  FLAGS  <data>  |
//! +------------------------------------------+
//! ```
//!
//! CONN_ID (4 bytes) names the connection carrying the payload, DATA_LEN
//! (8 bytes) is the payload size, SCHED (4 bytes) is an ordering key (lower
//! values are delivered earlier; within one connection the schedule order is
//! the delivery order), and FLAGS (4 bytes) is a bitfield described in
//! [`flags`]. All integers are little-endian regardless of host byte order.
//!
//! Every operation comes in two variants: one over `std::io` readers and
//! writers, and one over plain byte slices. Decoding from a seekable source
//! records each chunk's file offset so a consumer can come back for the
//! payload later without holding it in memory.
//!
//! ```
//! use comux::{flags, Chunk, Manifest};
//!
//! let mut manifest = Manifest::new(1);
//! manifest.push_chunk(Chunk::with_data(0, 0, flags::AWAIT_RESPONSE, b"PING".to_vec()));
//! let bytes = manifest.to_bytes();
//! let (decoded, _) = Manifest::decode(&bytes).unwrap();
//! assert_eq!(decoded, manifest);
//! ```

mod chunk;
mod error;
mod header;
mod manifest;

pub use chunk::{flags, Chunk, CHUNK_DATA_MAXLEN, CHUNK_HEADER_LEN};
pub use error::{EncodeError, ParseError};
pub use header::{Header, HEADER_LEN, MAGIC, MAX_CONNS, MAX_CHUNKS};
pub use manifest::Manifest;

pub(crate) mod io_util {
    use std::io::{ErrorKind, Read};

    pub(crate) enum Fill {
        /// The whole buffer was filled.
        Full,
        /// Some bytes were read, fewer than requested.
        Short,
        /// Nothing could be read at all.
        Eof,
    }

    /// Reads until `buf` is full or the source runs dry. A hard I/O error is
    /// treated the same as the source running dry: the caller maps the
    /// shortfall to the parse error for the field being read.
    pub(crate) fn fill(r: &mut impl Read, buf: &mut [u8]) -> Fill {
        let mut total = 0;
        while total < buf.len() {
            match r.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        match total {
            0 => Fill::Eof,
            n if n < buf.len() => Fill::Short,
            _ => Fill::Full,
        }
    }
}
