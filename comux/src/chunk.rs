use std::io::{self, ErrorKind, Read, Write};

use crate::error::{EncodeError, ParseError};
use crate::header::{decode_u32, decode_u64, read_u32, read_u64};

/// Encoded size of a chunk header.
pub const CHUNK_HEADER_LEN: usize = 20;

/// Cap on a single chunk's payload; larger declared lengths are capped when
/// the payload is read.
pub const CHUNK_DATA_MAXLEN: u64 = 524288;

/// Bits recognized in a chunk header's flag field. All other bits are
/// reserved and must be zero.
pub mod flags {
    /// After sending, drain the server's response to stdout until the peer
    /// closes or a read error occurs.
    pub const AWAIT_RESPONSE: u32 = 0x1;
    /// Suppress the half-close that normally follows a connection's final
    /// chunk.
    pub const NO_SHUTDOWN: u32 = 0x2;
    /// Every currently-defined bit.
    pub const ALL: u32 = 0x3;
}

/// One chunk: a payload plus the metadata saying which connection carries it
/// and when, relative to the other chunks, it is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Which logical connection the payload goes to. Must be below the
    /// header's declared connection count.
    pub conn_id: u32,
    /// Declared payload length.
    pub data_len: u64,
    /// Ordering key; lower values are delivered earlier.
    pub sched: u32,
    /// Flag bitfield, see [`flags`].
    pub flags: u32,
    /// The payload itself, when held in memory.
    pub data: Vec<u8>,
    /// Position of this chunk's header in the source it was decoded from.
    /// Rewritten on every re-encode.
    pub offset: u64,
}

impl Chunk {
    pub fn new(conn_id: u32, sched: u32) -> Self {
        Chunk {
            conn_id,
            sched,
            ..Chunk::default()
        }
    }

    /// A chunk carrying the given payload, with the length field in sync.
    pub fn with_data(conn_id: u32, sched: u32, flag_bits: u32, data: Vec<u8>) -> Self {
        Chunk {
            conn_id,
            data_len: data.len() as u64,
            sched,
            flags: flag_bits,
            data,
            offset: 0,
        }
    }

    /// Appends bytes to the payload, keeping `data_len` in step.
    pub fn append_data(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.data_len += bytes.len() as u64;
    }

    /// Where this chunk's payload begins in the source it was decoded from.
    pub fn data_offset(&self) -> u64 {
        self.offset + CHUNK_HEADER_LEN as u64
    }

    /// Checks the chunk header against the container header's declared
    /// connection count and the defined flag bits.
    pub fn validate(&self, num_conns: u32) -> Result<(), ParseError> {
        if self.conn_id >= num_conns {
            return Err(ParseError::BadConnId);
        }
        if self.flags & !flags::ALL != 0 {
            return Err(ParseError::BadFlags);
        }
        Ok(())
    }

    /// Writes the 20-byte chunk header, returning the byte count.
    pub fn header_write_to(&self, w: &mut impl Write) -> io::Result<usize> {
        let mut buf = [0u8; CHUNK_HEADER_LEN];
        self.header_encode_into(&mut buf).expect("fixed-size buffer");
        w.write_all(&buf)?;
        Ok(CHUNK_HEADER_LEN)
    }

    /// Encodes the chunk header into `buf`.
    pub fn header_encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        if buf.len() < CHUNK_HEADER_LEN {
            return Err(EncodeError::Insufficient {
                needed: CHUNK_HEADER_LEN,
            });
        }
        buf[0..4].copy_from_slice(&self.conn_id.to_le_bytes());
        buf[4..12].copy_from_slice(&self.data_len.to_le_bytes());
        buf[12..16].copy_from_slice(&self.sched.to_le_bytes());
        buf[16..20].copy_from_slice(&self.flags.to_le_bytes());
        Ok(CHUNK_HEADER_LEN)
    }

    /// Reads a chunk header from the source. The payload is not read; the
    /// offset field is left for the caller to fill in.
    pub fn header_read_from(r: &mut impl Read) -> Result<Chunk, ParseError> {
        let conn_id = read_u32(r, ParseError::BadConnId)?;
        let data_len = read_u64(r, ParseError::BadConnLen)?;
        let sched = read_u32(r, ParseError::BadSched)?;
        let flag_bits = read_u32(r, ParseError::BadFlags)?;
        Ok(Chunk {
            conn_id,
            data_len,
            sched,
            flags: flag_bits,
            data: Vec::new(),
            offset: 0,
        })
    }

    /// Slice-backed variant of [`Chunk::header_read_from`]. Returns the
    /// chunk and the number of bytes consumed.
    pub fn header_decode(buf: &[u8]) -> Result<(Chunk, usize), ParseError> {
        let conn_id = decode_u32(buf, 0, ParseError::BadConnId)?;
        let data_len = decode_u64(buf, 4, ParseError::BadConnLen)?;
        let sched = decode_u32(buf, 12, ParseError::BadSched)?;
        let flag_bits = decode_u32(buf, 16, ParseError::BadFlags)?;
        Ok((
            Chunk {
                conn_id,
                data_len,
                sched,
                flags: flag_bits,
                data: Vec::new(),
                offset: 0,
            },
            CHUNK_HEADER_LEN,
        ))
    }

    /// Writes the payload, returning the byte count.
    pub fn data_write_to(&self, w: &mut impl Write) -> io::Result<usize> {
        w.write_all(&self.data)?;
        Ok(self.data.len())
    }

    /// Copies the payload into `buf`.
    pub fn data_encode_into(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        if buf.len() < self.data.len() {
            return Err(EncodeError::Insufficient {
                needed: self.data.len(),
            });
        }
        buf[..self.data.len()].copy_from_slice(&self.data);
        Ok(self.data.len())
    }

    /// Reads the payload declared by `data_len` from the source, capped at
    /// [`CHUNK_DATA_MAXLEN`]. The payload and `data_len` are set to what was
    /// actually obtained; a shortfall is the caller's to interpret.
    pub fn data_read_from(&mut self, r: &mut impl Read) -> io::Result<u64> {
        let cap = self.data_len.min(CHUNK_DATA_MAXLEN) as usize;
        self.data = vec![0u8; cap];
        let mut total = 0;
        while total < cap {
            match r.read(&mut self.data[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.data.truncate(total);
        self.data_len = total as u64;
        Ok(total as u64)
    }

    /// Slice-backed variant of [`Chunk::data_read_from`]: takes
    /// `min(data_len, CHUNK_DATA_MAXLEN, buf.len())` bytes from `buf`.
    pub fn data_decode(&mut self, buf: &[u8]) -> usize {
        let cap = self
            .data_len
            .min(CHUNK_DATA_MAXLEN)
            .min(buf.len() as u64) as usize;
        self.data = buf[..cap].to_vec();
        self.data_len = cap as u64;
        cap
    }
}
