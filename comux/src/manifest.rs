use std::io::{self, Read, Write};

use crate::chunk::{Chunk, CHUNK_HEADER_LEN};
use crate::error::{EncodeError, ParseError};
use crate::header::{Header, HEADER_LEN};

/// The parsed, in-memory form of an entire comux container: the header plus
/// its chunks in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub header: Header,
    pub chunks: Vec<Chunk>,
}

impl Manifest {
    /// An empty manifest declaring `num_conns` connections.
    pub fn new(num_conns: u32) -> Self {
        Manifest {
            header: Header::new(num_conns),
            chunks: Vec::new(),
        }
    }

    /// Appends a chunk, incrementing the header's chunk count.
    pub fn push_chunk(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
        self.header.num_chunks += 1;
    }

    /// Removes the chunk at `idx`, decrementing the header's chunk count.
    /// Returns `None` when the index is out of bounds.
    pub fn remove_chunk(&mut self, idx: usize) -> Option<Chunk> {
        if idx >= self.chunks.len() {
            return None;
        }
        self.header.num_chunks -= 1;
        Some(self.chunks.remove(idx))
    }

    /// The exact number of bytes a full encode produces.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .chunks
                .iter()
                .map(|c| CHUNK_HEADER_LEN + c.data.len())
                .sum::<usize>()
    }

    /// Writes the whole container. Each chunk's stored offset is rewritten
    /// to the position it is emitted at, so offsets never go stale across a
    /// re-encode.
    pub fn write_to(&mut self, w: &mut impl Write) -> io::Result<usize> {
        let mut pos = self.header.write_to(w)?;
        for chunk in &mut self.chunks {
            debug_assert_eq!(chunk.data_len as usize, chunk.data.len());
            chunk.offset = pos as u64;
            pos += chunk.header_write_to(w)?;
            pos += chunk.data_write_to(w)?;
        }
        Ok(pos)
    }

    /// Slice-backed variant of [`Manifest::write_to`].
    pub fn encode_into(&mut self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(EncodeError::Insufficient { needed });
        }
        let mut pos = self.header.encode_into(buf)?;
        for chunk in &mut self.chunks {
            debug_assert_eq!(chunk.data_len as usize, chunk.data.len());
            chunk.offset = pos as u64;
            pos += chunk.header_encode_into(&mut buf[pos..])?;
            pos += chunk.data_encode_into(&mut buf[pos..])?;
        }
        Ok(pos)
    }

    /// Encodes into a fresh vector.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; self.encoded_len()];
        let written = self.encode_into(&mut out).expect("sized to fit");
        out.truncate(written);
        out
    }

    /// Reads a whole container, validating the header bounds, every chunk's
    /// connection id and flag bits, and that every declared payload byte is
    /// present. Chunk offsets are recorded as the stream is walked.
    pub fn read_from(r: &mut impl Read) -> Result<Manifest, ParseError> {
        let header = Header::read_from(r)?;
        header.validate()?;

        let mut chunks = Vec::with_capacity(header.num_chunks as usize);
        let mut pos = HEADER_LEN as u64;
        for _ in 0..header.num_chunks {
            let mut chunk = Chunk::header_read_from(r)?;
            chunk.offset = pos;
            pos += CHUNK_HEADER_LEN as u64;
            chunk.validate(header.num_conns)?;

            let expected = chunk.data_len;
            let read = chunk
                .data_read_from(r)
                .map_err(|_| ParseError::ConnLenMismatch)?;
            if read < expected {
                return Err(ParseError::ConnLenMismatch);
            }
            pos += read;
            chunks.push(chunk);
        }
        Ok(Manifest { header, chunks })
    }

    /// Slice-backed variant of [`Manifest::read_from`]. Returns the manifest
    /// and the number of bytes consumed; trailing bytes are ignored.
    pub fn decode(buf: &[u8]) -> Result<(Manifest, usize), ParseError> {
        let (header, mut pos) = Header::decode(buf)?;
        header.validate()?;

        let mut chunks = Vec::with_capacity(header.num_chunks as usize);
        for _ in 0..header.num_chunks {
            let (mut chunk, consumed) = Chunk::header_decode(&buf[pos..])?;
            chunk.offset = pos as u64;
            pos += consumed;
            chunk.validate(header.num_conns)?;

            let expected = chunk.data_len;
            let read = chunk.data_decode(&buf[pos..]);
            if (read as u64) < expected {
                return Err(ParseError::ConnLenMismatch);
            }
            pos += read;
            chunks.push(chunk);
        }
        Ok((Manifest { header, chunks }, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::flags;
    use std::io::Cursor;

    fn sample() -> Manifest {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 1, 0, b"GET / HTTP/1.1\r\n".to_vec()));
        m.push_chunk(Chunk::with_data(1, 0, flags::AWAIT_RESPONSE, b"PING".to_vec()));
        m.push_chunk(Chunk::with_data(0, 2, 0, b"Host: x\r\n\r\n".to_vec()));
        m
    }

    #[test]
    fn manifest_round_trip_slice() {
        let mut m = sample();
        let bytes = m.to_bytes();
        let (decoded, consumed) = Manifest::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, m);
    }

    #[test]
    fn manifest_round_trip_io() {
        let mut m = sample();
        let mut bytes = Vec::new();
        let written = m.write_to(&mut bytes).unwrap();
        assert_eq!(written, m.encoded_len());

        let decoded = Manifest::read_from(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(decoded, m);
    }

    #[test]
    fn decode_then_encode_is_bit_exact() {
        let bytes = sample().to_bytes();
        let (mut decoded, _) = Manifest::decode(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn encode_rewrites_chunk_offsets() {
        let mut m = sample();
        let bytes = m.to_bytes();
        assert_eq!(m.chunks[0].offset, HEADER_LEN as u64);
        let second = HEADER_LEN + CHUNK_HEADER_LEN + m.chunks[0].data.len();
        assert_eq!(m.chunks[1].offset, second as u64);

        // offsets recorded by the decoder agree with the encoder's
        let (decoded, _) = Manifest::decode(&bytes).unwrap();
        assert_eq!(decoded.chunks[0].offset, m.chunks[0].offset);
        assert_eq!(decoded.chunks[1].offset, m.chunks[1].offset);
        assert_eq!(decoded.chunks[2].offset, m.chunks[2].offset);
    }

    #[test]
    fn encode_into_reports_total_needed_space() {
        let mut m = sample();
        let needed = m.encoded_len();
        let mut small = vec![0u8; needed - 1];
        assert_eq!(
            m.encode_into(&mut small),
            Err(EncodeError::Insufficient { needed })
        );
    }

    #[test]
    fn push_and_remove_keep_chunk_count_in_sync() {
        let mut m = sample();
        assert_eq!(m.header.num_chunks, 3);
        let removed = m.remove_chunk(1).unwrap();
        assert_eq!(removed.data, b"PING");
        assert_eq!(m.header.num_chunks, 2);
        assert!(m.remove_chunk(5).is_none());
        assert_eq!(m.header.num_chunks, 2);
    }

    #[test]
    fn decode_rejects_out_of_bounds_conn_id() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"a".to_vec()));
        m.push_chunk(Chunk::with_data(5, 0, 0, b"b".to_vec()));
        let bytes = m.to_bytes();
        assert_eq!(Manifest::decode(&bytes), Err(ParseError::BadConnId));
    }

    #[test]
    fn decode_rejects_unknown_flag_bits() {
        let mut m = Manifest::new(1);
        let mut chunk = Chunk::with_data(0, 0, 0, b"a".to_vec());
        chunk.flags = 0x10;
        m.push_chunk(chunk);
        let bytes = m.to_bytes();
        assert_eq!(Manifest::decode(&bytes), Err(ParseError::BadFlags));
    }

    #[test]
    fn decode_rejects_nonzero_version() {
        let mut m = sample();
        let mut bytes = m.to_bytes();
        bytes[8] = 1;
        assert_eq!(Manifest::decode(&bytes), Err(ParseError::BadVersion));
    }

    #[test]
    fn decode_rejects_short_payload() {
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"abcdef".to_vec()));
        let bytes = m.to_bytes();
        assert_eq!(
            Manifest::decode(&bytes[..bytes.len() - 2]),
            Err(ParseError::ConnLenMismatch)
        );
    }

    #[test]
    fn decode_rejects_zero_counts() {
        let mut bytes = sample().to_bytes();
        bytes[12..16].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(Manifest::decode(&bytes), Err(ParseError::BadNumConns));

        let mut bytes = sample().to_bytes();
        bytes[16..20].copy_from_slice(&0u32.to_le_bytes());
        assert_eq!(Manifest::decode(&bytes), Err(ParseError::BadNumChunks));
    }
}
