//! The per-chunk unit of work. Each worker owns exactly one chunk: it
//! obtains the connection's socket, loads the payload, writes it, optionally
//! half-closes, and optionally drains the server's response to stdout.

use std::fs::File;
use std::io::{self, ErrorKind, Write};
use std::os::fd::RawFd;
use std::os::unix::fs::FileExt;

use comux::{flags, Chunk, CHUNK_DATA_MAXLEN};
use gurthang_util::fatality;
use libc::c_void;

use crate::config::LibConfig;
use crate::ctable::{Acquired, ConnTable};

/// Where a worker finds its chunk's payload.
pub enum PayloadSource<'a> {
    /// Seek to the chunk's recorded offset in this file and read `data_len`
    /// bytes. Positioned reads keep concurrent workers off each other's file
    /// cursor.
    File(&'a File),
    /// The chunk already carries its payload in memory.
    Inline,
}

pub struct ChunkJob {
    pub chunk: Chunk,
    /// Index of this worker in dispatch order, for logging.
    pub worker_id: u32,
    /// Whether this chunk is the last one for its connection.
    pub is_final: bool,
}

/// Runs one chunk to completion. Peer closure is tolerated and recorded;
/// every other failure is fatal to the process.
pub fn run_chunk(table: &ConnTable, cfg: &LibConfig, mut job: ChunkJob, payload: PayloadSource<'_>) {
    let chunk = &mut job.chunk;
    tracing::debug!(
        "worker {} handling chunk: conn_id={}, data_len={}, sched={}, flags={:#x}",
        job.worker_id,
        chunk.conn_id,
        chunk.data_len,
        chunk.sched,
        chunk.flags
    );

    let fd = match table.acquire(chunk.conn_id) {
        Acquired::Closed => {
            tracing::debug!(
                "worker {}: connection {} was closed by the target server, skipping",
                job.worker_id,
                chunk.conn_id
            );
            return;
        }
        Acquired::Reused(fd) | Acquired::Fresh(fd) => fd,
    };

    if let PayloadSource::File(file) = payload {
        load_payload(file, chunk);
    }
    if chunk.data.is_empty() {
        fatality!("read zero bytes from a chunk data segment; check the input file");
    }

    if !send_payload(table, cfg, chunk, fd, job.is_final) {
        return;
    }

    if chunk.flags & flags::AWAIT_RESPONSE != 0 {
        recv_response(table, cfg, chunk, fd);
    }
}

/// Reads the chunk's payload from its recorded position in the input.
fn load_payload(file: &File, chunk: &mut Chunk) {
    let cap = chunk.data_len.min(CHUNK_DATA_MAXLEN) as usize;
    let mut data = vec![0u8; cap];
    let base = chunk.data_offset();
    let mut total = 0;
    while total < cap {
        match file.read_at(&mut data[total..], base + total as u64) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => fatality!("failed to read chunk data at offset {base}: {e}"),
        }
    }
    data.truncate(total);
    chunk.data = data;
    chunk.data_len = total as u64;
    tracing::debug!("read {total} bytes for the chunk data segment");
}

/// Writes the payload in pieces, suppressing SIGPIPE. Returns false when the
/// peer closed the connection, which ends this worker's job early.
fn send_payload(
    table: &ConnTable,
    cfg: &LibConfig,
    chunk: &Chunk,
    fd: RawFd,
    is_final: bool,
) -> bool {
    let data = &chunk.data;
    let mut sent = 0;
    while sent < data.len() {
        let piece = (data.len() - sent).min(cfg.send_buffsize);
        let n = unsafe {
            libc::send(
                fd,
                data[sent..].as_ptr() as *const c_void,
                piece,
                libc::MSG_NOSIGNAL,
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EINTR) => continue,
                Some(libc::EPIPE) | Some(libc::ECONNRESET) => {
                    tracing::debug!("target server closed the connection ({err})");
                    table.mark_closed(chunk.conn_id);
                    return false;
                }
                _ => fatality!("failed to send bytes to target server: {err}"),
            }
        }
        if n == 0 {
            break;
        }
        sent += n as usize;
    }
    tracing::debug!("sent {sent} bytes through connection {}", chunk.conn_id);

    if is_final && chunk.flags & flags::NO_SHUTDOWN == 0 {
        // signals end-of-request to servers that read until EOF
        if unsafe { libc::shutdown(fd, libc::SHUT_WR) } == -1 {
            fatality!(
                "failed to shutdown socket's write-end: {}",
                io::Error::last_os_error()
            );
        }
        tracing::debug!("closed write-end of connection {}", chunk.conn_id);
    }
    true
}

/// Drains the server's response to stdout until EOF or a tolerated error.
fn recv_response(table: &ConnTable, cfg: &LibConfig, chunk: &Chunk, fd: RawFd) {
    tracing::debug!("receiving bytes from connection {} (to stdout)", chunk.conn_id);
    let mut buf = vec![0u8; cfg.recv_buffsize];
    let mut total = 0usize;
    let mut reset = false;
    loop {
        let n = unsafe { libc::recv(fd, buf.as_mut_ptr() as *mut c_void, buf.len(), 0) };
        if n == 0 {
            break;
        }
        if n < 0 {
            let err = io::Error::last_os_error();
            match err.raw_os_error() {
                Some(libc::EINTR) => continue,
                Some(libc::ECONNRESET) => {
                    reset = true;
                    break;
                }
                _ => fatality!("failed to read bytes from target server: {err}"),
            }
        }
        total += n as usize;
        if let Err(err) = io::stdout().lock().write_all(&buf[..n as usize]) {
            fatality!("failed to write bytes to stdout: {err}");
        }
    }
    if total > 0 {
        if let Err(err) = io::stdout().lock().write_all(b"\n") {
            fatality!("failed to write bytes to stdout: {err}");
        }
    }

    // a reset, or a close before anything arrived, takes the connection out
    // of play for later workers
    if reset || total == 0 {
        tracing::debug!("target server closed connection {}", chunk.conn_id);
        table.mark_closed(chunk.conn_id);
    } else {
        tracing::debug!("received {total} bytes from connection {}", chunk.conn_id);
    }
}
