//! The controller: the single thread that drives one comux input to
//! completion. It parses the container from the input descriptor, validates
//! it, then dispatches one chunk worker per chunk in schedule order.

use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::mem::ManuallyDrop;
use std::os::fd::FromRawFd;
use std::thread;

use comux::{Chunk, Header, ParseError, CHUNK_HEADER_LEN, HEADER_LEN};
use gurthang_util::fatality;
use thiserror::Error;

use crate::config::{Dispatch, LibConfig};
use crate::ctable::ConnTable;
use crate::worker::{self, ChunkJob, PayloadSource};

/// Validation failures the controller treats as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("failed to parse comux header: {0}")]
    Header(ParseError),
    #[error("failed to parse comux chunk {index}: {err}")]
    Chunk { index: u32, err: ParseError },
    #[error("chunk {index} has a connection ID ({conn_id}) outside the range [0, {num_conns})")]
    ConnIdOutOfRange {
        index: u32,
        conn_id: u32,
        num_conns: u32,
    },
    #[error("connection ID {conn_id} is assigned zero chunks in this file")]
    EmptyConnection { conn_id: u32 },
    #[error("failed to seek past chunk {index}'s data segment")]
    Seek { index: u32 },
}

/// Everything the dispatch loop needs: the chunk headers (payloads stay in
/// the file until each worker loads its own) and the per-connection chunk
/// counts used to tag a connection's final chunk.
#[derive(Debug, PartialEq)]
pub struct Plan {
    pub header: Header,
    pub chunks: Vec<Chunk>,
    pub conn_counts: Vec<u32>,
}

/// Streams the container's header and chunk headers out of `file`, recording
/// each chunk's offset and seeking past its payload.
pub fn load_plan(file: &File) -> Result<Plan, PlanError> {
    let mut src = file;
    let header = Header::read_from(&mut src).map_err(PlanError::Header)?;
    header.validate().map_err(PlanError::Header)?;
    tracing::info!(
        "found comux formatting with {} connection(s) and {} chunk(s)",
        header.num_conns,
        header.num_chunks
    );

    let mut conn_counts = vec![0u32; header.num_conns as usize];
    let mut chunks = Vec::with_capacity(header.num_chunks as usize);
    let mut pos = HEADER_LEN as u64;
    for index in 0..header.num_chunks {
        let mut chunk =
            Chunk::header_read_from(&mut src).map_err(|err| PlanError::Chunk { index, err })?;
        chunk.offset = pos;
        pos += CHUNK_HEADER_LEN as u64;
        tracing::info!(
            "found chunk {index} with fields: conn_id={}, data_len={}, sched={}, flags={:#x}",
            chunk.conn_id,
            chunk.data_len,
            chunk.sched,
            chunk.flags
        );

        if chunk.conn_id >= header.num_conns {
            return Err(PlanError::ConnIdOutOfRange {
                index,
                conn_id: chunk.conn_id,
                num_conns: header.num_conns,
            });
        }
        conn_counts[chunk.conn_id as usize] += 1;

        let skip = i64::try_from(chunk.data_len).map_err(|_| PlanError::Seek { index })?;
        pos = src
            .seek(SeekFrom::Current(skip))
            .map_err(|_| PlanError::Seek { index })?;
        chunks.push(chunk);
    }

    for (conn_id, count) in conn_counts.iter().enumerate() {
        if *count == 0 {
            return Err(PlanError::EmptyConnection {
                conn_id: conn_id as u32,
            });
        }
    }

    Ok(Plan {
        header,
        chunks,
        conn_counts,
    })
}

/// The order chunks are dispatched in: ascending schedule value, ties broken
/// by position in the file. Returns indices into the chunk list.
pub fn dispatch_order(chunks: &[Chunk]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..chunks.len()).collect();
    // a stable sort keeps equal schedule values in file order
    order.sort_by_key(|&i| chunks[i].sched);
    order
}

/// Parses the input and drives every chunk worker to completion.
pub fn execute(file: &File, table: &ConnTable, cfg: &LibConfig) -> Result<(), PlanError> {
    let plan = load_plan(file)?;
    dispatch(file, table, cfg, plan);
    Ok(())
}

fn dispatch(file: &File, table: &ConnTable, cfg: &LibConfig, plan: Plan) {
    let Plan {
        chunks,
        mut conn_counts,
        ..
    } = plan;
    let order = dispatch_order(&chunks);
    let mut slots: Vec<Option<Chunk>> = chunks.into_iter().map(Some).collect();

    thread::scope(|s| {
        let mut pending = Vec::new();
        for (worker_id, &idx) in order.iter().enumerate() {
            let chunk = slots[idx].take().expect("each chunk dispatched once");
            let cid = chunk.conn_id as usize;
            conn_counts[cid] -= 1;
            let job = ChunkJob {
                chunk,
                worker_id: worker_id as u32,
                is_final: conn_counts[cid] == 0,
            };

            tracing::info!("spawning chunk worker {worker_id}");
            let handle = s.spawn(move || worker::run_chunk(table, cfg, job, PayloadSource::File(file)));
            match cfg.dispatch {
                Dispatch::Serial => {
                    if handle.join().is_err() {
                        fatality!("chunk worker {worker_id} panicked");
                    }
                    tracing::info!("joined chunk worker {worker_id}");
                }
                Dispatch::Parallel => pending.push((worker_id, handle)),
            }
        }
        for (worker_id, handle) in pending {
            if handle.join().is_err() {
                fatality!("chunk worker {worker_id} panicked");
            }
            tracing::info!("joined chunk worker {worker_id}");
        }
    });
}

/// Entry point for the controller thread spawned by the interposer: replays
/// the container arriving on the process's standard input, then terminates
/// the process.
pub fn run(table: &'static ConnTable, cfg: &'static LibConfig) -> ! {
    tracing::info!("controller thread spawned, reading from stdin");
    let file = ManuallyDrop::new(unsafe { File::from_raw_fd(libc::STDIN_FILENO) });
    match execute(&file, table, cfg) {
        Ok(()) => {
            tracing::info!("controller exiting");
            gurthang_util::fatal::exit_process(0)
        }
        Err(err) => fatality!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comux::{flags, Manifest};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::os::fd::AsRawFd;

    fn to_file(manifest: &mut Manifest) -> File {
        let mut tmp = tempfile::tempfile().unwrap();
        let bytes = manifest.to_bytes();
        tmp.write_all(&bytes).unwrap();
        tmp.rewind().unwrap();
        tmp
    }

    #[test]
    fn dispatch_order_is_stable_by_schedule_then_file_position() {
        let chunks = vec![
            Chunk::with_data(0, 1, 0, b"a".to_vec()),
            Chunk::with_data(1, 0, 0, b"b".to_vec()),
            Chunk::with_data(0, 2, 0, b"c".to_vec()),
            Chunk::with_data(1, 1, 0, b"d".to_vec()),
        ];
        assert_eq!(dispatch_order(&chunks), vec![1, 0, 3, 2]);
    }

    #[test]
    fn equal_schedules_keep_file_order() {
        let chunks = vec![
            Chunk::with_data(0, 5, 0, b"a".to_vec()),
            Chunk::with_data(1, 5, 0, b"b".to_vec()),
            Chunk::with_data(0, 5, 0, b"c".to_vec()),
        ];
        assert_eq!(dispatch_order(&chunks), vec![0, 1, 2]);
    }

    #[test]
    fn load_plan_records_offsets_and_counts() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 1, 0, b"abc".to_vec()));
        m.push_chunk(Chunk::with_data(1, 0, 0, b"defgh".to_vec()));
        let file = to_file(&mut m);

        let plan = load_plan(&file).unwrap();
        assert_eq!(plan.header.num_conns, 2);
        assert_eq!(plan.conn_counts, vec![1, 1]);
        assert_eq!(plan.chunks[0].offset, HEADER_LEN as u64);
        assert_eq!(
            plan.chunks[1].offset,
            (HEADER_LEN + CHUNK_HEADER_LEN + 3) as u64
        );
        // payloads are not loaded at plan time
        assert!(plan.chunks.iter().all(|c| c.data.is_empty()));
    }

    #[test]
    fn load_plan_rejects_chunkless_connection() {
        // three connections declared, chunks only name ids 0 and 2
        let mut m = Manifest::new(3);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"a".to_vec()));
        m.push_chunk(Chunk::with_data(2, 1, 0, b"b".to_vec()));
        let file = to_file(&mut m);
        assert_eq!(
            load_plan(&file),
            Err(PlanError::EmptyConnection { conn_id: 1 })
        );
    }

    #[test]
    fn load_plan_rejects_out_of_bounds_conn_id() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"a".to_vec()));
        m.push_chunk(Chunk::with_data(5, 1, 0, b"b".to_vec()));
        let file = to_file(&mut m);
        assert_eq!(
            load_plan(&file),
            Err(PlanError::ConnIdOutOfRange {
                index: 1,
                conn_id: 5,
                num_conns: 2
            })
        );
    }

    #[test]
    fn serial_execute_delivers_chunks_in_schedule_order() {
        // chunks (conn, sched): (0,1) "B", (1,0) "A", (0,2) "C" — connection 1
        // goes first, then connection 0's two chunks in order
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 1, 0, b"B".to_vec()));
        m.push_chunk(Chunk::with_data(1, 0, 0, b"A".to_vec()));
        m.push_chunk(Chunk::with_data(0, 2, 0, b"C".to_vec()));
        let file = to_file(&mut m);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());
        let cfg = LibConfig::default();

        let server = std::thread::spawn(move || {
            // accept order equals connect order under serial dispatch
            let mut received = Vec::new();
            for _ in 0..2 {
                let (mut sock, _) = listener.accept().unwrap();
                let mut got = Vec::new();
                sock.read_to_end(&mut got).unwrap();
                received.push(got);
            }
            received
        });

        execute(&file, &table, &cfg).unwrap();
        let received = server.join().unwrap();
        assert_eq!(received[0], b"A");
        assert_eq!(received[1], b"BC");
    }

    #[test]
    fn parallel_execute_delivers_every_payload() {
        let mut m = Manifest::new(2);
        m.push_chunk(Chunk::with_data(0, 0, 0, b"alpha".to_vec()));
        m.push_chunk(Chunk::with_data(1, 1, 0, b"beta".to_vec()));
        let file = to_file(&mut m);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());
        let cfg = LibConfig {
            dispatch: crate::config::Dispatch::Parallel,
            ..LibConfig::default()
        };

        let server = std::thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..2 {
                let (mut sock, _) = listener.accept().unwrap();
                let mut got = Vec::new();
                sock.read_to_end(&mut got).unwrap();
                received.push(got);
            }
            received
        });

        execute(&file, &table, &cfg).unwrap();
        let mut received = server.join().unwrap();
        // parallel dispatch guarantees delivery, not ordering
        received.sort();
        assert_eq!(received, vec![b"alpha".to_vec(), b"beta".to_vec()]);
    }

    #[test]
    fn await_response_chunk_runs_to_completion() {
        let mut m = Manifest::new(1);
        m.push_chunk(Chunk::with_data(0, 0, flags::AWAIT_RESPONSE, b"PING".to_vec()));
        let file = to_file(&mut m);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());
        let cfg = LibConfig::default();

        let server = std::thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut got = Vec::new();
            sock.read_to_end(&mut got).unwrap();
            sock.write_all(b"PONG").unwrap();
            got
        });

        execute(&file, &table, &cfg).unwrap();
        assert_eq!(server.join().unwrap(), b"PING");
    }
}
