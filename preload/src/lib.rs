//! The LD_PRELOAD half of the gurthang harness.
//!
//! Loaded into an unmodified server process, this library substitutes the
//! connection-acceptance entry points (`listen`, `accept`, `accept4`, and the
//! epoll calls a server may use to watch its listener). The first time the
//! server is about to accept a connection, a controller thread is spawned
//! that reads a comux container from stdin and replays it: one short-lived
//! worker thread per chunk, each opening (or reusing) a real connection to
//! the server's own listening socket and writing that chunk's payload.
//!
//! Build as a cdylib and run the target under the host fuzzer with
//! `LD_PRELOAD=libgurthang_preload.so`.

pub mod config;
pub mod controller;
pub mod ctable;
pub mod worker;

#[cfg(not(test))]
mod interpose;
