//! The connection table: a process-wide mapping from a chunk's connection id
//! to the live socket carrying that conversation.
//!
//! Entries move Dead → Alive on first use and Alive → ClosedByPeer when a
//! worker observes the server dropping the connection; an entry is never
//! revived within a run. One mutex serializes the table, held only across
//! table mutations, never across `connect` or `send`.

use std::mem;
use std::os::fd::RawFd;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use gurthang_util::fatality;
use libc::c_int;

/// Maximum number of logical connections a single input may open.
pub const CTABLE_MAXLEN: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnStatus {
    /// No connection exists yet.
    Dead,
    /// A connection is active.
    Alive,
    /// The target server closed the connection.
    ClosedByPeer,
}

/// What [`ConnTable::acquire`] hands back to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// An existing socket for this connection id.
    Reused(RawFd),
    /// A socket freshly connected to the target's listener.
    Fresh(RawFd),
    /// The server already closed this connection; the caller exits without
    /// doing any work.
    Closed,
}

#[derive(Clone, Copy)]
struct Entry {
    status: ConnStatus,
    fd: RawFd,
}

pub struct ConnTable {
    listener: AtomicI32,
    entries: Mutex<Vec<Entry>>,
}

impl Default for ConnTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnTable {
    pub fn new() -> Self {
        ConnTable {
            listener: AtomicI32::new(-1),
            entries: Mutex::new(vec![
                Entry {
                    status: ConnStatus::Dead,
                    fd: -1,
                };
                CTABLE_MAXLEN
            ]),
        }
    }

    /// The single table shared by the interposer, controller, and workers.
    pub fn global() -> &'static ConnTable {
        static TABLE: OnceLock<ConnTable> = OnceLock::new();
        TABLE.get_or_init(ConnTable::new)
    }

    /// Records the server's listening socket, captured by the interposed
    /// `listen` call. Written once, before any worker runs.
    pub fn set_listener(&self, fd: RawFd) {
        self.listener.store(fd, Ordering::SeqCst);
    }

    pub fn listener(&self) -> RawFd {
        self.listener.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Fast-exit probe for workers.
    pub fn status(&self, conn_id: u32) -> ConnStatus {
        self.lock()[conn_id as usize].status
    }

    /// Returns the socket for `conn_id`, connecting to the target's listener
    /// if this connection has not been opened yet.
    pub fn acquire(&self, conn_id: u32) -> Acquired {
        let cid = conn_id as usize;
        if cid >= CTABLE_MAXLEN {
            fatality!("connection id {conn_id} exceeds the connection table");
        }

        {
            let entries = self.lock();
            match entries[cid].status {
                ConnStatus::Alive => {
                    tracing::debug!("found existing socket for connection {conn_id}: {}", entries[cid].fd);
                    return Acquired::Reused(entries[cid].fd);
                }
                ConnStatus::ClosedByPeer => return Acquired::Closed,
                ConnStatus::Dead => {}
            }
        }

        // connect without holding the table lock
        let fd = connect_to_listener(self.listener());

        let mut entries = self.lock();
        match entries[cid].status {
            ConnStatus::Dead => {
                entries[cid] = Entry {
                    status: ConnStatus::Alive,
                    fd,
                };
                tracing::debug!("created new socket for connection {conn_id}: {fd}");
                Acquired::Fresh(fd)
            }
            // another worker won the race while we were connecting
            ConnStatus::Alive => {
                unsafe { libc::close(fd) };
                Acquired::Reused(entries[cid].fd)
            }
            ConnStatus::ClosedByPeer => {
                unsafe { libc::close(fd) };
                Acquired::Closed
            }
        }
    }

    /// Records that the server closed this connection and closes the socket.
    pub fn mark_closed(&self, conn_id: u32) {
        let cid = conn_id as usize;
        let fd = {
            let mut entries = self.lock();
            let entry = &mut entries[cid];
            let fd = (entry.status == ConnStatus::Alive).then_some(entry.fd);
            entry.status = ConnStatus::ClosedByPeer;
            fd
        };
        if let Some(fd) = fd {
            unsafe { libc::close(fd) };
        }
    }
}

/// Opens a stream socket of the listener's address family and connects it to
/// the address the listener is bound to. Any failure here is fatal: without a
/// connection the input cannot be replayed.
fn connect_to_listener(listener: RawFd) -> RawFd {
    let mut addr: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut addr_len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    if unsafe {
        libc::getsockname(
            listener,
            &mut addr as *mut _ as *mut libc::sockaddr,
            &mut addr_len,
        )
    } == -1
    {
        fatality!(
            "failed to query the listener address: {}",
            std::io::Error::last_os_error()
        );
    }

    let fd = unsafe { libc::socket(addr.ss_family as c_int, libc::SOCK_STREAM, 0) };
    if fd == -1 {
        fatality!("failed to create a socket: {}", std::io::Error::last_os_error());
    }

    if unsafe {
        libc::connect(fd, &addr as *const _ as *const libc::sockaddr, addr_len)
    } == -1
    {
        fatality!(
            "failed to connect to target server: {}",
            std::io::Error::last_os_error()
        );
    }
    fd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::os::fd::AsRawFd;

    #[test]
    fn acquire_connects_then_reuses() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());

        let first = table.acquire(0);
        let Acquired::Fresh(fd) = first else {
            panic!("expected a fresh connection, got {first:?}");
        };
        // the server side sees the connection
        let (_server_sock, _) = listener.accept().unwrap();

        assert_eq!(table.status(0), ConnStatus::Alive);
        assert_eq!(table.acquire(0), Acquired::Reused(fd));
    }

    #[test]
    fn mark_closed_is_terminal() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());

        let Acquired::Fresh(_) = table.acquire(3) else {
            panic!("expected a fresh connection");
        };
        let (mut server_sock, _) = listener.accept().unwrap();

        table.mark_closed(3);
        assert_eq!(table.status(3), ConnStatus::ClosedByPeer);
        assert_eq!(table.acquire(3), Acquired::Closed);

        // the client fd was really closed: the server sees EOF
        let mut buf = [0u8; 8];
        assert_eq!(server_sock.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn distinct_connection_ids_get_distinct_sockets() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let table = ConnTable::new();
        table.set_listener(listener.as_raw_fd());

        let Acquired::Fresh(a) = table.acquire(0) else {
            panic!()
        };
        let _conn_a = listener.accept().unwrap();
        let Acquired::Fresh(b) = table.acquire(1) else {
            panic!()
        };
        let _conn_b = listener.accept().unwrap();
        assert_ne!(a, b);
    }
}
