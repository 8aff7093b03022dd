//! Symbol interposition. These definitions shadow the C library's
//! connection-acceptance entry points when the shim is loaded via
//! LD_PRELOAD; each forwards to the real implementation, resolved once
//! through `dlsym(RTLD_NEXT, ..)`, after running its bit of harness logic.
//!
//! `listen` captures the server's listening socket and performs one-time
//! init. The first `accept`/`accept4` spawns the controller. Servers that
//! park a thread in `epoll_wait` on a set containing the listener would
//! otherwise never reach `accept` while we hold their connection, so
//! `epoll_ctl` remembers that set's descriptor and `epoll_wait` on it also
//! spawns the controller. The shim never blocks the server's thread.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, Once, OnceLock};

use gurthang_util::fatality;
use libc::{c_char, c_int, epoll_event, sockaddr, socklen_t};

use crate::config::{self, LibConfig};
use crate::controller;
use crate::ctable::ConnTable;

static INIT: Once = Once::new();
static CONTROLLER_SPAWNED: Mutex<bool> = Mutex::new(false);
static EPOLL_FD: AtomicI32 = AtomicI32::new(-1);

fn lib_config() -> &'static LibConfig {
    static CONFIG: OnceLock<LibConfig> = OnceLock::new();
    CONFIG.get_or_init(LibConfig::from_env)
}

/// One-time harness init, run from the interposed `listen`.
fn harness_init(listener_fd: c_int) {
    INIT.call_once(|| {
        gurthang_util::log::init_from_env(config::ENV_LOG, false);
        let cfg = lib_config();
        gurthang_util::fatal::set_exit_immediate(cfg.exit_immediate);
        ConnTable::global().set_listener(listener_fd);
        tracing::info!("captured listener socket: {listener_fd}");
    });
}

/// Spawns the controller thread the first time a server thread is about to
/// wait for connections. The flag lives under a mutex held just long enough
/// to spawn; the thread is detached, nobody joins it.
fn spawn_controller_once(origin: &str) {
    let mut spawned = CONTROLLER_SPAWNED
        .lock()
        .unwrap_or_else(|p| p.into_inner());
    if *spawned {
        return;
    }
    *spawned = true;
    tracing::info!("spawning controller thread (via {origin})");
    let table = ConnTable::global();
    let cfg = lib_config();
    std::thread::spawn(move || controller::run(table, cfg));
}

macro_rules! real_fn {
    ($fname:ident, $cname:literal, $sig:ty) => {
        fn $fname() -> $sig {
            static SLOT: OnceLock<usize> = OnceLock::new();
            let addr = *SLOT.get_or_init(|| unsafe {
                libc::dlsym(
                    libc::RTLD_NEXT,
                    concat!($cname, "\0").as_ptr() as *const c_char,
                ) as usize
            });
            if addr == 0 {
                fatality!("failed to look up '{}' entry point", $cname);
            }
            unsafe { std::mem::transmute::<usize, $sig>(addr) }
        }
    };
}

real_fn!(real_listen, "listen", unsafe extern "C" fn(c_int, c_int) -> c_int);
real_fn!(
    real_accept,
    "accept",
    unsafe extern "C" fn(c_int, *mut sockaddr, *mut socklen_t) -> c_int
);
real_fn!(
    real_accept4,
    "accept4",
    unsafe extern "C" fn(c_int, *mut sockaddr, *mut socklen_t, c_int) -> c_int
);
real_fn!(
    real_epoll_ctl,
    "epoll_ctl",
    unsafe extern "C" fn(c_int, c_int, c_int, *mut epoll_event) -> c_int
);
real_fn!(
    real_epoll_wait,
    "epoll_wait",
    unsafe extern "C" fn(c_int, *mut epoll_event, c_int, c_int) -> c_int
);

/// Captures the listening socket and initializes the harness, then defers to
/// the real `listen`.
#[no_mangle]
pub extern "C" fn listen(sockfd: c_int, backlog: c_int) -> c_int {
    harness_init(sockfd);
    unsafe { real_listen()(sockfd, backlog) }
}

/// Spawns the controller on the first call, then defers to the real
/// `accept`.
#[no_mangle]
pub unsafe extern "C" fn accept(
    sockfd: c_int,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
) -> c_int {
    spawn_controller_once("accept");
    real_accept()(sockfd, addr, addrlen)
}

/// Same as the interposed `accept`, for the four-argument variant.
#[no_mangle]
pub unsafe extern "C" fn accept4(
    sockfd: c_int,
    addr: *mut sockaddr,
    addrlen: *mut socklen_t,
    flags: c_int,
) -> c_int {
    spawn_controller_once("accept4");
    real_accept4()(sockfd, addr, addrlen, flags)
}

/// Watches for the listener being added to an epoll set and remembers that
/// set's descriptor.
#[no_mangle]
pub unsafe extern "C" fn epoll_ctl(
    epfd: c_int,
    op: c_int,
    fd: c_int,
    event: *mut epoll_event,
) -> c_int {
    if EPOLL_FD.load(Ordering::SeqCst) == -1 {
        let listener = ConnTable::global().listener();
        if listener == -1 {
            tracing::debug!("epoll_ctl() invoked before the listener socket was discovered");
        } else if op == libc::EPOLL_CTL_ADD && fd == listener {
            EPOLL_FD.store(epfd, Ordering::SeqCst);
            tracing::info!("found listener socket epoll fd: {epfd}");
        }
    }
    real_epoll_ctl()(epfd, op, fd, event)
}

/// A server thread waiting on the listener's epoll set counts as being ready
/// to accept: spawn the controller from here too.
#[no_mangle]
pub unsafe extern "C" fn epoll_wait(
    epfd: c_int,
    events: *mut epoll_event,
    maxevents: c_int,
    timeout: c_int,
) -> c_int {
    let watched = EPOLL_FD.load(Ordering::SeqCst);
    if watched != -1 && watched == epfd {
        spawn_controller_once("epoll_wait");
    }
    real_epoll_wait()(epfd, events, maxevents, timeout)
}
