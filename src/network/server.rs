//! TCP Server
//!
//! Accepts tester connections and hands each one to a Connection Handler.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, SendTimeoutError, Sender};
use socket2::{Domain, Protocol, Socket, Type};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{EcuError, Result};

use super::Connection;

/// Pending connections the kernel may queue before accept
const LISTEN_BACKLOG: i32 = 128;

/// How long a blocked hand-over to the pool waits before re-checking shutdown
const HANDOFF_POLL: Duration = Duration::from_millis(50);

/// State shared between the listener, its handlers and any `ServerHandle`
#[derive(Default)]
struct Shared {
    shutdown: AtomicBool,
    active_connections: AtomicUsize,
}

/// TCP listener for the simulated ECU
pub struct Server {
    config: Config,
    listener: TcpListener,
    local_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    shared: Arc<Shared>,
}

impl Server {
    /// Bind the listen address with SO_REUSEADDR set
    ///
    /// A bind failure is fatal: nothing is served.
    pub fn bind(config: Config, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        config.validate()?;

        let addr = resolve(&config.listen_addr)?;
        let listener = create_listener(addr).map_err(|source| EcuError::Bind {
            addr: config.listen_addr.clone(),
            source,
        })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            config,
            listener,
            local_addr,
            dispatcher,
            shared: Arc::new(Shared::default()),
        })
    }

    /// The bound address (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// A handle for stopping the server and observing it from other threads
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shared: Arc::clone(&self.shared),
            local_addr: self.local_addr,
        }
    }

    /// Accept connections until shut down (blocking)
    pub fn run(self) -> Result<()> {
        let pool = if self.config.workers > 0 {
            tracing::info!(
                "Listening on {} ({} connection workers)",
                self.local_addr,
                self.config.workers
            );
            Some(WorkerPool::start(
                self.config.workers,
                &self.dispatcher,
                &self.shared,
                self.config.read_buffer_size,
            )?)
        } else {
            tracing::info!("Listening on {} (thread per connection)", self.local_addr);
            None
        };

        for stream in self.listener.incoming() {
            if self.shared.shutdown.load(Ordering::Acquire) {
                break;
            }

            match stream {
                Ok(stream) => match &pool {
                    Some(pool) => pool.submit(stream),
                    None => self.spawn_connection(stream),
                },
                Err(e) => tracing::warn!("Accept error: {}", e),
            }
        }

        tracing::info!("Listener on {} stopped", self.local_addr);
        Ok(())
    }

    /// Serve one connection on its own thread
    fn spawn_connection(&self, stream: TcpStream) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let shared = Arc::clone(&self.shared);
        let read_buffer_size = self.config.read_buffer_size;

        let spawned = thread::Builder::new()
            .name("ecu-connection".to_string())
            .spawn(move || serve(stream, dispatcher, &shared, read_buffer_size));

        if let Err(e) = spawned {
            tracing::warn!("Failed to spawn connection thread: {}", e);
        }
    }
}

/// Cloneable handle to a running server
#[derive(Clone)]
pub struct ServerHandle {
    shared: Arc<Shared>,
    local_addr: SocketAddr,
}

impl ServerHandle {
    /// Stop accepting connections
    ///
    /// Connections already being served run until their testers disconnect.
    pub fn shutdown(&self) {
        if self.shared.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        // Wake the blocking accept so the loop sees the flag
        let mut wake_addr = self.local_addr;
        if wake_addr.ip().is_unspecified() {
            wake_addr.set_ip(match wake_addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }
        if let Err(e) = TcpStream::connect_timeout(&wake_addr, Duration::from_secs(1)) {
            tracing::debug!("Shutdown wake-up connect to {} failed: {}", wake_addr, e);
        }
    }

    /// Whether `shutdown` has been requested
    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.load(Ordering::Acquire)
    }

    /// Connection handlers currently running
    pub fn active_connections(&self) -> usize {
        self.shared.active_connections.load(Ordering::Acquire)
    }

    /// The address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

// =============================================================================
// Worker Pool
// =============================================================================

/// Fixed set of threads serving connections handed over by the acceptor
struct WorkerPool {
    sender: Sender<TcpStream>,
    shared: Arc<Shared>,
}

impl WorkerPool {
    fn start(
        workers: usize,
        dispatcher: &Arc<Dispatcher>,
        shared: &Arc<Shared>,
        read_buffer_size: usize,
    ) -> Result<Self> {
        // Rendezvous channel: the acceptor blocks until a worker is free
        let (sender, receiver) = channel::bounded::<TcpStream>(0);

        for id in 0..workers {
            let receiver = receiver.clone();
            let dispatcher = Arc::clone(dispatcher);
            let shared = Arc::clone(shared);

            thread::Builder::new()
                .name(format!("ecu-worker-{}", id))
                .spawn(move || {
                    for stream in receiver.iter() {
                        serve(stream, Arc::clone(&dispatcher), &shared, read_buffer_size);
                    }
                })?;
        }

        Ok(Self {
            sender,
            shared: Arc::clone(shared),
        })
    }

    /// Hand a stream to the next free worker
    ///
    /// Blocks while every worker is busy, but gives up and drops the stream
    /// once shutdown is requested.
    fn submit(&self, mut stream: TcpStream) {
        loop {
            if self.shared.shutdown.load(Ordering::Acquire) {
                tracing::debug!("Shutdown requested, dropping queued connection");
                return;
            }

            match self.sender.send_timeout(stream, HANDOFF_POLL) {
                Ok(()) => return,
                Err(SendTimeoutError::Timeout(returned)) => stream = returned,
                Err(SendTimeoutError::Disconnected(_)) => {
                    tracing::warn!("No connection workers left, dropping connection");
                    return;
                }
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Run a Connection Handler to completion, tracking it as active
fn serve(stream: TcpStream, dispatcher: Arc<Dispatcher>, shared: &Shared, read_buffer_size: usize) {
    shared.active_connections.fetch_add(1, Ordering::AcqRel);

    match Connection::new(stream, dispatcher, read_buffer_size) {
        Ok(mut connection) => {
            if let Err(e) = connection.handle() {
                tracing::warn!("Connection {} closed with error: {}", connection.peer_addr(), e);
            }
        }
        Err(e) => tracing::warn!("Failed to set up connection: {}", e),
    }

    shared.active_connections.fetch_sub(1, Ordering::AcqRel);
}

fn resolve(listen_addr: &str) -> Result<SocketAddr> {
    let bind_error = |source| EcuError::Bind {
        addr: listen_addr.to_string(),
        source,
    };

    listen_addr
        .to_socket_addrs()
        .map_err(bind_error)?
        .next()
        .ok_or_else(|| {
            bind_error(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "address resolved to nothing",
            ))
        })
}

/// Blocking TCP listener with SO_REUSEADDR, so a restart can rebind at once
fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(socket.into())
}
