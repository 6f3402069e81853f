use std::net::SocketAddr;

use tokio::task::JoinHandle;

/// A running accept loop.
#[derive(Debug)]
pub struct Listener {
    /// The address the listener is actually bound to.
    local_addr: SocketAddr,

    /// The task accepting connections.
    task: JoinHandle<()>,
}

impl Listener {
    pub(crate) fn new(local_addr: SocketAddr, task: JoinHandle<()>) -> Self {
        Self { local_addr, task }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections. Connections already accepted keep running
    /// until their peer hangs up.
    pub fn shutdown(self) {
        self.task.abort();
    }
}
