use std::{io, net::SocketAddr};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Faults of the transport between client, registry and service.
///
/// A refused booking is not an error: the operations report it as `false`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("binding listener to {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("connecting to {addr}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("remote call failed")]
    Rpc(#[from] tarpc::client::RpcError),

    #[error("no service bound under name {0:?}")]
    NotBound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
