use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use futures::{future, prelude::*};
use tarpc::{
    client, context,
    server::{self, Channel},
    tokio_serde::formats::Json,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    listener::Listener,
};

/// Well known address of the registry.
pub const DEFAULT_REGISTRY_ADDR: &str = "127.0.0.1:1099";

/// Name the hotel service is bound under.
pub const DEFAULT_SERVICE_NAME: &str = "HotelService";

/// Name service resolving service names to addresses.
#[tarpc::service]
pub trait Registry {
    /// Binds `name` to `addr`, replacing any previous binding.
    async fn bind(name: String, addr: SocketAddr);
    /// Removes the binding of `name`. False if there was none.
    async fn unbind(name: String) -> bool;
    async fn lookup(name: String) -> Option<SocketAddr>;
    /// Bound names in ascending order.
    async fn list() -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct RegistryServer {
    bindings: Arc<Mutex<HashMap<String, SocketAddr>>>,
}

#[tarpc::server]
impl Registry for RegistryServer {
    async fn bind(self, _: context::Context, name: String, addr: SocketAddr) {
        info!(%name, %addr, "binding service");
        self.bindings.lock().await.insert(name, addr);
    }

    async fn unbind(self, _: context::Context, name: String) -> bool {
        let removed = self.bindings.lock().await.remove(&name).is_some();
        if removed {
            info!(%name, "unbound service");
        }
        removed
    }

    async fn lookup(self, _: context::Context, name: String) -> Option<SocketAddr> {
        self.bindings.lock().await.get(&name).copied()
    }

    async fn list(self, _: context::Context) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.lock().await.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Starts a registry on `addr`.
pub async fn serve(addr: SocketAddr) -> Result<Listener> {
    let mut incoming = tarpc::serde_transport::tcp::listen(addr, Json::default)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    incoming.config_mut().max_frame_length(usize::MAX);

    let local_addr = incoming.local_addr();
    info!(%local_addr, "registry listening");

    let server = RegistryServer::default();
    let task = tokio::spawn(async move {
        incoming
            .filter_map(|transport| {
                future::ready(match transport {
                    Err(err) => {
                        warn!("accepting registry connection: {err:?}");
                        None
                    }
                    Ok(v) => Some(v),
                })
            })
            .for_each(|transport| {
                let channel = server::BaseChannel::with_defaults(transport);
                tokio::spawn(channel.execute(server.clone().serve()));
                future::ready(())
            })
            .await;
    });

    Ok(Listener::new(local_addr, task))
}

/// Opens a client to the registry at `addr`.
pub async fn connect(addr: SocketAddr) -> Result<RegistryClient> {
    let mut transport = tarpc::serde_transport::tcp::connect(addr, Json::default);
    transport.config_mut().max_frame_length(usize::MAX);
    let transport = transport
        .await
        .map_err(|source| Error::Connect { addr, source })?;

    Ok(RegistryClient::new(client::Config::default(), transport).spawn())
}

/// Resolves `name` through the registry at `registry`.
pub async fn resolve(registry: SocketAddr, name: &str) -> Result<SocketAddr> {
    let client = connect(registry).await?;

    client
        .lookup(context::current(), name.to_owned())
        .await?
        .ok_or_else(|| Error::NotBound(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_port() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn bind_lookup_unbind() {
        let listener = serve(any_port()).await.unwrap();
        let client = connect(listener.local_addr()).await.unwrap();

        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        client
            .bind(context::current(), "HotelService".to_owned(), addr)
            .await
            .unwrap();

        assert_eq!(
            client
                .lookup(context::current(), "HotelService".to_owned())
                .await
                .unwrap(),
            Some(addr)
        );
        assert!(client
            .unbind(context::current(), "HotelService".to_owned())
            .await
            .unwrap());
        assert!(!client
            .unbind(context::current(), "HotelService".to_owned())
            .await
            .unwrap());
        assert_eq!(
            client
                .lookup(context::current(), "HotelService".to_owned())
                .await
                .unwrap(),
            None
        );

        listener.shutdown();
    }

    #[tokio::test]
    async fn bind_replaces_previous_address() {
        let listener = serve(any_port()).await.unwrap();
        let client = connect(listener.local_addr()).await.unwrap();

        let first: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let second: SocketAddr = "127.0.0.1:4001".parse().unwrap();
        for addr in [first, second] {
            client
                .bind(context::current(), "HotelService".to_owned(), addr)
                .await
                .unwrap();
        }
        client
            .bind(context::current(), "Audit".to_owned(), first)
            .await
            .unwrap();

        assert_eq!(
            resolve(listener.local_addr(), "HotelService").await.unwrap(),
            second
        );
        assert_eq!(
            client.list(context::current()).await.unwrap(),
            vec!["Audit".to_owned(), "HotelService".to_owned()]
        );

        listener.shutdown();
    }

    #[tokio::test]
    async fn resolve_unbound_name() {
        let listener = serve(any_port()).await.unwrap();

        let err = resolve(listener.local_addr(), "HotelService")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotBound(name) if name == "HotelService"));

        listener.shutdown();
    }
}
