use std::net::SocketAddr;

use tarpc::{client::Config, context, tokio_serde::formats::Json};
use tracing::debug;

use crate::{
    error::{Error, Result},
    registry,
    service::HotelServiceClient,
    store::Bookings,
};

/// Typed stub of a remote hotel service.
///
/// Every method fails only on transport faults; a refused booking or a
/// cancellation without match is `Ok(false)`.
#[derive(Debug, Clone)]
pub struct HotelClient {
    /// The address of the service.
    addr: SocketAddr,

    inner: HotelServiceClient,
}

impl HotelClient {
    /// Connects straight to a service listening on `addr`.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let mut transport = tarpc::serde_transport::tcp::connect(addr, Json::default);
        transport.config_mut().max_frame_length(usize::MAX);
        let transport = transport
            .await
            .map_err(|source| Error::Connect { addr, source })?;

        debug!(%addr, "connected to hotel service");

        Ok(Self {
            addr,
            inner: HotelServiceClient::new(Config::default(), transport).spawn(),
        })
    }

    /// Resolves `name` in the registry at `registry` and connects to it.
    pub async fn lookup(registry: SocketAddr, name: &str) -> Result<Self> {
        let addr = registry::resolve(registry, name).await?;
        Self::connect(addr).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn book_room(&self, guest_name: &str, room_number: u32) -> Result<bool> {
        Ok(self
            .inner
            .book_room(context::current(), guest_name.to_owned(), room_number)
            .await?)
    }

    pub async fn cancel_booking(&self, guest_name: &str) -> Result<bool> {
        Ok(self
            .inner
            .cancel_booking(context::current(), guest_name.to_owned())
            .await?)
    }

    pub async fn list_bookings(&self) -> Result<Bookings> {
        Ok(self.inner.list_bookings(context::current()).await?)
    }
}
