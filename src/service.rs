use std::net::SocketAddr;

use futures::{future, prelude::*};
use tarpc::{
    context,
    server::{self, Channel},
    tokio_serde::formats::Json,
};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    listener::Listener,
    store::{BookingStore, Bookings},
};

/// The remote booking contract.
#[tarpc::service]
pub trait HotelService {
    /// Books `room_number` for `guest_name`. False if the room is taken.
    async fn book_room(guest_name: String, room_number: u32) -> bool;
    /// Cancels one booking of `guest_name`. False if the guest has none.
    async fn cancel_booking(guest_name: String) -> bool;
    async fn list_bookings() -> Bookings;
}

#[derive(Debug, Clone)]
pub struct HotelServer {
    store: BookingStore,
}

impl HotelServer {
    pub fn new(store: BookingStore) -> Self {
        Self { store }
    }
}

#[tarpc::server]
impl HotelService for HotelServer {
    async fn book_room(self, _: context::Context, guest_name: String, room_number: u32) -> bool {
        self.store.book_room(guest_name, room_number).await
    }

    async fn cancel_booking(self, _: context::Context, guest_name: String) -> bool {
        self.store.cancel_booking(&guest_name).await
    }

    async fn list_bookings(self, _: context::Context) -> Bookings {
        self.store.list_bookings().await
    }
}

/// Accepts booking connections on `addr` until the returned listener is shut down.
///
/// Every connection gets its own task and every request within it is executed
/// on a task of its own; `store` is the only state they share.
pub async fn serve(addr: SocketAddr, store: BookingStore) -> Result<Listener> {
    let mut incoming = tarpc::serde_transport::tcp::listen(addr, Json::default)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    incoming.config_mut().max_frame_length(usize::MAX);

    let local_addr = incoming.local_addr();
    info!(%local_addr, "hotel service listening");

    let task = tokio::spawn(async move {
        incoming
            .filter_map(|transport| {
                future::ready(match transport {
                    Err(err) => {
                        warn!("accepting connection: {err:?}");
                        None
                    }
                    Ok(v) => Some(v),
                })
            })
            .for_each(|transport| {
                if let Ok(peer) = transport.peer_addr() {
                    debug!(%peer, "client connected");
                }

                let server = HotelServer::new(store.clone());
                let channel = server::BaseChannel::with_defaults(transport);
                tokio::spawn(channel.execute(server.serve()));

                future::ready(())
            })
            .await;
    });

    Ok(Listener::new(local_addr, task))
}
