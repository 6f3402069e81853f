use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::Mutex;
use tracing::{info, warn};

/// Room number -> guest name.
pub type Bookings = BTreeMap<u32, String>;

/// In-memory booking state shared by every connection of a server.
///
/// Cloning the store clones the handle, not the bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    /// The booked rooms. Every operation holds this lock for its whole duration.
    rooms: Arc<Mutex<Bookings>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Books `room_number` for `guest_name` if the room is free.
    ///
    /// Returns false without touching the state when the room is taken, when
    /// the room number is 0 or when the guest name is empty.
    pub async fn book_room(&self, guest_name: String, room_number: u32) -> bool {
        if room_number == 0 || guest_name.is_empty() {
            warn!(room_number, guest = %guest_name, "rejecting malformed booking");
            return false;
        }

        let mut rooms = self.rooms.lock().await;

        if let Some(current) = rooms.get(&room_number) {
            info!(room_number, guest = %current, "room is already booked");
            return false;
        }

        info!(room_number, guest = %guest_name, "room booked");
        rooms.insert(room_number, guest_name);
        true
    }

    /// Cancels one booking held by `guest_name`.
    ///
    /// A guest holding several rooms loses the lowest numbered one.
    pub async fn cancel_booking(&self, guest_name: &str) -> bool {
        let mut rooms = self.rooms.lock().await;

        let room_number = rooms
            .iter()
            .find(|(_, guest)| guest.as_str() == guest_name)
            .map(|(room_number, _)| *room_number);

        match room_number {
            None => {
                info!(guest = guest_name, "no booking found");
                false
            }
            Some(room_number) => {
                rooms.remove(&room_number);
                info!(room_number, guest = guest_name, "booking cancelled");
                true
            }
        }
    }

    /// Returns a copy of the current bookings.
    pub async fn list_bookings(&self) -> Bookings {
        self.rooms.lock().await.clone()
    }
}
