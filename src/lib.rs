//! A small remote hotel booking service.
//!
//! The server keeps a [`BookingStore`] in memory and exposes it through the
//! [`HotelService`] tarpc service. Clients find the service by name through a
//! [`registry`] and talk to it with a [`HotelClient`].

pub mod client;
pub mod config;
pub mod error;
pub mod listener;
pub mod menu;
pub mod registry;
pub mod service;
pub mod store;

pub use crate::client::HotelClient;
pub use crate::error::{Error, Result};
pub use crate::service::{HotelServer, HotelService, HotelServiceClient};
pub use crate::store::{BookingStore, Bookings};
