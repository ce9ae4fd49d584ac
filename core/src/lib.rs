//! Client core for the apartments rental service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), then layers a `Transport`
//! and two headless screens on top: the apartments list with its edit form,
//! and the rent statistics.
//!
//! # Design
//! - `ApartmentClient` is stateless; it holds only `base_url`.
//! - `Api<T>` runs build, execute, parse for one operation and logs failures.
//! - Screens never patch their collection locally; every mutation is
//!   followed by a full reload.
//! - User-facing alerts go through the injected `Notifier`.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod notify;
pub mod screens;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod types;

pub use api::Api;
pub use client::ApartmentClient;
pub use error::{ApiError, GENERIC_FAILURE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use notify::Notifier;
pub use screens::{ApartmentsScreen, StatsScreen};
pub use transport::{Transport, UreqTransport};
pub use types::{Apartment, ApartmentInput, Observation, Stats};
