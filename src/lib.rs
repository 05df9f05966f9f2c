//! Live transit vehicles from a GTFS-realtime feed.
//!
//! Each poll decodes the feed ([`decoder`]), maps it onto
//! [`VehicleRecord`](models::VehicleRecord)s ([`normalizer`]) and reconciles
//! the result against the vehicles already shown ([`reconciler`]), so
//! consumers apply incremental changes instead of redrawing every time.

pub mod api;
pub mod config;
pub mod decoder;
pub mod error;
pub mod gtfs_realtime;
pub mod models;
pub mod normalizer;
pub mod poller;
pub mod presenter;
pub mod reconciler;
pub mod server;
