// Device session modules
//
// Hand-written client for the Comelit SimpleHome pages. Transport
// mechanics live in `client`; endpoint groups extend `Session` with
// inherent methods.

pub mod auth;
pub mod bridge;
pub mod client;
pub mod models;
pub mod vedo;

pub use client::Session;
pub use vedo::{ALL_ZONES, VedoRoute};
