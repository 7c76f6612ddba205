//! GST registry HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the fetch flow: taxpayer search → filed-returns track.

pub mod client;

pub use client::{RegistryClient, RegistryCredentials, RegistryError};
