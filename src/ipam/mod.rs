//! Target phpIPAM access.
//!
//! - [`inventory`] - The [`Inventory`] trait the pipeline is written against
//! - [`client`] - REST client implementing it
//! - [`session`] - Session token handling

mod client;
mod inventory;
mod session;

// Re-export public types
pub use client::{decode_envelope, Envelope, IpamClient};
pub use inventory::Inventory;
pub use session::Token;
