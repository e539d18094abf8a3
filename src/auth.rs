//! Steam identifiers and secrets shared by the relying party and profile client.

pub mod id;
pub mod secret;

pub use id::*;
pub use secret::*;
