//! # Author Profile Store
//!
//! This crate provides the persistence leaf of the chat pipeline: the stable
//! `(color, voice)` presentation attributes bound to each chat author, backed
//! by a flat JSON settings file.
//!
//! The store is loaded wholesale at startup and rewritten wholesale whenever a
//! previously-unseen author is assigned a profile. Writes are sequential from
//! a single poller, so no file locking is used.

mod domain;
mod store;

pub use domain::{AuthorProfile, Color, ANSI_RESET, PALETTE};
pub use store::{ProfileStore, StoreError};
