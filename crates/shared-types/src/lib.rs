//! # Shared Types Crate
//!
//! Identifier types that cross crate boundaries: the engine produces them,
//! the event bus carries them and the node runtime parses them from requests.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `PollId` and `VoterId` are defined once here.
//! - **Normalize at the edge**: a `VoterId` can only be obtained through
//!   [`VoterId::parse`], so every comparison downstream is on the canonical form.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
