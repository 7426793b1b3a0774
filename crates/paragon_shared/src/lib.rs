//! # PARAGON Shared
//!
//! Common types used by both client and server.
//!
//! Everything here is plain data: vectors for navigation geometry and the
//! opaque handles (entity ids, prototype ids) that replicated records carry.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod ids;
pub mod math;

pub use ids::{EntityId, PrototypeId};
pub use math::Vec3;
