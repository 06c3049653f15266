//! Shared foundational types used across the ZFT placement toolchain.
//!
//! This crate provides the integer grid [`Position`] and the [`InternalError`]
//! type that signals a broken placement invariant.

#![warn(missing_docs)]

pub mod geometry;
pub mod result;

pub use geometry::Position;
pub use result::{InternalError, ZftResult};
