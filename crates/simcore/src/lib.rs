//! Core types shared by the line follower simulation crates
//!
//! This crate provides:
//! - Planar pose and frame transforms
//! - The read-only track surface and the boundary predicate
//! - Pose integrators and the shared model traits

pub mod bounds;
pub mod geometry;
pub mod integrators;
pub mod map;
pub mod traits;

pub use bounds::*;
pub use geometry::*;
pub use integrators::*;
pub use map::*;
pub use traits::*;
