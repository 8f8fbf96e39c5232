//! # Core Module
//!
//! Fundamental building blocks shared by every planet subsystem.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking,
//!   used to hold chunks so meshing and terraforming can share them across threads
//! - `math`: Generic float helpers (`lerp`, `inverse_lerp`, `smoothstep`, `saturate`)
//!
//! ## Usage
//! ```rust
//! use voxel_planet::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod math;
pub mod mt_resource;

pub use mt_resource::MtResource;
