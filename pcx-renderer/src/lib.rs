//! This crate renders GPU-resident point clouds, either as single pixel points or as
//! screen facing disks of a fixed size in world units.

pub mod renderer;

pub use glium;
