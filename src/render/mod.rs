//! Rasterization primitives shared by the filters.

pub mod draw;
