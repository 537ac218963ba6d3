//! MegaPixel: a rectangle-physics platformer simulation.
//!
//! The library holds the whole simulation (`compute`, `physics`, `patrol`)
//! over plain data (`entities`) tuned by per-variant tables (`config`).
//! Terminal rendering and audio cues live in the binary.

pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
pub mod patrol;
pub mod physics;
