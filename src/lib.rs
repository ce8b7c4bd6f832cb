//! Physics sandbox engine library
//!
//! A 2D "build and destroy" sandbox: stack blocks of different materials,
//! then demolish them with bombs, cannon fire, wrecking balls, and laser cuts.
//! Bodies fracture into debris when contacts exceed a material strength
//! threshold, with particle bursts for feedback.

pub mod arena;
pub mod block;
pub mod block_rendering;
pub mod config;
pub mod constants;
pub mod destruction;
pub mod error;
pub mod explosion;
pub mod graphics;
pub mod laser;
pub mod material;
pub mod particles;
pub mod rendering;
pub mod rng;
pub mod tools;
