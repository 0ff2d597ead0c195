//! Procedural growth of a 2-D neuron: a dendritic tree around a fixed soma
//! and an axonal tree seeded opposite the mean dendrite direction.
//!
//! Main components:
//! - [`geometry`]: points, the rotate-and-project helper, bounding boxes.
//! - [`types`]: segments, arbors and growth parents.
//! - [`neuron`]: the growing entity and its five growth operations.
//! - [`simulation`]: the randomized driver for both growth phases.
//! - [`population`]: many neurons grown in parallel.
//! - [`config`]: growth parameters and config file loading.
//! - [`export`]: JSON snapshots for headless runs.
//! - [`viewport`]: world-to-screen fitting used by the renderer.

pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod neuron;
pub mod population;
pub mod simulation;
pub mod types;
pub mod viewport;

#[cfg(feature = "ui")]
pub mod visualization;
