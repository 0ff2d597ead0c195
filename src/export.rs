// Serializable view of a grown neuron, used by headless mode

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OutputError;
use crate::geometry::{Bounds, Point};
use crate::neuron::NeuronStats;
use crate::simulation::Simulation;
use crate::types::Segment;

#[derive(Serialize, Clone)]
pub struct NeuronSnapshot {
    pub id: u64,
    pub seed: u64,
    pub position: Point,
    pub bounds: Bounds,
    pub stats: NeuronStats,
    pub dendrites: Vec<Segment>,
    pub axon_terminals: Vec<Segment>,
}

impl NeuronSnapshot {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let neuron = &sim.neuron;
        Self {
            id: neuron.id,
            seed: sim.seed(),
            position: neuron.position,
            bounds: neuron.bounds(),
            stats: neuron.stats(),
            dendrites: neuron.dendrites().to_vec(),
            axon_terminals: neuron.axon_terminals().to_vec(),
        }
    }
}

/// Serialize one snapshot as an object, several as an array.
pub fn to_json(snapshots: &[NeuronSnapshot], pretty: bool) -> Result<String, OutputError> {
    let json = match (snapshots, pretty) {
        ([single], true) => serde_json::to_string_pretty(single)?,
        ([single], false) => serde_json::to_string(single)?,
        (many, true) => serde_json::to_string_pretty(many)?,
        (many, false) => serde_json::to_string(many)?,
    };
    Ok(json)
}

pub fn write_json<P: AsRef<Path>>(
    path: P,
    snapshots: &[NeuronSnapshot],
    pretty: bool,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = to_json(snapshots, pretty)?;
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    out.write_all(json.as_bytes()).map_err(io_err)?;
    out.flush().map_err(io_err)?;
    tracing::info!(path = %path.display(), neurons = snapshots.len(), "wrote snapshot");
    Ok(())
}
