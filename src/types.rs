use serde::Serialize;

use crate::geometry::Point;

/// Which of the two trees of a neuron a segment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arbor {
    Dendrite,
    Axon,
}

impl Arbor {
    pub fn label(&self) -> &'static str {
        match self {
            Arbor::Dendrite => "Dendrite",
            Arbor::Axon => "Axon Terminal",
        }
    }
}

/// One straight piece of a tree. Never modified after it is pushed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    /// Direction of growth in degrees
    pub angle: f64,
    pub length: f64,
    /// Index (in the same arbor) of the segment whose end this one starts
    /// from. `None` for segments rooted at the soma.
    pub parent: Option<usize>,
}

/// Where a growth operation starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parent {
    pub pos: Point,
    pub angle: f64,
    pub length: f64,
    pub index: Option<usize>,
}

impl Parent {
    /// A parent that is not an existing segment (the soma).
    pub fn root(pos: Point, angle: f64, length: f64) -> Self {
        Self {
            pos,
            angle,
            length,
            index: None,
        }
    }

    /// Continue from the end of the segment stored at `index`.
    pub fn from_segment(index: usize, segment: &Segment) -> Self {
        Self {
            pos: segment.end,
            angle: segment.angle,
            length: segment.length,
            index: Some(index),
        }
    }
}
