// The growing neuron: two append-only trees of segments rooted at the soma

use ::rand as external_rand;
use external_rand::Rng;
use serde::Serialize;
use std::ops::Range;

use crate::geometry::{project, Bounds, Point};
use crate::types::{Arbor, Parent, Segment};

pub const DENDRITE_ANGLE_VARIATION: f64 = 45.0;
pub const DENDRITE_BRANCH_OFFSET: f64 = 180.0;
pub const AXON_ANGLE_VARIATION: f64 = 25.0;
pub const AXON_BRANCH_OFFSET: f64 = 22.5;
pub const DEFAULT_SPROUTS: usize = 2;

/// Angular rules for one arbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArborRules {
    /// Half-width of the uniform jitter added to the parent angle when extending
    pub angle_variation: f64,
    /// Spacing between sprouts when branching
    pub branch_offset: f64,
}

impl ArborRules {
    pub const DENDRITE: ArborRules = ArborRules {
        angle_variation: DENDRITE_ANGLE_VARIATION,
        branch_offset: DENDRITE_BRANCH_OFFSET,
    };

    pub const AXON: ArborRules = ArborRules {
        angle_variation: AXON_ANGLE_VARIATION,
        branch_offset: AXON_BRANCH_OFFSET,
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct NeuronStats {
    pub dendrite_count: usize,
    pub axon_count: usize,
    pub dendrite_length: f64,
    pub axon_length: f64,
    /// Longest chain of segments from the soma, in segments
    pub dendrite_depth: usize,
    pub axon_depth: usize,
}

#[derive(Clone, Debug)]
pub struct Neuron {
    pub id: u64,
    pub position: Point,
    dendrites: Vec<Segment>,
    axon_terminals: Vec<Segment>,
    dendrite_rules: ArborRules,
    axon_rules: ArborRules,
}

impl Neuron {
    pub fn new(id: u64, position: Point) -> Self {
        Self::with_rules(id, position, ArborRules::DENDRITE, ArborRules::AXON)
    }

    pub fn with_rules(
        id: u64,
        position: Point,
        dendrite_rules: ArborRules,
        axon_rules: ArborRules,
    ) -> Self {
        Self {
            id,
            position,
            dendrites: Vec::new(),
            axon_terminals: Vec::new(),
            dendrite_rules,
            axon_rules,
        }
    }

    pub fn dendrites(&self) -> &[Segment] {
        &self.dendrites
    }

    pub fn axon_terminals(&self) -> &[Segment] {
        &self.axon_terminals
    }

    pub fn segments(&self, arbor: Arbor) -> &[Segment] {
        match arbor {
            Arbor::Dendrite => &self.dendrites,
            Arbor::Axon => &self.axon_terminals,
        }
    }

    pub fn rules(&self, arbor: Arbor) -> ArborRules {
        match arbor {
            Arbor::Dendrite => self.dendrite_rules,
            Arbor::Axon => self.axon_rules,
        }
    }

    fn segments_mut(&mut self, arbor: Arbor) -> &mut Vec<Segment> {
        match arbor {
            Arbor::Dendrite => &mut self.dendrites,
            Arbor::Axon => &mut self.axon_terminals,
        }
    }

    /// Grow one segment from `parent`, jittering its angle.
    pub fn extend_dendrite<R: Rng>(
        &mut self,
        rng: &mut R,
        parent: &Parent,
        growth_rate: f64,
    ) -> usize {
        self.extend(Arbor::Dendrite, rng, parent, growth_rate)
    }

    /// Split into `sprouts` segments spread symmetrically around the parent angle.
    pub fn branch_dendrite(
        &mut self,
        parent: &Parent,
        growth_rate: f64,
        sprouts: usize,
    ) -> Range<usize> {
        self.branch(Arbor::Dendrite, parent, growth_rate, sprouts)
    }

    pub fn extend_axon<R: Rng>(&mut self, rng: &mut R, parent: &Parent, growth_rate: f64) -> usize {
        self.extend(Arbor::Axon, rng, parent, growth_rate)
    }

    pub fn branch_axon(
        &mut self,
        parent: &Parent,
        growth_rate: f64,
        sprouts: usize,
    ) -> Range<usize> {
        self.branch(Arbor::Axon, parent, growth_rate, sprouts)
    }

    /// Seed the axonal tree at the soma.
    ///
    /// Without an explicit `angle` the axon points away from the mean
    /// dendrite direction, or in a random direction when there are no
    /// dendrites yet.
    pub fn init_axon_terminal<R: Rng>(
        &mut self,
        rng: &mut R,
        length: f64,
        angle: Option<f64>,
    ) -> usize {
        let angle = match angle {
            Some(angle) => angle,
            None => match self.mean_dendrite_angle() {
                Some(mean) => (mean + 180.0).rem_euclid(360.0),
                None => rng.gen_range(0.0..360.0),
            },
        };
        let end = project(self.position, angle, length);
        self.axon_terminals.push(Segment {
            start: self.position,
            end,
            angle,
            length,
            parent: None,
        });
        tracing::debug!(neuron = self.id, angle, length, "axon seeded");
        self.axon_terminals.len() - 1
    }

    pub fn mean_dendrite_angle(&self) -> Option<f64> {
        if self.dendrites.is_empty() {
            return None;
        }
        let sum: f64 = self.dendrites.iter().map(|d| d.angle).sum();
        Some(sum / self.dendrites.len() as f64)
    }

    fn extend<R: Rng>(
        &mut self,
        arbor: Arbor,
        rng: &mut R,
        parent: &Parent,
        growth_rate: f64,
    ) -> usize {
        let variation = self.rules(arbor).angle_variation;
        let length = parent.length * growth_rate;
        let angle = parent.angle + rng.gen_range(-variation..=variation);
        let end = project(parent.pos, angle, length);
        let segments = self.segments_mut(arbor);
        segments.push(Segment {
            start: parent.pos,
            end,
            angle,
            length,
            parent: parent.index,
        });
        tracing::trace!(?arbor, angle, length, "extend");
        segments.len() - 1
    }

    fn branch(
        &mut self,
        arbor: Arbor,
        parent: &Parent,
        growth_rate: f64,
        sprouts: usize,
    ) -> Range<usize> {
        let offset = self.rules(arbor).branch_offset;
        let length = parent.length * growth_rate;
        let centre = (sprouts as f64 - 1.0) / 2.0;
        let segments = self.segments_mut(arbor);
        let first = segments.len();
        for i in 0..sprouts {
            let angle = parent.angle + offset * (i as f64 - centre);
            segments.push(Segment {
                start: parent.pos,
                end: project(parent.pos, angle, length),
                angle,
                length,
                parent: parent.index,
            });
        }
        tracing::trace!(?arbor, sprouts, length, "branch");
        first..segments.len()
    }

    /// Indices from `index` back to its root, inclusive at both ends.
    pub fn lineage(&self, arbor: Arbor, index: usize) -> Vec<usize> {
        let segments = self.segments(arbor);
        let mut chain = Vec::new();
        let mut cursor = segments.get(index).map(|_| index);
        while let Some(i) = cursor {
            chain.push(i);
            cursor = segments[i].parent;
        }
        chain
    }

    pub fn children(&self, arbor: Arbor, index: usize) -> Vec<usize> {
        self.segments(arbor)
            .iter()
            .enumerate()
            .filter(|(_, s)| s.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn stats(&self) -> NeuronStats {
        NeuronStats {
            dendrite_count: self.dendrites.len(),
            axon_count: self.axon_terminals.len(),
            dendrite_length: self.dendrites.iter().map(|s| s.length).sum(),
            axon_length: self.axon_terminals.iter().map(|s| s.length).sum(),
            dendrite_depth: max_depth(&self.dendrites),
            axon_depth: max_depth(&self.axon_terminals),
        }
    }

    /// Box around the soma and every segment endpoint.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::around(self.position);
        for s in self.dendrites.iter().chain(self.axon_terminals.iter()) {
            bounds.include(s.start);
            bounds.include(s.end);
        }
        bounds
    }
}

// Parents are always pushed before their children, so one forward pass is enough.
fn max_depth(segments: &[Segment]) -> usize {
    let mut depths = Vec::with_capacity(segments.len());
    for s in segments {
        let depth = match s.parent {
            Some(p) => depths.get(p).copied().unwrap_or(0) + 1,
            None => 1,
        };
        depths.push(depth);
    }
    depths.into_iter().max().unwrap_or(0)
}
