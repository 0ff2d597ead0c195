use macroquad::prelude::*;

use crate::neuron::{Neuron, NeuronStats};
use crate::simulation::GrowthPhase;
use crate::types::{Arbor, Segment};
use crate::viewport::Viewport;

pub const TITLE: &str = "Neuron: Dendrites and Axon Terminal Branches";
pub const MARGIN: f32 = 40.0;

/// How one arbor is drawn.
pub struct ArborStyle {
    pub line: Color,
    pub thickness: f32,
    pub marker: Color,
    pub marker_radius: f32,
}

pub fn arbor_style(arbor: Arbor) -> ArborStyle {
    match arbor {
        Arbor::Dendrite => ArborStyle {
            line: BLUE,
            thickness: 1.0,
            marker: GREEN,
            marker_radius: 2.5,
        },
        Arbor::Axon => ArborStyle {
            line: MAGENTA,
            thickness: 2.0,
            marker: MAGENTA,
            marker_radius: 3.0,
        },
    }
}

const SOMA_COLOR: Color = RED;
const SOMA_RADIUS: f32 = 5.0;

pub fn draw_neuron(neuron: &Neuron, viewport: &Viewport) {
    for arbor in [Arbor::Dendrite, Arbor::Axon] {
        draw_segments(neuron.segments(arbor), viewport, &arbor_style(arbor));
    }
    let (sx, sy) = viewport.to_screen(neuron.position);
    draw_circle(sx, sy, SOMA_RADIUS, SOMA_COLOR);
}

pub fn draw_segments(segments: &[Segment], viewport: &Viewport, style: &ArborStyle) {
    for segment in segments {
        let (x1, y1) = viewport.to_screen(segment.start);
        let (x2, y2) = viewport.to_screen(segment.end);
        draw_line(x1, y1, x2, y2, style.thickness, style.line);
        draw_circle(x2, y2, style.marker_radius, style.marker);
    }
}

/// One entry per category no matter how many segments were drawn.
pub fn draw_legend(neuron: &Neuron) {
    let x = screen_width() - 170.0;
    let mut y = 20.0;
    draw_rectangle(x - 10.0, y - 5.0, 170.0, 70.0, Color::new(1.0, 1.0, 1.0, 0.85));
    draw_rectangle_lines(x - 10.0, y - 5.0, 170.0, 70.0, 1.0, LIGHTGRAY);

    for arbor in [Arbor::Dendrite, Arbor::Axon] {
        if neuron.segments(arbor).is_empty() {
            continue;
        }
        let style = arbor_style(arbor);
        draw_line(x, y + 8.0, x + 24.0, y + 8.0, style.thickness, style.line);
        draw_text(arbor.label(), x + 32.0, y + 13.0, 18.0, BLACK);
        y += 20.0;
    }
    draw_circle(x + 12.0, y + 8.0, SOMA_RADIUS, SOMA_COLOR);
    draw_text("Neuron", x + 32.0, y + 13.0, 18.0, BLACK);
}

pub fn draw_title() {
    let font_size = 24.0;
    let width = measure_text(TITLE, None, font_size as u16, 1.0).width;
    draw_text(TITLE, (screen_width() - width) / 2.0, 28.0, font_size, BLACK);
}

pub fn draw_stats(stats: &NeuronStats, phase: GrowthPhase, seed: u64) {
    let phase_text = match phase {
        GrowthPhase::Dendritic { remaining } => format!("dendritic ({remaining} left)"),
        GrowthPhase::Axonal { remaining } => format!("axonal ({remaining} left)"),
        GrowthPhase::Complete => "complete".to_string(),
    };
    let stats_text = format!(
        "Dendrites: {} | Axon terminals: {} | Depth: {}/{} | Phase: {} | Seed: {}",
        stats.dendrite_count,
        stats.axon_count,
        stats.dendrite_depth,
        stats.axon_depth,
        phase_text,
        seed,
    );
    draw_text(
        &stats_text,
        10.0,
        screen_height() - 12.0,
        16.0,
        Color::new(0.2, 0.2, 0.2, 0.9),
    );
}
