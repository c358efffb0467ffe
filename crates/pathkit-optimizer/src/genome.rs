//! Mapping between a segment list and the flat coordinate vector the search
//! evolves.
//!
//! Only travelled, unlocked segments contribute genes: every control point,
//! plus the end point when end points may move. Everything else stays exactly
//! as the caller supplied it.

use std::collections::HashSet;

use pathkit_core::{PathSegment, Point, SequenceItem, StartPoint};
use pathkit_planner::resolve;
use pathkit_settings::OptimizerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Control(usize),
    End,
}

#[derive(Debug, Clone, Copy)]
struct Gene {
    segment: usize,
    slot: Slot,
}

/// Encodes candidates as `[x0, y0, x1, y1, ...]`.
#[derive(Debug, Clone)]
pub struct GenomeLayout {
    template: Vec<PathSegment>,
    genes: Vec<Gene>,
}

impl GenomeLayout {
    pub fn new(
        start: &StartPoint,
        segments: &[PathSegment],
        sequence: &[SequenceItem],
        settings: &OptimizerSettings,
    ) -> Self {
        let mut template = segments.to_vec();
        if settings.seed_straight_segments {
            seed_straight_segments(start, &mut template, sequence);
        }

        let travelled: HashSet<usize> = resolve(&template, sequence)
            .travel_steps()
            .map(|(line_index, _, _)| line_index)
            .collect();

        let mut genes = Vec::new();
        for (i, segment) in template.iter().enumerate() {
            if segment.locked || !travelled.contains(&i) {
                continue;
            }
            genes.extend((0..segment.control_points.len()).map(|c| Gene {
                segment: i,
                slot: Slot::Control(c),
            }));
            if settings.perturb_endpoints {
                genes.push(Gene {
                    segment: i,
                    slot: Slot::End,
                });
            }
        }

        Self { template, genes }
    }

    /// Number of scalar coordinates in a genome.
    pub fn len(&self) -> usize {
        self.genes.len() * 2
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The segment list candidates are decoded onto.
    pub fn template(&self) -> &[PathSegment] {
        &self.template
    }

    /// Genome of the template itself.
    pub fn encode(&self) -> Vec<f64> {
        let mut genome = Vec::with_capacity(self.len());
        for gene in &self.genes {
            let segment = &self.template[gene.segment];
            let point = match gene.slot {
                Slot::Control(c) => segment.control_points[c],
                Slot::End => segment
                    .end_point
                    .map(|end| end.point())
                    .unwrap_or_default(),
            };
            genome.push(point.x);
            genome.push(point.y);
        }
        genome
    }

    /// A fresh segment list carrying `genome`'s coordinates.
    pub fn decode(&self, genome: &[f64]) -> Vec<PathSegment> {
        let mut segments = self.template.clone();
        for (gene, xy) in self.genes.iter().zip(genome.chunks_exact(2)) {
            let point = Point::new(xy[0], xy[1]);
            let segment = &mut segments[gene.segment];
            match gene.slot {
                Slot::Control(c) => segment.control_points[c] = point,
                Slot::End => {
                    if let Some(end) = segment.end_point.as_mut() {
                        end.set_point(point);
                    }
                }
            }
        }
        segments
    }
}

/// Give each unlocked straight segment a control point at its chord midpoint.
/// The curve is unchanged but now has a handle the search can move.
fn seed_straight_segments(
    start: &StartPoint,
    segments: &mut [PathSegment],
    sequence: &[SequenceItem],
) {
    let midpoints: Vec<(usize, Point)> = {
        let resolved = resolve(segments, sequence);
        let mut position = start.point();
        let mut midpoints = Vec::new();
        for (line_index, segment, end) in resolved.travel_steps() {
            if !segment.locked && segment.is_straight() {
                midpoints.push((line_index, position.lerp(&end.point(), 0.5)));
            }
            position = end.point();
        }
        midpoints
    };

    for (line_index, midpoint) in midpoints {
        let segment = &mut segments[line_index];
        if segment.control_points.is_empty() {
            tracing::debug!("Seeding straight segment '{}' with a midpoint", segment.id);
            segment.control_points.push(midpoint);
        }
    }
}
