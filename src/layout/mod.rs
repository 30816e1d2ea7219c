mod anchors;
mod signature;
mod sizing;
mod solver;
pub(crate) mod types;
pub use types::*;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::ir::SetRegistry;

use anchors::place_anchors;
use signature::{anchor_centroid, enumerate_signatures};
use sizing::{base_node_size, inner_radius, scale_with_packing};
use solver::relax;

/// Center of the unit layout square; the anchor circle and the
/// containment pass are both relative to it.
pub(crate) const CENTER: Point = Point::new(0.5, 0.5);

/// Margin fraction of the base marker size: the solver's step quantum and
/// the gap between a marker and its label seat.
pub(super) const NODE_MARGIN_FRAC: f64 = 0.1;

/// Compute the full sungear layout for one request.
///
/// Pure and synchronous: the registry is read-only, the working state is
/// private to this call, and the jitter source is constructed per
/// invocation (pinned by `config.seed` when reproduction matters), so
/// concurrent requests never perturb each other.
pub fn compute_layout(registry: &SetRegistry, config: &LayoutConfig) -> Result<Layout> {
    let names: Vec<String> = registry.lists().iter().map(|l| l.name.clone()).collect();
    let anchors = place_anchors(&names, config);
    let groups = enumerate_signatures(registry, &anchors)?;

    let inner = inner_radius(names.len(), config);
    let counts: Vec<usize> = groups.iter().map(|g| g.genes.len()).collect();
    let scaled = scale_with_packing(&counts, inner, base_node_size(names.len(), config), config);

    let mut positions: Vec<Point> = groups.iter().map(|g| g.position).collect();
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let result = relax(
        &mut positions,
        &scaled.radii,
        scaled.node_size,
        inner,
        CENTER,
        config,
        &mut rng,
    );

    // A layout is reusable only when it settled on the unfiltered input.
    let can_cache = result.outcome == SolverOutcome::Converged && !registry.filtered();

    let nodes = groups
        .into_iter()
        .zip(positions)
        .zip(&scaled.radii)
        .map(|((group, position), &radius)| {
            let label = label_point(
                position,
                radius,
                &group.signature,
                &anchors,
                scaled.node_size,
                config,
            );
            NodeLayout {
                signature: group.signature,
                genes: group.genes,
                position,
                radius,
                label,
            }
        })
        .collect();

    Ok(Layout {
        anchors,
        nodes,
        outcome: result.outcome,
        iterations: result.iterations,
        can_cache,
        node_size: scaled.node_size,
        inner_radius: inner,
        metadata: registry.metadata().clone(),
    })
}

/// Seat the label just outside the marker, displaced away from the node
/// toward its signature's anchors.
fn label_point(
    position: Point,
    radius: f64,
    signature: &[String],
    anchors: &[AnchorLayout],
    node_size: f64,
    config: &LayoutConfig,
) -> Point {
    let mut direction = anchor_centroid(signature, anchors) - position;
    if direction.norm() <= f64::EPSILON {
        // The node rests exactly on its anchor centroid (possible when a
        // signature spans all lists); aim at its first anchor instead.
        if let Some(anchor) = anchors.iter().find(|a| signature.contains(&a.name)) {
            direction = anchor.position - position;
        }
    }
    position + direction.unit() * (config.label_offset * radius + NODE_MARGIN_FRAC * node_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ListSet;

    fn config() -> LayoutConfig {
        LayoutConfig {
            seed: Some(7),
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn fully_overlapping_lists_collapse_to_one_centered_node() {
        let registry = SetRegistry::from_lists(vec![
            ListSet::new("A", ["g1", "g2"]),
            ListSet::new("B", ["g1", "g2"]),
            ListSet::new("C", ["g1", "g2"]),
        ])
        .unwrap();
        let layout = compute_layout(&registry, &config()).unwrap();

        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(layout.outcome, SolverOutcome::Converged);
        assert!(layout.iterations < 50);
        assert!(layout.can_cache);

        let node = &layout.nodes[0];
        assert_eq!(node.signature, ["A", "B", "C"]);
        assert!(node.position.distance(CENTER) < 1e-9);
        // The label direction degenerates at the centroid; it must still
        // sit a finite distance off the marker.
        let offset = node.label.distance(node.position);
        assert!(offset > node.radius);
        assert!(offset.is_finite());
    }

    #[test]
    fn label_sits_outside_the_marker() {
        let registry = SetRegistry::from_lists(vec![
            ListSet::new("A", ["g1", "g2", "g3"]),
            ListSet::new("B", ["g2", "g3", "g4"]),
        ])
        .unwrap();
        let layout = compute_layout(&registry, &config()).unwrap();
        for node in &layout.nodes {
            let offset = node.label.distance(node.position);
            let expected =
                config().label_offset * node.radius + NODE_MARGIN_FRAC * layout.node_size;
            assert!((offset - expected).abs() < 1e-9);
        }
    }
}
