use std::f64::consts::PI;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::LayoutConfig;

use super::types::{Point, SolverOutcome};
use super::NODE_MARGIN_FRAC;

/// Initial and maximum step, as a fraction of the inner radius.
const STEP_START_FRAC: f64 = 0.4;

#[derive(Debug, Clone, Copy)]
pub(super) struct Relaxation {
    pub outcome: SolverOutcome,
    pub iterations: u32,
}

/// Bounded relaxation of marker positions.
///
/// Each pass pulls every colliding node toward the radius²-weighted
/// centroid of its colliding neighbors; clusters with different membership
/// pull toward different centroids, which disperses them over successive
/// passes. An adaptive step grows while crowding persists and shrinks as
/// it resolves, and a containment pass keeps every marker inside the inner
/// circle. The loop ends as soon as a pass moves no node, or at the
/// iteration cap.
pub(super) fn relax(
    positions: &mut [Point],
    radii: &[f64],
    node_size: f64,
    inner_radius: f64,
    center: Point,
    config: &LayoutConfig,
    rng: &mut SmallRng,
) -> Relaxation {
    let count = positions.len();
    // One quantum serves as step increment, step floor, stall tolerance
    // and containment jitter span.
    let quantum = NODE_MARGIN_FRAC * node_size;
    let max_step = STEP_START_FRAC * inner_radius;
    let collision_pad = config.collision_padding * node_size;

    let mut step = max_step;
    let mut prev_moved = count;

    for iteration in 0..config.max_iterations {
        let mut colliding: Vec<Vec<usize>> = vec![Vec::new(); count];
        for a in 0..count {
            for b in (a + 1)..count {
                if positions[a].distance(positions[b]) < radii[a] + radii[b] + collision_pad {
                    colliding[a].push(b);
                    colliding[b].push(a);
                }
            }
        }

        let mut moves: Vec<Option<Point>> = vec![None; count];
        let mut moved = 0usize;
        for (j, neighbors) in colliding.iter().enumerate() {
            if neighbors.is_empty() {
                continue;
            }
            moved += 1;

            let mut target = Point::default();
            let mut weight_sum = 0.0;
            for &other in neighbors {
                let weight = radii[other] * radii[other];
                target = target + positions[other] * weight;
                weight_sum += weight;
            }
            let mut v = target * (1.0 / weight_sum) - positions[j];

            if v.norm() <= quantum {
                // The neighborhood centroid sits on the node itself; kick
                // in a random direction instead of stalling.
                let theta = rng.random::<f64>() * 2.0 * PI;
                v = Point::new(theta.cos(), theta.sin()) * step;
            }
            moves[j] = Some(v);
        }

        // Step control: grow while crowding is not decreasing, shrink
        // once it is. The first pass compares against the full node count.
        let proposed = if moved >= prev_moved {
            step + quantum
        } else {
            step - quantum
        };
        step = proposed.max(quantum).min(max_step);
        prev_moved = moved;

        for (position, v) in positions.iter_mut().zip(&moves) {
            if let Some(v) = v {
                *position = *position + v.unit() * step;
            }
        }

        // Pull any marker whose outer edge escaped the inner circle back
        // toward the center, overshooting by a jittered margin.
        for (j, position) in positions.iter_mut().enumerate() {
            let overshoot = (*position - center).norm() + radii[j] - inner_radius;
            if overshoot > 0.0 {
                let pull = overshoot + quantum + rng.random::<f64>() * quantum;
                *position = *position + (center - *position).unit() * pull;
            }
        }

        tracing::debug!(
            iteration = iteration + 1,
            adjustments = moved,
            "relaxation pass"
        );

        if moved == 0 {
            return Relaxation {
                outcome: SolverOutcome::Converged,
                iterations: iteration + 1,
            };
        }
    }

    Relaxation {
        outcome: SolverOutcome::Exhausted,
        iterations: config.max_iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn contained(positions: &[Point], radii: &[f64], center: Point, inner_radius: f64) -> bool {
        positions
            .iter()
            .zip(radii)
            .all(|(p, r)| (*p - center).norm() + r <= inner_radius + 1e-9)
    }

    #[test]
    fn lone_marker_converges_immediately() {
        let center = Point::new(0.5, 0.5);
        let mut positions = vec![center];
        let radii = vec![0.05];
        let config = LayoutConfig::default();
        let result = relax(
            &mut positions,
            &radii,
            0.05,
            0.4375,
            center,
            &config,
            &mut rng(),
        );
        assert_eq!(result.outcome, SolverOutcome::Converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(positions[0], center);
    }

    #[test]
    fn coincident_markers_separate() {
        let center = Point::new(0.5, 0.5);
        let mut positions = vec![center, center];
        let radii = vec![0.005, 0.005];
        let config = LayoutConfig::default();
        let result = relax(
            &mut positions,
            &radii,
            0.05,
            0.21875,
            center,
            &config,
            &mut rng(),
        );
        assert_eq!(result.outcome, SolverOutcome::Converged);
        let gap = positions[0].distance(positions[1]);
        assert!(gap >= radii[0] + radii[1] + 0.02 * 0.05);
        assert!(contained(&positions, &radii, center, 0.21875));
    }

    #[test]
    fn escaped_marker_is_pulled_back_inside() {
        let center = Point::new(0.5, 0.5);
        let inner = 0.21875;
        let mut positions = vec![Point::new(0.5, 0.5 - inner - 0.1)];
        let radii = vec![0.02];
        let config = LayoutConfig::default();
        let result = relax(
            &mut positions,
            &radii,
            0.05,
            inner,
            center,
            &config,
            &mut rng(),
        );
        assert_eq!(result.outcome, SolverOutcome::Converged);
        assert!(contained(&positions, &radii, center, inner));
    }

    #[test]
    fn always_halts_within_the_cap() {
        let center = Point::new(0.5, 0.5);
        let inner = 0.21875;
        // A deliberately impossible packing: the loop must still stop.
        let mut positions: Vec<Point> = (0..24)
            .map(|i| Point::new(0.5 + (i as f64) * 1e-4, 0.5))
            .collect();
        let radii = vec![0.09; 24];
        let config = LayoutConfig::default();
        let result = relax(
            &mut positions,
            &radii,
            0.05,
            inner,
            center,
            &config,
            &mut rng(),
        );
        assert!(result.iterations <= config.max_iterations);
        assert!(contained(&positions, &radii, center, inner));
    }
}
