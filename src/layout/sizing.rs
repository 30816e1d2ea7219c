use std::f64::consts::PI;

use crate::config::LayoutConfig;

/// Radii consistent with the last accepted base size.
#[derive(Debug, Clone)]
pub(super) struct Scaled {
    pub radii: Vec<f64>,
    pub node_size: f64,
}

/// Radius of the circle inscribed by the anchors. All markers must end up
/// inside it.
pub(super) fn inner_radius(list_count: usize, config: &LayoutConfig) -> f64 {
    if list_count == 2 {
        config.radius
    } else {
        config.radius * (PI / list_count as f64).cos()
    }
}

/// Base marker size before the packing correction: a cap, or a fraction of
/// the anchor spacing when the circle is divided among many lists.
pub(super) fn base_node_size(list_count: usize, config: &LayoutConfig) -> f64 {
    if list_count == 2 {
        config.node_size_cap.min(config.radius * 0.2)
    } else {
        config
            .node_size_cap
            .min(2.0 * config.radius * (PI / list_count as f64).sin() / 3.0)
    }
}

/// Linear rescale of gene counts onto `[0.1 * node_size, node_size]`.
/// All-equal counts give every node the full base size.
fn scale_sizes(counts: &[usize], node_size: f64) -> Vec<f64> {
    let min = counts.iter().copied().min().unwrap_or(0) as f64;
    let max = counts.iter().copied().max().unwrap_or(0) as f64;
    let ptp = max - min;
    if ptp == 0.0 {
        return vec![node_size; counts.len()];
    }
    counts
        .iter()
        .map(|&c| (c as f64 - min) / ptp * 0.9 * node_size + 0.1 * node_size)
        .collect()
}

/// Total footprint area of the padded markers.
fn footprint(radii: &[f64], node_size: f64, config: &LayoutConfig) -> f64 {
    radii
        .iter()
        .map(|r| {
            let padded = r + config.collision_padding * node_size;
            2.0 * PI * padded * padded
        })
        .sum()
}

/// Rescale counts to radii, then shrink the base size until the markers
/// occupy at most `packing_density` of the diagram capacity. The
/// non-positive floor is defensive; real inputs stop on the density bound.
pub(super) fn scale_with_packing(
    counts: &[usize],
    inner_radius: f64,
    base_size: f64,
    config: &LayoutConfig,
) -> Scaled {
    let capacity = 2.0 * PI * inner_radius * inner_radius;
    let mut node_size = base_size;
    let mut radii = scale_sizes(counts, node_size);

    while footprint(&radii, node_size, config) / capacity > config.packing_density {
        if node_size - config.size_decrement <= 0.0 {
            break;
        }
        node_size -= config.size_decrement;
        radii = scale_sizes(counts, node_size);
        tracing::trace!(node_size, "packing density exceeded, shrinking markers");
    }

    Scaled { radii, node_size }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_list_inner_radius_is_the_outer_radius() {
        let config = LayoutConfig::default();
        assert_eq!(inner_radius(2, &config), config.radius);
        assert!(inner_radius(3, &config) < config.radius);
        assert!(inner_radius(3, &config) < inner_radius(8, &config));
    }

    #[test]
    fn equal_counts_share_the_base_size() {
        let radii = scale_sizes(&[4, 4, 4], 0.05);
        assert_eq!(radii, vec![0.05, 0.05, 0.05]);
    }

    #[test]
    fn rescale_hits_both_endpoints() {
        let radii = scale_sizes(&[1, 3, 5], 0.05);
        assert!((radii[0] - 0.005).abs() < 1e-12);
        assert!((radii[1] - 0.0275).abs() < 1e-12);
        assert!((radii[2] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn packing_bound_holds_for_crowded_input() {
        let config = LayoutConfig::default();
        // 7 equal-count signatures on 3 lists all get the full base size,
        // which overflows the density bound, so the shrink loop must engage.
        let counts = vec![4, 4, 4, 4, 4, 4, 4];
        let inner = inner_radius(3, &config);
        let base = base_node_size(3, &config);
        let scaled = scale_with_packing(&counts, inner, base, &config);

        assert!(scaled.node_size < base);
        let capacity = 2.0 * PI * inner * inner;
        let used = footprint(&scaled.radii, scaled.node_size, &config);
        assert!(used <= capacity * config.packing_density * 1.0001);
    }

    #[test]
    fn uncrowded_input_keeps_the_base_size() {
        let config = LayoutConfig::default();
        let counts = vec![1, 2, 3];
        let inner = inner_radius(2, &config);
        let base = base_node_size(2, &config);
        let scaled = scale_with_packing(&counts, inner, base, &config);
        assert_eq!(scaled.node_size, base);
    }
}
