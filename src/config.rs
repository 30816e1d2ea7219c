use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout constants. The defaults are contract values; change them only
/// to restyle the output, not to fix a layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Radius of the anchor circle around the (0.5, 0.5) center.
    pub radius: f64,
    /// Hard cap on the base marker size.
    pub node_size_cap: f64,
    /// Maximum ratio of marker footprint area to diagram capacity.
    pub packing_density: f64,
    /// Base-size decrement per packing correction round.
    pub size_decrement: f64,
    /// Collision padding between markers, as a fraction of the base size.
    pub collision_padding: f64,
    /// Relaxation iteration cap.
    pub max_iterations: u32,
    /// Label displacement, as a multiple of the marker radius.
    pub label_offset: f64,
    /// Pins the jitter source for reproducible layouts; `None` draws a
    /// fresh seed per computation.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: 0.4375,
            node_size_cap: 0.05,
            packing_density: 0.2,
            size_decrement: 0.002,
            collision_padding: 0.02,
            max_iterations: 50,
            label_offset: 1.2,
            seed: None,
        }
    }
}

/// On-disk shape: every field optional, unknown fields rejected. Values
/// present in the file override the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    radius: Option<f64>,
    node_size_cap: Option<f64>,
    packing_density: Option<f64>,
    size_decrement: Option<f64>,
    collision_padding: Option<f64>,
    max_iterations: Option<u32>,
    label_offset: Option<f64>,
    seed: Option<u64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(v) = parsed.radius {
        config.radius = v;
    }
    if let Some(v) = parsed.node_size_cap {
        config.node_size_cap = v;
    }
    if let Some(v) = parsed.packing_density {
        config.packing_density = v;
    }
    if let Some(v) = parsed.size_decrement {
        config.size_decrement = v;
    }
    if let Some(v) = parsed.collision_padding {
        config.collision_padding = v;
    }
    if let Some(v) = parsed.max_iterations {
        config.max_iterations = v;
    }
    if let Some(v) = parsed.label_offset {
        config.label_offset = v;
    }
    if let Some(v) = parsed.seed {
        config.seed = Some(v);
    }

    anyhow::ensure!(config.radius > 0.0, "radius must be positive");
    anyhow::ensure!(config.node_size_cap > 0.0, "nodeSizeCap must be positive");
    anyhow::ensure!(
        config.packing_density > 0.0 && config.packing_density <= 1.0,
        "packingDensity must be in (0, 1]"
    );
    anyhow::ensure!(config.max_iterations > 0, "maxIterations must be positive");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.radius, 0.4375);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = std::env::temp_dir();
        let path = dir.join("sungear-config-test.json5");
        std::fs::write(&path, "{ maxIterations: 10, seed: 99 }").unwrap();
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.radius, 0.4375);
    }
}
