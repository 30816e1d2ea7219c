use std::f64::consts::PI;

use crate::config::LayoutConfig;

use super::types::{AnchorLayout, Point};
use super::CENTER;

/// Angle of the first anchor; with y growing downward it sits at the top
/// of the circle, and later anchors proceed clockwise.
const START_ANGLE: f64 = PI / 2.0;

/// Place one anchor per list, evenly spaced on the outer circle. The k-th
/// name always lands on the k-th spoke, so a fixed name order yields
/// identical positions across calls.
pub(super) fn place_anchors(names: &[String], config: &LayoutConfig) -> Vec<AnchorLayout> {
    let n = names.len();
    names
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let angle = 2.0 * PI * (1.0 - k as f64 / n as f64) - START_ANGLE;
            AnchorLayout {
                name: name.clone(),
                position: Point::new(
                    CENTER.x + config.radius * angle.cos(),
                    CENTER.y + config.radius * angle.sin(),
                ),
            }
        })
        .collect()
}
