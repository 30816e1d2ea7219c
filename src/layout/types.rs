use std::collections::BTreeMap;
use std::ops::{Add, Mul, Sub};

/// A point (or vector) in the unit layout square.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    /// Unit-length vector in the same direction; the zero vector is
    /// returned unchanged.
    pub fn unit(self) -> Point {
        let n = self.norm();
        if n == 0.0 { self } else { Point::new(self.x / n, self.y / n) }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Terminal state of the relaxation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverOutcome {
    /// No node had a colliding neighbor in the last iteration.
    Converged,
    /// The iteration cap was reached with collisions still present.
    Exhausted,
}

/// Fixed circle position representing one input list.
#[derive(Debug, Clone)]
pub struct AnchorLayout {
    pub name: String,
    pub position: Point,
}

/// One marker per observed intersection signature, sized by gene count.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    /// Names of the lists sharing every gene in this node, sorted.
    pub signature: Vec<String>,
    /// Member gene identifiers, sorted.
    pub genes: Vec<String>,
    pub position: Point,
    pub radius: f64,
    /// Label seat just outside the marker, toward the signature's anchors.
    pub label: Point,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub anchors: Vec<AnchorLayout>,
    /// Nodes ordered by gene count ascending (stable on enumeration order).
    pub nodes: Vec<NodeLayout>,
    pub outcome: SolverOutcome,
    /// Relaxation passes actually run (1-based; capped by the config).
    pub iterations: u32,
    /// Whether the result is safe to reuse for future unfiltered requests.
    pub can_cache: bool,
    /// Base marker size after the packing-density correction.
    pub node_size: f64,
    /// Radius of the circle inscribed by the anchors.
    pub inner_radius: f64,
    pub metadata: BTreeMap<String, serde_json::Value>,
}
