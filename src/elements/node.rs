//! Node element - represents a point in 3D space

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside a [`Mesh`](crate::mesh::Mesh) node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A 3D node of the structural model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate (elevation)
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Restrained DOFs [DX, DY, DZ, RX, RY, RZ], `None` for a free node
    #[serde(default)]
    pub restraint: Option<[bool; 6]>,
}

impl Node {
    /// Create a new free node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            restraint: None,
        }
    }

    /// Mark the node as supported with the given restrained DOFs
    pub fn with_restraint(mut self, restraint: [bool; 6]) -> Self {
        self.restraint = Some(restraint);
        self
    }

    /// Fully fixed support
    pub fn fixed(mut self) -> Self {
        self.restraint = Some([true; 6]);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.restraint.is_some_and(|r| r.iter().any(|&d| d))
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.position() - self.position()).norm()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl From<[f64; 3]> for Node {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0, 0.0);
        let n2 = Node::new(3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_restraint_flag() {
        assert!(!Node::new(0.0, 0.0, 0.0).is_supported());
        assert!(Node::new(0.0, 0.0, 0.0).fixed().is_supported());
        let roller = Node::default().with_restraint([false, true, false, false, false, false]);
        assert!(roller.is_supported());
        assert!(!Node::default().with_restraint([false; 6]).is_supported());
    }
}
