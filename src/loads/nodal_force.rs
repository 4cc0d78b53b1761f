//! Equivalent nodal forces produced by element load distribution

use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::math::{LocalFrame, Vec3};

/// Coordinate system the force components are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadFrame {
    /// Element local axes (x along the first edge, z along the normal)
    Local,
    /// Global X, Y, Z
    Global,
}

/// A force applied to one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalForce {
    pub node: NodeId,
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub frame: LoadFrame,
}

impl NodalForce {
    pub fn new(node: NodeId, force: Vec3, frame: LoadFrame) -> Self {
        Self {
            node,
            fx: force.x,
            fy: force.y,
            fz: force.z,
            frame,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.fz]
    }

    pub fn vector(&self) -> Vec3 {
        Vec3::new(self.fx, self.fy, self.fz)
    }

    /// Express the force in global axes using the element frame it was computed in
    pub fn to_global(&self, frame: &LocalFrame) -> Self {
        match self.frame {
            LoadFrame::Global => *self,
            LoadFrame::Local => Self::new(self.node, frame.rotation().transpose() * self.vector(), LoadFrame::Global),
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            fx: self.fx * factor,
            fy: self.fy * factor,
            fz: self.fz * factor,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_force_to_global() {
        // Panel in the YZ plane
        let pts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        ];
        let frame = LocalFrame::from_points(&pts).unwrap();
        let f = NodalForce::new(NodeId(0), Vec3::new(0.0, 0.0, -10.0), LoadFrame::Local).to_global(&frame);
        assert_eq!(f.frame, LoadFrame::Global);
        // Normal of this panel is +X
        assert_relative_eq!(f.fx, -10.0, epsilon = 1e-12);
        assert_relative_eq!(f.fy, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled() {
        let f = NodalForce::new(NodeId(3), Vec3::new(1.0, 2.0, 3.0), LoadFrame::Global).scaled(1.5);
        assert_eq!(f.as_array(), [1.5, 3.0, 4.5]);
        assert_eq!(f.node, NodeId(3));
    }
}
