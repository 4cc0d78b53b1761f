//! Mesh generation for walls and slabs
//!
//! A [`Mesh`] is an arena of nodes plus shell elements referencing them by
//! [`NodeId`]. Meshes are regenerated whenever the parent geometry changes.

mod quality;
mod slab;
mod wall;

pub use quality::{mesh_quality, validate_element, validate_quad, validate_triangle, QualityReport};
pub use slab::{generate_slab_mesh, SlabGeometry};
pub use wall::{generate_wall_mesh, WallGeometry};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::analysis::MeshOptions;
use crate::elements::{Node, NodeId, ShellElement};
use crate::error::{EngineError, EngineResult};

/// Nodes and shell elements generated for one wall or slab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub nodes: Vec<Node>,
    pub elements: Vec<ShellElement>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Append an element, checking that every node reference exists
    pub fn add_element(&mut self, element: ShellElement) -> EngineResult<()> {
        if let Some(&missing) = element.nodes().iter().find(|id| id.0 >= self.nodes.len()) {
            return Err(EngineError::NodeNotFound(missing));
        }
        self.elements.push(element);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> EngineResult<&Node> {
        self.nodes.get(id.0).ok_or(EngineError::NodeNotFound(id))
    }

    /// Coordinates of the element's nodes in topology order
    pub fn element_coords(&self, element: &ShellElement) -> EngineResult<Vec<Vector3<f64>>> {
        element
            .nodes()
            .iter()
            .map(|&id| self.node(id).map(Node::position))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

pub(crate) fn check_mesh_size(options: &MeshOptions) -> EngineResult<()> {
    if !(options.mesh_size.is_finite() && options.mesh_size > 0.0) {
        return Err(EngineError::InvalidInput(format!(
            "mesh size must be positive, got {}",
            options.mesh_size
        )));
    }
    Ok(())
}

/// Upper bound on the number of element edges along one side of a parent
pub(crate) const MAX_EDGE_DIVISIONS: usize = 1000;

/// Division count from an already rounded `length / size` ratio
pub(crate) fn edge_divisions(ratio: f64) -> EngineResult<usize> {
    if !ratio.is_finite() || ratio > MAX_EDGE_DIVISIONS as f64 {
        return Err(EngineError::InvalidInput(format!(
            "mesh size gives {ratio} divisions per edge, limit is {MAX_EDGE_DIVISIONS}"
        )));
    }
    Ok((ratio as usize).max(1))
}

/// Log quality problems of a freshly generated mesh
pub(crate) fn log_quality(mesh: &Mesh, options: &MeshOptions) -> EngineResult<()> {
    if !options.check_quality {
        return Ok(());
    }
    for report in mesh_quality(mesh, options)? {
        for warning in &report.warnings {
            log::warn!("element {}: {}", report.element_id.unwrap_or_default(), warning);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ParentKind, ShellTopology};

    #[test]
    fn test_add_element_rejects_dangling_node() {
        let mut mesh = Mesh::new();
        let a = mesh.add_node(Node::new(0.0, 0.0, 0.0));
        let b = mesh.add_node(Node::new(1.0, 0.0, 0.0));
        let element = ShellElement::new(0, ShellTopology::Tri3([a, b, NodeId(7)]), 10.0, "S1", ParentKind::Slab);
        assert!(matches!(mesh.add_element(element), Err(EngineError::NodeNotFound(NodeId(7)))));
    }

    #[test]
    fn test_element_coords() {
        let mut mesh = Mesh::new();
        let a = mesh.add_node(Node::new(0.0, 0.0, 0.0));
        let b = mesh.add_node(Node::new(1.0, 0.0, 0.0));
        let c = mesh.add_node(Node::new(0.0, 0.0, 1.0));
        let element = ShellElement::new(0, ShellTopology::Tri3([a, b, c]), 10.0, "S1", ParentKind::Slab);
        mesh.add_element(element.clone()).unwrap();
        let coords = mesh.element_coords(&element).unwrap();
        assert_eq!(coords[2], Vector3::new(0.0, 0.0, 1.0));
    }
}
