//! Shell element - tri3 or quad4 surface element of a wall or slab

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Element topology with its ordered node references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "nodes")]
pub enum ShellTopology {
    Tri3([NodeId; 3]),
    Quad4([NodeId; 4]),
}

impl ShellTopology {
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            ShellTopology::Tri3(n) => n,
            ShellTopology::Quad4(n) => n,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellTopology::Tri3(_) => "tri3",
            ShellTopology::Quad4(_) => "quad4",
        }
    }

    /// Degrees of freedom of the element (6 per node)
    pub fn dof_count(&self) -> usize {
        6 * self.node_count()
    }
}

/// Kind of the surface an element was meshed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentKind {
    Wall,
    Slab,
}

/// A shell element owned by a wall or slab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellElement {
    pub id: usize,
    pub topology: ShellTopology,
    pub thickness: f64,
    /// Material name
    #[serde(default)]
    pub material: Option<String>,
    /// Identifier of the parent wall or slab
    pub parent: String,
    pub parent_kind: ParentKind,
}

impl ShellElement {
    pub fn new(id: usize, topology: ShellTopology, thickness: f64, parent: &str, parent_kind: ParentKind) -> Self {
        Self {
            id,
            topology,
            thickness,
            material: None,
            parent: parent.to_string(),
            parent_kind,
        }
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }

    pub fn nodes(&self) -> &[NodeId] {
        self.topology.nodes()
    }

    pub fn is_quad(&self) -> bool {
        matches!(self.topology, ShellTopology::Quad4(_))
    }
}
