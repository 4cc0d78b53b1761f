//! Structured quad4 meshing of planar wall panels

use serde::{Deserialize, Serialize};

use super::{check_mesh_size, edge_divisions, log_quality, Mesh};
use crate::analysis::MeshOptions;
use crate::elements::{Node, NodeId, ParentKind, ShellElement, ShellTopology};
use crate::error::{EngineError, EngineResult};

/// Wall panel described by its four corners
///
/// Corners are ordered around the panel: bottom-start, bottom-end,
/// top-end, top-start for a vertical wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallGeometry {
    pub id: String,
    pub corners: Vec<Node>,
    pub thickness: f64,
    #[serde(default)]
    pub material: Option<String>,
}

impl WallGeometry {
    pub fn new(id: &str, corners: Vec<Node>, thickness: f64) -> Self {
        Self {
            id: id.to_string(),
            corners,
            thickness,
            material: None,
        }
    }

    /// Vertical rectangular wall in the X-Y plane starting at (x0, y0, z)
    pub fn rectangle(id: &str, x0: f64, y0: f64, z: f64, length: f64, height: f64, thickness: f64) -> Self {
        Self::new(
            id,
            vec![
                Node::new(x0, y0, z),
                Node::new(x0 + length, y0, z),
                Node::new(x0 + length, y0 + height, z),
                Node::new(x0, y0 + height, z),
            ],
            thickness,
        )
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }
}

/// Generate a structured quad4 mesh over a four-corner wall panel
///
/// The panel is mapped bilinearly from the unit square, with
/// `nx = max(1, round(|c1 - c0| / size))` divisions along the first edge and
/// `ny = max(1, round(|c2 - c1| / size))` along the second. Nodes are emitted
/// row by row, elements in row-major order with counter-clockwise
/// connectivity matching the corner order.
pub fn generate_wall_mesh(wall: &WallGeometry, options: &MeshOptions) -> EngineResult<Mesh> {
    if wall.corners.len() != 4 {
        return Err(EngineError::topology("4 wall corners", wall.corners.len()));
    }
    check_mesh_size(options)?;

    let c: Vec<_> = wall.corners.iter().map(Node::position).collect();
    let edge_u = (c[1] - c[0]).norm();
    let edge_v = (c[2] - c[1]).norm();
    let nx = edge_divisions((edge_u / options.mesh_size).round())?;
    let ny = edge_divisions((edge_v / options.mesh_size).round())?;

    let mut mesh = Mesh::new();
    for j in 0..=ny {
        let t = j as f64 / ny as f64;
        for i in 0..=nx {
            let s = i as f64 / nx as f64;
            let p = c[0] * ((1.0 - s) * (1.0 - t))
                + c[1] * (s * (1.0 - t))
                + c[2] * (s * t)
                + c[3] * ((1.0 - s) * t);
            mesh.add_node(Node::new(p.x, p.y, p.z));
        }
    }

    let row = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let n1 = j * row + i;
            let nodes = [NodeId(n1), NodeId(n1 + 1), NodeId(n1 + row + 1), NodeId(n1 + row)];
            let mut element = ShellElement::new(
                mesh.element_count(),
                ShellTopology::Quad4(nodes),
                wall.thickness,
                &wall.id,
                ParentKind::Wall,
            );
            element.material = wall.material.clone();
            mesh.add_element(element)?;
        }
    }

    log::debug!(
        "wall {}: {}x{} divisions, {} nodes, {} elements",
        wall.id,
        nx,
        ny,
        mesh.node_count(),
        mesh.element_count()
    );
    log_quality(&mesh, options)?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wall_counts() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 5000.0, 3000.0, 200.0);
        let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
        assert_eq!(mesh.node_count(), 24);
        assert_eq!(mesh.element_count(), 15);
    }

    #[test]
    fn test_small_wall_gets_one_element() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 300.0, 200.0, 200.0);
        let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.element_count(), 1);
    }

    #[test]
    fn test_wall_nodes_interpolate_corners() {
        let wall = WallGeometry::rectangle("W1", 1000.0, 0.0, 500.0, 4000.0, 2000.0, 200.0);
        let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
        // 5 nodes per row, 3 rows
        let top_start = &mesh.nodes[10];
        assert_relative_eq!(top_start.x, 1000.0);
        assert_relative_eq!(top_start.y, 2000.0);
        let last = mesh.nodes.last().unwrap();
        assert_relative_eq!(last.x, 5000.0);
        assert_relative_eq!(mesh.nodes[2].x, 3000.0);
        assert!(mesh.nodes.iter().all(|n| n.z == 500.0));
    }

    #[test]
    fn test_wall_connectivity_row_major() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 2000.0, 2000.0, 200.0);
        let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
        assert_eq!(
            mesh.elements[1].topology,
            ShellTopology::Quad4([NodeId(1), NodeId(2), NodeId(5), NodeId(4)])
        );
        assert!(mesh.elements.iter().all(|e| e.parent == "W1" && e.parent_kind == ParentKind::Wall));
    }

    #[test]
    fn test_wall_meshing_is_deterministic() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 5300.0, 2900.0, 200.0);
        let options = MeshOptions::new(750.0);
        let a = generate_wall_mesh(&wall, &options).unwrap();
        let b = generate_wall_mesh(&wall, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_requires_four_corners() {
        let mut wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 5000.0, 3000.0, 200.0);
        wall.corners.pop();
        let err = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTopology { found: 3, .. }));
    }

    #[test]
    fn test_wall_rejects_zero_mesh_size() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 5000.0, 3000.0, 200.0);
        assert!(matches!(
            generate_wall_mesh(&wall, &MeshOptions::new(0.0)),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_wall_rejects_tiny_mesh_size() {
        let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 5000.0, 3000.0, 200.0);
        let err = generate_wall_mesh(&wall, &MeshOptions::new(1e-9)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        // Exactly at the cap is still accepted
        let strip = WallGeometry::rectangle("W2", 0.0, 0.0, 0.0, 5000.0, 10.0, 200.0);
        let mesh = generate_wall_mesh(&strip, &MeshOptions::new(5.0).without_quality_check()).unwrap();
        assert_eq!(mesh.element_count(), 1000 * 2);
    }
}
