//! Uniform area loads on shell elements

use serde::{Deserialize, Serialize};

use super::{LoadFrame, NodalForce};
use crate::elements::{ShellElement, ShellTopology};
use crate::error::{EngineError, EngineResult};
use crate::math::{local_coordinates, polygon_area, LocalFrame, Vec3};
use crate::mesh::Mesh;

/// Direction of a surface load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Pressure acting along the negative element normal
    #[default]
    Gravity,
    /// Pressure along the positive element normal
    LocalZ,
    /// Force per area in global X direction
    GlobalX,
    /// Force per area in global Y direction
    GlobalY,
    /// Force per area in global Z direction
    GlobalZ,
}

impl LoadDirection {
    /// Unit direction and the frame it is expressed in
    fn unit(self) -> (Vec3, LoadFrame) {
        match self {
            LoadDirection::Gravity => (-Vec3::z(), LoadFrame::Local),
            LoadDirection::LocalZ => (Vec3::z(), LoadFrame::Local),
            LoadDirection::GlobalX => (Vec3::x(), LoadFrame::Global),
            LoadDirection::GlobalY => (Vec3::y(), LoadFrame::Global),
            LoadDirection::GlobalZ => (Vec3::z(), LoadFrame::Global),
        }
    }
}

/// How the total element load is split between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Distribution {
    /// Equal share per node
    #[default]
    Lumped,
    /// Work-equivalent forces from the element shape functions
    Consistent,
}

/// A uniform surface load (force per unit area)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaLoad {
    /// Load intensity, force per unit area
    pub intensity: f64,
    pub direction: LoadDirection,
    #[serde(default)]
    pub distribution: Distribution,
    /// Load case
    pub case: String,
}

impl AreaLoad {
    pub fn new(intensity: f64, direction: LoadDirection, case: &str) -> Self {
        Self {
            intensity,
            direction,
            distribution: Distribution::Lumped,
            case: case.to_string(),
        }
    }

    /// Downward pressure on the element, e.g. self weight or superimposed dead load
    pub fn gravity(intensity: f64, case: &str) -> Self {
        Self::new(intensity.abs(), LoadDirection::Gravity, case)
    }

    pub fn consistent(mut self) -> Self {
        self.distribution = Distribution::Consistent;
        self
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            intensity: self.intensity * factor,
            ..self.clone()
        }
    }
}

/// Distribute an area load on one element to its nodes
///
/// The nodal forces sum to `intensity * area` along the load direction.
/// Components are in element local axes for `Gravity`/`LocalZ` and in
/// global axes for the `Global*` directions.
pub fn distribute_area_load(mesh: &Mesh, element: &ShellElement, load: &AreaLoad) -> EngineResult<Vec<NodalForce>> {
    let coords = mesh.element_coords(element)?;
    let (unit, frame) = load.direction.unit();

    let weights: Vec<f64> = match (load.distribution, element.topology) {
        (Distribution::Consistent, ShellTopology::Quad4(_)) => {
            let (_, xy) = local_coordinates(mesh, element)?;
            quad_consistent_areas(&[xy[0], xy[1], xy[2], xy[3]])?
        }
        _ => {
            let area = polygon_area(&coords);
            if area <= 0.0 {
                return Err(EngineError::DegenerateGeometry(format!(
                    "element {} has zero area",
                    element.id
                )));
            }
            let n = coords.len() as f64;
            vec![area / n; coords.len()]
        }
    };

    Ok(element
        .nodes()
        .iter()
        .zip(weights)
        .map(|(&node, tributary)| NodalForce::new(node, unit * (load.intensity * tributary), frame))
        .collect())
}

/// Tributary area of each quad node, the integral of N_i over the element
///
/// 2x2 Gauss is exact for the bilinear integrand N_i * det(J).
fn quad_consistent_areas(xy: &[[f64; 2]; 4]) -> EngineResult<Vec<f64>> {
    let gp = 1.0 / 3.0_f64.sqrt();
    let mut areas = vec![0.0; 4];
    for (r, s) in [(-gp, -gp), (gp, -gp), (gp, gp), (-gp, gp)] {
        let n = [
            (1.0 - r) * (1.0 - s) / 4.0,
            (1.0 + r) * (1.0 - s) / 4.0,
            (1.0 + r) * (1.0 + s) / 4.0,
            (1.0 - r) * (1.0 + s) / 4.0,
        ];
        let dn_dr = [-(1.0 - s) / 4.0, (1.0 - s) / 4.0, (1.0 + s) / 4.0, -(1.0 + s) / 4.0];
        let dn_ds = [-(1.0 - r) / 4.0, -(1.0 + r) / 4.0, (1.0 + r) / 4.0, (1.0 - r) / 4.0];
        let (mut x_r, mut y_r, mut x_s, mut y_s) = (0.0, 0.0, 0.0, 0.0);
        for i in 0..4 {
            x_r += dn_dr[i] * xy[i][0];
            y_r += dn_dr[i] * xy[i][1];
            x_s += dn_ds[i] * xy[i][0];
            y_s += dn_ds[i] * xy[i][1];
        }
        let det = x_r * y_s - y_r * x_s;
        if det <= 0.0 {
            return Err(EngineError::DegenerateGeometry(format!(
                "quad Jacobian determinant {det:.3e} in load distribution"
            )));
        }
        for i in 0..4 {
            areas[i] += n[i] * det;
        }
    }
    Ok(areas)
}

/// Total global force at every mesh node from an area load on all elements
///
/// Indexed by node id; local-direction loads are rotated out of each
/// element's own frame before summation.
pub fn mesh_nodal_forces(mesh: &Mesh, load: &AreaLoad) -> EngineResult<Vec<Vec3>> {
    let mut totals = vec![Vec3::zeros(); mesh.node_count()];
    for element in &mesh.elements {
        let coords = mesh.element_coords(element)?;
        let frame = LocalFrame::from_points(&coords)?;
        for force in distribute_area_load(mesh, element, load)? {
            totals[force.node.index()] += force.to_global(&frame).vector();
        }
    }
    log::debug!(
        "distributed {} load {} over {} elements",
        load.case,
        load.intensity,
        mesh.element_count()
    );
    Ok(totals)
}
