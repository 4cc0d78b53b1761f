//! Mathematical utilities for shell element calculations

pub mod shell;

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::error::{EngineError, EngineResult};

pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 24x24 matrix for quad4 stiffness
pub type Mat24 = SMatrix<f64, 24, 24>;
/// 24-element vector for quad4 forces/displacements
pub type Vec24 = SVector<f64, 24>;
/// 18x18 matrix for tri3 stiffness
pub type Mat18 = SMatrix<f64, 18, 18>;
/// 18-element vector for tri3 forces/displacements
pub type Vec18 = SVector<f64, 18>;

// Re-export shell functions
pub use shell::{
    element_forces, element_global_stiffness, element_local_stiffness, element_stiffnesses,
    local_coordinates, quad4_local_stiffness, quad_membrane_forces, quad_plate_moments,
    shell_transformation_matrix, tri3_local_stiffness, ShellForces,
};

/// Newell's polygon normal: the shoelace sums on the three coordinate planes
///
/// Its length is twice the polygon area, also for slightly warped polygons.
pub fn newell_normal(points: &[Vec3]) -> Vec3 {
    let n = points.len();
    let mut normal = Vec3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Planar area of a polygon given by its vertices in order
pub fn polygon_area(points: &[Vec3]) -> f64 {
    0.5 * newell_normal(points).norm()
}

/// Perimeter of a closed polygon
pub fn perimeter(points: &[Vec3]) -> f64 {
    let n = points.len();
    (0..n).map(|i| (points[(i + 1) % n] - points[i]).norm()).sum()
}

/// Right-handed element coordinate system
///
/// - x-axis: from the first node towards the second, projected onto the plane
/// - z-axis: polygon normal (Newell), following the node order
/// - y-axis: z cross x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub origin: Vec3,
    pub ex: Vec3,
    pub ey: Vec3,
    pub ez: Vec3,
}

impl LocalFrame {
    pub fn from_points(points: &[Vec3]) -> EngineResult<Self> {
        if points.len() < 3 {
            return Err(EngineError::topology("at least 3 element nodes", points.len()));
        }
        let scale = perimeter(points);
        let normal = newell_normal(points);
        if scale <= 0.0 || normal.norm() <= 1e-12 * scale * scale {
            return Err(EngineError::DegenerateGeometry("element has zero area".to_string()));
        }
        let ez = normal.normalize();
        let edge = points[1] - points[0];
        let in_plane = edge - ez * edge.dot(&ez);
        if in_plane.norm() <= 1e-12 * scale {
            return Err(EngineError::DegenerateGeometry(
                "first element edge has zero length".to_string(),
            ));
        }
        let ex = in_plane.normalize();
        let ey = ez.cross(&ex);
        Ok(Self {
            origin: points[0],
            ex,
            ey,
            ez,
        })
    }

    /// Direction cosine matrix, rows are the local axes in global components
    pub fn rotation(&self) -> Mat3 {
        Mat3::new(
            self.ex.x, self.ex.y, self.ex.z,
            self.ey.x, self.ey.y, self.ey.z,
            self.ez.x, self.ez.y, self.ez.z,
        )
    }

    /// In-plane local coordinates of a point
    pub fn to_local_2d(&self, p: &Vec3) -> [f64; 2] {
        let d = p - self.origin;
        [d.dot(&self.ex), d.dot(&self.ey)]
    }
}
