//! Element quality validation
//!
//! Degenerate elements are reported through `is_valid = false` instead of an
//! error so a batch over many elements is never aborted by one bad element.

use serde::{Deserialize, Serialize};

use super::Mesh;
use crate::analysis::MeshOptions;
use crate::elements::ShellElement;
use crate::error::{EngineError, EngineResult};
use crate::math::{newell_normal, perimeter, Vec3};

/// Relative tolerance for zero area / collinearity tests
const DEGENERACY_TOL: f64 = 1e-9;

/// Quality metrics of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    #[serde(default)]
    pub element_id: Option<usize>,
    pub is_valid: bool,
    /// Interior angles in degrees, one per vertex
    pub angles: Vec<f64>,
    /// Longer over shorter edge (pair, for quads)
    pub aspect_ratio: f64,
    pub area: f64,
    pub warnings: Vec<String>,
}

impl QualityReport {
    fn invalid(&mut self, message: String) {
        self.is_valid = false;
        self.warnings.push(message);
    }

    pub fn min_angle(&self) -> f64 {
        self.angles.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_angle(&self) -> f64 {
        self.angles.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Validate a quadrilateral given its corners in order
pub fn validate_quad(corners: &[Vec3; 4], options: &MeshOptions) -> QualityReport {
    let normal = newell_normal(corners);
    let scale = perimeter(corners);
    let area = 0.5 * normal.norm();
    let edges: Vec<f64> = (0..4).map(|i| (corners[(i + 1) % 4] - corners[i]).norm()).collect();

    let mut report = QualityReport {
        element_id: None,
        is_valid: true,
        angles: Vec::with_capacity(4),
        aspect_ratio: edge_pair_ratio(&edges),
        area,
        warnings: Vec::new(),
    };

    if scale <= 0.0 || area <= DEGENERACY_TOL * scale * scale {
        report.invalid(format!("Degenerate element: area {area:.3e} is effectively zero"));
        return report;
    }
    if let Some(i) = collinear_vertex(corners, scale) {
        report.invalid(format!(
            "Degenerate element: vertices {}, {}, {} are collinear",
            (i + 3) % 4,
            i,
            (i + 1) % 4
        ));
        return report;
    }

    let unit_normal = normal.normalize();
    for i in 0..4 {
        let prev = corners[(i + 3) % 4];
        let next = corners[(i + 1) % 4];
        let a = prev - corners[i];
        let b = next - corners[i];
        let mut angle = a.angle(&b).to_degrees();
        // Reflex corner when the turn at this vertex opposes the element normal
        if (corners[i] - prev).cross(&(next - corners[i])).dot(&unit_normal) < 0.0 {
            angle = 360.0 - angle;
        }
        report.angles.push(angle);
    }

    if report.aspect_ratio > options.max_aspect_ratio {
        report.warnings.push(format!(
            "High aspect ratio {:.2} exceeds {:.1}",
            report.aspect_ratio, options.max_aspect_ratio
        ));
    }
    let (min_deg, max_deg) = options.quad_angle_limits;
    if report.max_angle() >= 180.0 {
        report.warnings.push(format!("Concave quad: corner of {:.1} degrees", report.max_angle()));
    } else if report.min_angle() < min_deg || report.max_angle() > max_deg {
        report.warnings.push(format!(
            "Distorted quad: angles {:.1}..{:.1} degrees outside [{min_deg:.0}, {max_deg:.0}]",
            report.min_angle(),
            report.max_angle()
        ));
    }
    report
}

/// Validate a triangle given its corners in order
pub fn validate_triangle(corners: &[Vec3; 3], options: &MeshOptions) -> QualityReport {
    let a = (corners[2] - corners[1]).norm();
    let b = (corners[0] - corners[2]).norm();
    let c = (corners[1] - corners[0]).norm();
    let scale = a + b + c;
    let area = 0.5 * (corners[1] - corners[0]).cross(&(corners[2] - corners[0])).norm();
    let shortest = a.min(b).min(c);

    let mut report = QualityReport {
        element_id: None,
        is_valid: true,
        angles: Vec::with_capacity(3),
        aspect_ratio: if shortest > 0.0 { a.max(b).max(c) / shortest } else { f64::INFINITY },
        area,
        warnings: Vec::new(),
    };

    if scale <= 0.0 || area <= DEGENERACY_TOL * scale * scale {
        report.invalid("Degenerate element: triangle vertices are collinear".to_string());
        return report;
    }

    // Law of cosines, angle opposite each side
    report.angles = vec![
        law_of_cosines(a, b, c),
        law_of_cosines(b, c, a),
        law_of_cosines(c, a, b),
    ];

    if report.min_angle() < options.min_triangle_angle {
        report.warnings.push(format!(
            "Sliver triangle: minimum angle {:.1} degrees below {:.0}",
            report.min_angle(),
            options.min_triangle_angle
        ));
    }
    if report.max_angle() > options.max_triangle_angle {
        report.warnings.push(format!(
            "Obtuse triangle: maximum angle {:.1} degrees above {:.0}",
            report.max_angle(),
            options.max_triangle_angle
        ));
    }
    report
}

/// Validate one mesh element
pub fn validate_element(mesh: &Mesh, element: &ShellElement, options: &MeshOptions) -> EngineResult<QualityReport> {
    let coords = mesh.element_coords(element)?;
    let mut report = match coords.as_slice() {
        [a, b, c] => validate_triangle(&[*a, *b, *c], options),
        [a, b, c, d] => validate_quad(&[*a, *b, *c, *d], options),
        other => return Err(EngineError::topology("3 or 4 element nodes", other.len())),
    };
    report.element_id = Some(element.id);
    Ok(report)
}

/// Validate every element of a mesh
pub fn mesh_quality(mesh: &Mesh, options: &MeshOptions) -> EngineResult<Vec<QualityReport>> {
    mesh.elements
        .iter()
        .map(|element| validate_element(mesh, element, options))
        .collect()
}

/// Angle in degrees opposite side `opposite`
fn law_of_cosines(opposite: f64, s1: f64, s2: f64) -> f64 {
    let cos = (s1 * s1 + s2 * s2 - opposite * opposite) / (2.0 * s1 * s2);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

fn edge_pair_ratio(edges: &[f64]) -> f64 {
    let pair_a = 0.5 * (edges[0] + edges[2]);
    let pair_b = 0.5 * (edges[1] + edges[3]);
    let (long, short) = if pair_a > pair_b { (pair_a, pair_b) } else { (pair_b, pair_a) };
    if short > 0.0 {
        long / short
    } else {
        f64::INFINITY
    }
}

/// First vertex whose two adjacent edges are collinear (or of zero length)
fn collinear_vertex(corners: &[Vec3; 4], scale: f64) -> Option<usize> {
    (0..4).find(|&i| {
        let a = corners[i] - corners[(i + 3) % 4];
        let b = corners[(i + 1) % 4] - corners[i];
        let (la, lb) = (a.norm(), b.norm());
        la <= DEGENERACY_TOL * scale
            || lb <= DEGENERACY_TOL * scale
            || a.cross(&b).norm() <= DEGENERACY_TOL * la * lb
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn v(x: f64, y: f64) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    #[test]
    fn test_square_is_valid() {
        let r = validate_quad(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)], &MeshOptions::default());
        assert!(r.is_valid);
        assert!(r.warnings.is_empty());
        assert_relative_eq!(r.aspect_ratio, 1.0);
        for angle in &r.angles {
            assert_relative_eq!(*angle, 90.0, epsilon = 1e-9);
        }
        assert_relative_eq!(r.angles.iter().sum::<f64>(), 360.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duplicate_corner_is_degenerate() {
        let r = validate_quad(&[v(0.0, 0.0), v(1.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], &MeshOptions::default());
        assert!(!r.is_valid);
        assert!(r.warnings.iter().any(|w| w.contains("Degenerate")));
    }

    #[test]
    fn test_collinear_corners_are_degenerate() {
        let r = validate_quad(&[v(0.0, 0.0), v(1.0, 0.0), v(2.0, 0.0), v(0.0, 1.0)], &MeshOptions::default());
        assert!(!r.is_valid);
        assert!(r.warnings[0].contains("Degenerate"));
    }

    #[test]
    fn test_slender_quad_warns_but_stays_valid() {
        let r = validate_quad(&[v(0.0, 0.0), v(20.0, 0.0), v(20.0, 1.0), v(0.0, 1.0)], &MeshOptions::default());
        assert!(r.is_valid);
        assert_relative_eq!(r.aspect_ratio, 20.0);
        assert!(r.warnings.iter().any(|w| w.contains("aspect ratio")));
    }

    #[test]
    fn test_skewed_quad_warns_on_angles() {
        let r = validate_quad(&[v(0.0, 0.0), v(1.0, 0.0), v(2.0, 1.0), v(1.0, 1.0)], &MeshOptions::default());
        assert!(r.is_valid);
        assert_relative_eq!(r.min_angle(), 45.0, epsilon = 1e-9);
        assert!(r.warnings.iter().any(|w| w.contains("Distorted")));
    }

    #[test]
    fn test_concave_quad_only_warns() {
        let r = validate_quad(&[v(0.0, 0.0), v(2.0, 0.0), v(0.5, 0.5), v(0.0, 2.0)], &MeshOptions::default());
        assert!(r.is_valid);
        assert!(r.max_angle() > 180.0);
        assert_eq!(r.warnings.len(), 1);
        assert!(r.warnings[0].starts_with("Concave quad"));
    }

    #[test]
    fn test_triangle_angles() {
        let r = validate_triangle(&[v(0.0, 0.0), v(1.0, 0.0), v(0.0, 1.0)], &MeshOptions::default());
        assert!(r.is_valid);
        assert_relative_eq!(r.angles.iter().sum::<f64>(), 180.0, epsilon = 1e-9);
        assert_relative_eq!(r.max_angle(), 90.0, epsilon = 1e-9);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_sliver_triangle() {
        let r = validate_triangle(&[v(0.0, 0.0), v(10.0, 0.0), v(5.0, 0.2)], &MeshOptions::default());
        assert!(r.is_valid);
        assert!(r.warnings.iter().any(|w| w.contains("Sliver")));
        assert!(r.warnings.iter().any(|w| w.contains("Obtuse")));
    }

    #[test]
    fn test_collinear_triangle_is_invalid() {
        let r = validate_triangle(&[v(0.0, 0.0), v(1.0, 0.0), v(3.0, 0.0)], &MeshOptions::default());
        assert!(!r.is_valid);
        assert!(r.warnings[0].contains("Degenerate"));
    }
}
