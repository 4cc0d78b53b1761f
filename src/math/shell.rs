//! Flat shell element math: membrane + Mindlin plate bending
//!
//! - quad4: bilinear isoparametric membrane (2x2 Gauss) and Mindlin bending
//!   (2x2 Gauss for curvature, 1-point reduced integration for shear)
//! - tri3: constant-strain membrane and linear Mindlin bending with
//!   1-point shear
//! - 6 DOFs per node: DX, DY, DZ, RX, RY, RZ; the drilling DOF (RZ) gets a
//!   weak spring so assembled structures stay non-singular
//!
//! Rotation sign convention (local frame):
//! - kappa_x  = d(ry)/dx
//! - kappa_y  = -d(rx)/dy
//! - kappa_xy = d(ry)/dy - d(rx)/dx
//! - gamma_xz = dw/dx + ry, gamma_yz = dw/dy - rx

use nalgebra::{DMatrix, DVector, SMatrix};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{LocalFrame, Mat18, Mat24, Mat3, Vec18, Vec24, Vec3};
use crate::elements::{Material, ShellElement, ShellTopology};
use crate::error::{EngineError, EngineResult};
use crate::mesh::Mesh;
use crate::results::MembraneStress;

type Mat8 = SMatrix<f64, 8, 8>;
type Mat12 = SMatrix<f64, 12, 12>;
type Mat6 = SMatrix<f64, 6, 6>;
type Mat9 = SMatrix<f64, 9, 9>;

/// Shear correction factor for a homogeneous rectangular cross-section
const SHEAR_CORRECTION: f64 = 5.0 / 6.0;

// Local DOF positions of the membrane (u, v) and bending (w, rx, ry) sub-blocks
const QUAD_MEMBRANE_DOFS: [usize; 8] = [0, 1, 6, 7, 12, 13, 18, 19];
const QUAD_BENDING_DOFS: [usize; 12] = [2, 3, 4, 8, 9, 10, 14, 15, 16, 20, 21, 22];
const TRI_MEMBRANE_DOFS: [usize; 6] = [0, 1, 6, 7, 12, 13];
const TRI_BENDING_DOFS: [usize; 9] = [2, 3, 4, 8, 9, 10, 14, 15, 16];

/// Membrane forces and bending moments per unit width, element local axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellForces {
    /// Membrane force along local x
    pub f11: f64,
    /// Membrane force along local y
    pub f22: f64,
    /// In-plane shear force
    pub f12: f64,
    /// Bending moment Mx
    pub m11: f64,
    /// Bending moment My
    pub m22: f64,
    /// Twisting moment Mxy
    pub m12: f64,
}

impl ShellForces {
    /// Average membrane stresses over the thickness
    pub fn membrane_stress(&self, thickness: f64) -> MembraneStress {
        MembraneStress::from_components(self.f11 / thickness, self.f22 / thickness, self.f12 / thickness)
    }
}

/// Plane stress constitutive matrix [Dm]
fn membrane_constitutive_matrix(e: f64, nu: f64) -> Mat3 {
    let c = e / (1.0 - nu * nu);
    Mat3::new(
        c,      nu * c, 0.0,
        nu * c, c,      0.0,
        0.0,    0.0,    c * (1.0 - nu) / 2.0,
    )
}

/// Plate bending rigidity matrix [Db]
fn bending_constitutive_matrix(e: f64, nu: f64, t: f64) -> Mat3 {
    let d = e * t.powi(3) / (12.0 * (1.0 - nu * nu));
    Mat3::new(
        d,      nu * d, 0.0,
        nu * d, d,      0.0,
        0.0,    0.0,    d * (1.0 - nu) / 2.0,
    )
}

/// Transverse shear rigidity kappa * G * t
fn shear_rigidity(e: f64, nu: f64, t: f64) -> f64 {
    SHEAR_CORRECTION * e / (2.0 * (1.0 + nu)) * t
}

fn check_properties(thickness: f64, e: f64, nu: f64) -> EngineResult<()> {
    if !(thickness > 0.0 && thickness.is_finite()) {
        return Err(EngineError::InvalidInput(format!("shell thickness must be positive, got {thickness}")));
    }
    if !(e > 0.0 && e.is_finite()) {
        return Err(EngineError::InvalidInput(format!("elastic modulus must be positive, got {e}")));
    }
    if !(-1.0..0.5).contains(&nu) {
        return Err(EngineError::InvalidInput(format!("Poisson's ratio {nu} out of range")));
    }
    Ok(())
}

/// Bilinear shape functions at natural coordinates (r, s)
fn shape_functions(r: f64, s: f64) -> [f64; 4] {
    [
        (1.0 - r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 - s) / 4.0,
        (1.0 + r) * (1.0 + s) / 4.0,
        (1.0 - r) * (1.0 + s) / 4.0,
    ]
}

/// Shape function derivatives in physical coordinates plus det(J)
///
/// J = [dx/dr dy/dr; dx/ds dy/ds], a non-positive determinant means the
/// element is inverted or collapsed at this point.
fn quad_derivatives(xy: &[[f64; 2]; 4], r: f64, s: f64) -> EngineResult<([f64; 4], [f64; 4], f64)> {
    let dn_dr = [-(1.0 - s) / 4.0, (1.0 - s) / 4.0, (1.0 + s) / 4.0, -(1.0 + s) / 4.0];
    let dn_ds = [-(1.0 - r) / 4.0, -(1.0 + r) / 4.0, (1.0 + r) / 4.0, (1.0 - r) / 4.0];

    let mut j = [[0.0; 2]; 2];
    for i in 0..4 {
        j[0][0] += dn_dr[i] * xy[i][0];
        j[0][1] += dn_dr[i] * xy[i][1];
        j[1][0] += dn_ds[i] * xy[i][0];
        j[1][1] += dn_ds[i] * xy[i][1];
    }
    let det = j[0][0] * j[1][1] - j[0][1] * j[1][0];
    if det <= 0.0 {
        return Err(EngineError::DegenerateGeometry(format!(
            "quad Jacobian determinant {det:.3e} at ({r:.3}, {s:.3})"
        )));
    }
    let j_inv = [[j[1][1] / det, -j[0][1] / det], [-j[1][0] / det, j[0][0] / det]];

    let mut dn_dx = [0.0; 4];
    let mut dn_dy = [0.0; 4];
    for i in 0..4 {
        dn_dx[i] = j_inv[0][0] * dn_dr[i] + j_inv[0][1] * dn_ds[i];
        dn_dy[i] = j_inv[1][0] * dn_dr[i] + j_inv[1][1] * dn_ds[i];
    }
    Ok((dn_dx, dn_dy, det))
}

/// Linear triangle derivatives (constant over the element) and area
fn tri_derivatives(xy: &[[f64; 2]; 3]) -> EngineResult<([f64; 3], [f64; 3], f64)> {
    let [[x1, y1], [x2, y2], [x3, y3]] = *xy;
    let two_a = (x2 - x1) * (y3 - y1) - (x3 - x1) * (y2 - y1);
    let scale = (x2 - x1).hypot(y2 - y1) + (x3 - x2).hypot(y3 - y2) + (x1 - x3).hypot(y1 - y3);
    if two_a <= 1e-12 * scale * scale {
        return Err(EngineError::DegenerateGeometry(format!("triangle area {:.3e}", two_a / 2.0)));
    }
    let dn_dx = [(y2 - y3) / two_a, (y3 - y1) / two_a, (y1 - y2) / two_a];
    let dn_dy = [(x3 - x2) / two_a, (x1 - x3) / two_a, (x2 - x1) / two_a];
    Ok((dn_dx, dn_dy, two_a / 2.0))
}

/// Membrane strain-displacement matrix, columns (u1, v1, u2, v2, ...)
fn membrane_b<const N: usize, const C: usize>(dn_dx: &[f64; N], dn_dy: &[f64; N]) -> SMatrix<f64, 3, C> {
    let mut b = SMatrix::<f64, 3, C>::zeros();
    for i in 0..N {
        b[(0, 2 * i)] = dn_dx[i];
        b[(1, 2 * i + 1)] = dn_dy[i];
        b[(2, 2 * i)] = dn_dy[i];
        b[(2, 2 * i + 1)] = dn_dx[i];
    }
    b
}

/// Curvature strain-displacement matrix, columns (w1, rx1, ry1, w2, ...)
fn curvature_b<const N: usize, const C: usize>(dn_dx: &[f64; N], dn_dy: &[f64; N]) -> SMatrix<f64, 3, C> {
    let mut b = SMatrix::<f64, 3, C>::zeros();
    for i in 0..N {
        let (rx, ry) = (3 * i + 1, 3 * i + 2);
        b[(0, ry)] = dn_dx[i];
        b[(1, rx)] = -dn_dy[i];
        b[(2, rx)] = -dn_dx[i];
        b[(2, ry)] = dn_dy[i];
    }
    b
}

/// Transverse shear strain-displacement matrix, columns (w1, rx1, ry1, w2, ...)
fn shear_b<const N: usize, const C: usize>(n: &[f64; N], dn_dx: &[f64; N], dn_dy: &[f64; N]) -> SMatrix<f64, 2, C> {
    let mut b = SMatrix::<f64, 2, C>::zeros();
    for i in 0..N {
        let (w, rx, ry) = (3 * i, 3 * i + 1, 3 * i + 2);
        b[(0, w)] = dn_dx[i];
        b[(0, ry)] = n[i];
        b[(1, w)] = dn_dy[i];
        b[(1, rx)] = -n[i];
    }
    b
}

fn scatter<const M: usize, const N: usize>(target: &mut SMatrix<f64, N, N>, block: &SMatrix<f64, M, M>, dofs: &[usize; M]) {
    for (i, &gi) in dofs.iter().enumerate() {
        for (j, &gj) in dofs.iter().enumerate() {
            target[(gi, gj)] += block[(i, j)];
        }
    }
}

/// Weak drilling spring: 1/1000 of the softest bending rotation stiffness
fn drilling_stiffness<const B: usize, const M: usize>(kb: &SMatrix<f64, B, B>, km: &SMatrix<f64, M, M>) -> f64 {
    let min_rot = (0..B)
        .filter(|i| i % 3 != 0)
        .map(|i| kb[(i, i)].abs())
        .filter(|&k| k > 1e-10)
        .fold(f64::MAX, f64::min);
    if min_rot == f64::MAX {
        let max_mem = (0..M).map(|i| km[(i, i)].abs()).fold(0.0_f64, f64::max);
        return max_mem / 100.0 / 1000.0;
    }
    min_rot / 1000.0
}

/// Local 24x24 stiffness of a quad4 shell element
///
/// `xy` are the in-plane local coordinates of the four nodes, counter-clockwise.
pub fn quad4_local_stiffness(xy: &[[f64; 2]; 4], thickness: f64, e: f64, nu: f64) -> EngineResult<Mat24> {
    check_properties(thickness, e, nu)?;
    let dm = membrane_constitutive_matrix(e, nu);
    let db = bending_constitutive_matrix(e, nu, thickness);
    let ds = shear_rigidity(e, nu, thickness);

    let gp = 1.0 / 3.0_f64.sqrt();
    let mut km = Mat8::zeros();
    let mut kb = Mat12::zeros();

    for (r, s) in [(-gp, -gp), (gp, -gp), (gp, gp), (-gp, gp)] {
        let (dn_dx, dn_dy, det) = quad_derivatives(xy, r, s)?;
        let bm: SMatrix<f64, 3, 8> = membrane_b(&dn_dx, &dn_dy);
        km += bm.transpose() * dm * bm * (thickness * det);
        let bk: SMatrix<f64, 3, 12> = curvature_b(&dn_dx, &dn_dy);
        kb += bk.transpose() * db * bk * det;
    }

    // Reduced 1-point shear integration at the centre, weight 4
    let (dn_dx, dn_dy, det) = quad_derivatives(xy, 0.0, 0.0)?;
    let bs: SMatrix<f64, 2, 12> = shear_b(&shape_functions(0.0, 0.0), &dn_dx, &dn_dy);
    kb += bs.transpose() * bs * (ds * det * 4.0);

    let mut k = Mat24::zeros();
    scatter(&mut k, &km, &QUAD_MEMBRANE_DOFS);
    scatter(&mut k, &kb, &QUAD_BENDING_DOFS);
    let k_rz = drilling_stiffness(&kb, &km);
    for node in 0..4 {
        k[(6 * node + 5, 6 * node + 5)] = k_rz;
    }
    Ok(k)
}

/// Local 18x18 stiffness of a tri3 shell element
pub fn tri3_local_stiffness(xy: &[[f64; 2]; 3], thickness: f64, e: f64, nu: f64) -> EngineResult<Mat18> {
    check_properties(thickness, e, nu)?;
    let (dn_dx, dn_dy, area) = tri_derivatives(xy)?;

    let bm: SMatrix<f64, 3, 6> = membrane_b(&dn_dx, &dn_dy);
    let km: Mat6 = bm.transpose() * membrane_constitutive_matrix(e, nu) * bm * (thickness * area);

    let bk: SMatrix<f64, 3, 9> = curvature_b(&dn_dx, &dn_dy);
    let bs: SMatrix<f64, 2, 9> = shear_b(&[1.0 / 3.0; 3], &dn_dx, &dn_dy);
    let kb: Mat9 = bk.transpose() * bending_constitutive_matrix(e, nu, thickness) * bk * area
        + bs.transpose() * bs * (shear_rigidity(e, nu, thickness) * area);

    let mut k = Mat18::zeros();
    scatter(&mut k, &km, &TRI_MEMBRANE_DOFS);
    scatter(&mut k, &kb, &TRI_BENDING_DOFS);
    let k_rz = drilling_stiffness(&kb, &km);
    for node in 0..3 {
        k[(6 * node + 5, 6 * node + 5)] = k_rz;
    }
    Ok(k)
}

/// Block-diagonal global-to-local transformation, 6 DOFs per node
///
/// Built from 2 * `nodes` copies of the frame's direction cosine matrix.
pub fn shell_transformation_matrix(frame: &LocalFrame, nodes: usize) -> DMatrix<f64> {
    let dir_cos = frame.rotation();
    let mut t = DMatrix::zeros(6 * nodes, 6 * nodes);
    for block in 0..2 * nodes {
        t.fixed_view_mut::<3, 3>(3 * block, 3 * block).copy_from(&dir_cos);
    }
    t
}

/// Element frame and in-plane local coordinates of its nodes
pub fn local_coordinates(mesh: &Mesh, element: &ShellElement) -> EngineResult<(LocalFrame, Vec<[f64; 2]>)> {
    let coords: Vec<Vec3> = mesh.element_coords(element)?;
    let frame = LocalFrame::from_points(&coords)?;
    let xy = coords.iter().map(|p| frame.to_local_2d(p)).collect();
    Ok((frame, xy))
}

/// Local stiffness of any mesh element (24x24 for quad4, 18x18 for tri3)
pub fn element_local_stiffness(mesh: &Mesh, element: &ShellElement, material: &Material) -> EngineResult<DMatrix<f64>> {
    let (_, xy) = local_coordinates(mesh, element)?;
    let (t, e, nu) = (element.thickness, material.e, material.nu);
    match element.topology {
        ShellTopology::Quad4(_) => {
            let k = quad4_local_stiffness(&[xy[0], xy[1], xy[2], xy[3]], t, e, nu)?;
            Ok(DMatrix::from_column_slice(24, 24, k.as_slice()))
        }
        ShellTopology::Tri3(_) => {
            let k = tri3_local_stiffness(&[xy[0], xy[1], xy[2]], t, e, nu)?;
            Ok(DMatrix::from_column_slice(18, 18, k.as_slice()))
        }
    }
}

/// Global-frame stiffness Tᵀ·K·T of a mesh element
pub fn element_global_stiffness(mesh: &Mesh, element: &ShellElement, material: &Material) -> EngineResult<DMatrix<f64>> {
    let (frame, _) = local_coordinates(mesh, element)?;
    let k = element_local_stiffness(mesh, element, material)?;
    let t = shell_transformation_matrix(&frame, element.topology.node_count());
    Ok(t.transpose() * k * t)
}

/// Global-frame stiffness of every element, in element order
///
/// Elements are independent, so the batch is spread over the rayon pool.
pub fn element_stiffnesses(mesh: &Mesh, material: &Material) -> EngineResult<Vec<DMatrix<f64>>> {
    let result: EngineResult<Vec<_>> = mesh
        .elements
        .par_iter()
        .map(|element| element_global_stiffness(mesh, element, material))
        .collect();
    if let Ok(ref matrices) = result {
        log::debug!("computed {} element stiffness matrices", matrices.len());
    }
    result
}

/// Membrane forces [f11, f22, f12] at natural point (r, s) of a quad4
pub fn quad_membrane_forces(
    xy: &[[f64; 2]; 4],
    displacements: &Vec24,
    thickness: f64,
    e: f64,
    nu: f64,
    r: f64,
    s: f64,
) -> EngineResult<[f64; 3]> {
    let (dn_dx, dn_dy, _) = quad_derivatives(xy, r, s)?;
    let b: SMatrix<f64, 3, 8> = membrane_b(&dn_dx, &dn_dy);
    let d = SMatrix::<f64, 8, 1>::from_fn(|i, _| displacements[QUAD_MEMBRANE_DOFS[i]]);
    let f = membrane_constitutive_matrix(e, nu) * (b * d) * thickness;
    Ok([f[0], f[1], f[2]])
}

/// Bending moments [Mx, My, Mxy] per unit width at natural point (r, s) of a quad4
pub fn quad_plate_moments(
    xy: &[[f64; 2]; 4],
    displacements: &Vec24,
    thickness: f64,
    e: f64,
    nu: f64,
    r: f64,
    s: f64,
) -> EngineResult<[f64; 3]> {
    let (dn_dx, dn_dy, _) = quad_derivatives(xy, r, s)?;
    let b: SMatrix<f64, 3, 12> = curvature_b(&dn_dx, &dn_dy);
    let d = SMatrix::<f64, 12, 1>::from_fn(|i, _| displacements[QUAD_BENDING_DOFS[i]]);
    let m = bending_constitutive_matrix(e, nu, thickness) * (b * d);
    Ok([m[0], m[1], m[2]])
}

fn tri_forces(xy: &[[f64; 2]; 3], displacements: &Vec18, thickness: f64, e: f64, nu: f64) -> EngineResult<ShellForces> {
    let (dn_dx, dn_dy, _) = tri_derivatives(xy)?;
    let bm: SMatrix<f64, 3, 6> = membrane_b(&dn_dx, &dn_dy);
    let dm = SMatrix::<f64, 6, 1>::from_fn(|i, _| displacements[TRI_MEMBRANE_DOFS[i]]);
    let f = membrane_constitutive_matrix(e, nu) * (bm * dm) * thickness;
    let bk: SMatrix<f64, 3, 9> = curvature_b(&dn_dx, &dn_dy);
    let db = SMatrix::<f64, 9, 1>::from_fn(|i, _| displacements[TRI_BENDING_DOFS[i]]);
    let m = bending_constitutive_matrix(e, nu, thickness) * (bk * db);
    Ok(ShellForces {
        f11: f[0],
        f22: f[1],
        f12: f[2],
        m11: m[0],
        m22: m[1],
        m12: m[2],
    })
}

/// Centroid forces of a mesh element from its global nodal displacements
///
/// `displacements` holds 6 global DOFs per element node, in topology order.
pub fn element_forces(
    mesh: &Mesh,
    element: &ShellElement,
    material: &Material,
    displacements: &DVector<f64>,
) -> EngineResult<ShellForces> {
    let dofs = element.topology.dof_count();
    if displacements.len() != dofs {
        return Err(EngineError::InvalidInput(format!(
            "expected {dofs} element displacements, got {}",
            displacements.len()
        )));
    }
    let (frame, xy) = local_coordinates(mesh, element)?;
    let local = shell_transformation_matrix(&frame, element.topology.node_count()) * displacements;
    let (t, e, nu) = (element.thickness, material.e, material.nu);

    match element.topology {
        ShellTopology::Quad4(_) => {
            let xy = [xy[0], xy[1], xy[2], xy[3]];
            let d = Vec24::from_column_slice(local.as_slice());
            let [f11, f22, f12] = quad_membrane_forces(&xy, &d, t, e, nu, 0.0, 0.0)?;
            let [m11, m22, m12] = quad_plate_moments(&xy, &d, t, e, nu, 0.0, 0.0)?;
            Ok(ShellForces { f11, f22, f12, m11, m22, m12 })
        }
        ShellTopology::Tri3(_) => {
            let d = Vec18::from_column_slice(local.as_slice());
            tri_forces(&[xy[0], xy[1], xy[2]], &d, t, e, nu)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Node, NodeId, ParentKind};
    use approx::assert_relative_eq;

    const E: f64 = 30_000.0;
    const NU: f64 = 0.2;
    const T: f64 = 200.0;

    fn rect(w: f64, h: f64) -> [[f64; 2]; 4] {
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    }

    fn skewed() -> [[f64; 2]; 4] {
        [[0.0, 0.0], [1200.0, 100.0], [1300.0, 900.0], [-100.0, 1000.0]]
    }

    fn assert_symmetric(k: &DMatrix<f64>) {
        let scale = k.amax();
        for i in 0..k.nrows() {
            for j in 0..k.ncols() {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1e-9 * scale);
            }
        }
    }

    #[test]
    fn test_quad_stiffness_symmetric_with_positive_diagonal() {
        for xy in [rect(1000.0, 1000.0), rect(2000.0, 500.0), skewed()] {
            let k = quad4_local_stiffness(&xy, T, E, NU).unwrap();
            let k = DMatrix::from_column_slice(24, 24, k.as_slice());
            assert_symmetric(&k);
            for i in 0..24 {
                assert!(k[(i, i)] > 0.0, "diagonal {i} is not positive");
            }
        }
    }

    #[test]
    fn test_tri_stiffness_symmetric_with_positive_diagonal() {
        let k = tri3_local_stiffness(&[[0.0, 0.0], [1000.0, 0.0], [300.0, 800.0]], T, E, NU).unwrap();
        let k = DMatrix::from_column_slice(18, 18, k.as_slice());
        assert_symmetric(&k);
        for i in 0..18 {
            assert!(k[(i, i)] > 0.0);
        }
    }

    #[test]
    fn test_rigid_translation_is_force_free() {
        let k = quad4_local_stiffness(&skewed(), T, E, NU).unwrap();
        for dof in 0..3 {
            let mut u = Vec24::zeros();
            for node in 0..4 {
                u[6 * node + dof] = 1.0;
            }
            let f = k * u;
            assert!(f.amax() < 1e-6 * k.amax(), "translation {dof} produced forces");
        }
    }

    #[test]
    fn test_drilling_spring_is_weak() {
        let k = quad4_local_stiffness(&rect(1000.0, 1000.0), T, E, NU).unwrap();
        assert!(k[(5, 5)] > 0.0);
        assert!(k[(5, 5)] < k[(3, 3)] / 100.0);
        assert_eq!(k[(5, 11)], 0.0);
    }

    #[test]
    fn test_inverted_quad_is_rejected() {
        let xy = [[0.0, 0.0], [0.0, 1000.0], [1000.0, 1000.0], [1000.0, 0.0]];
        assert!(matches!(
            quad4_local_stiffness(&xy, T, E, NU),
            Err(EngineError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_uniaxial_membrane_tension() {
        // u = eps * x, v = -nu * eps * y: pure uniaxial stress E * eps
        let eps = 1e-4;
        for xy in [rect(2000.0, 1000.0), skewed()] {
            let mut d = Vec24::zeros();
            for (i, p) in xy.iter().enumerate() {
                d[6 * i] = eps * p[0];
                d[6 * i + 1] = -NU * eps * p[1];
            }
            let f = quad_membrane_forces(&xy, &d, T, E, NU, 0.0, 0.0).unwrap();
            assert_relative_eq!(f[0], E * eps * T, max_relative = 1e-9);
            assert!(f[1].abs() < 1e-9 * f[0]);
            assert!(f[2].abs() < 1e-9 * f[0]);
        }
    }

    #[test]
    fn test_constant_curvature_moments() {
        // ry = kappa * x gives kappa_x = kappa everywhere
        let kappa = 1e-6;
        let d_plate = E * T.powi(3) / (12.0 * (1.0 - NU * NU));
        let xy = skewed();
        let mut d = Vec24::zeros();
        for (i, p) in xy.iter().enumerate() {
            d[6 * i + 4] = kappa * p[0];
        }
        for (r, s) in [(0.0, 0.0), (0.5, -0.5)] {
            let m = quad_plate_moments(&xy, &d, T, E, NU, r, s).unwrap();
            assert_relative_eq!(m[0], d_plate * kappa, max_relative = 1e-9);
            assert_relative_eq!(m[1], NU * d_plate * kappa, max_relative = 1e-9);
            assert!(m[2].abs() < 1e-9 * m[0]);
        }
    }

    #[test]
    fn test_transformation_is_orthogonal() {
        let pts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let frame = LocalFrame::from_points(&pts).unwrap();
        let t = shell_transformation_matrix(&frame, 4);
        assert_eq!(t.nrows(), 24);
        let identity = &t * t.transpose();
        assert_relative_eq!(identity, DMatrix::identity(24, 24), epsilon = 1e-12);
    }

    fn vertical_wall_element() -> (Mesh, ShellElement) {
        let mut mesh = Mesh::new();
        let ids: Vec<NodeId> = [(0.0, 0.0), (2000.0, 0.0), (2000.0, 1000.0), (0.0, 1000.0)]
            .iter()
            .map(|&(x, y)| mesh.add_node(Node::new(x, y, 0.0)))
            .collect();
        let element = ShellElement::new(
            0,
            ShellTopology::Quad4([ids[0], ids[1], ids[2], ids[3]]),
            T,
            "W1",
            ParentKind::Wall,
        );
        mesh.add_element(element.clone()).unwrap();
        (mesh, element)
    }

    #[test]
    fn test_element_forces_from_global_displacements() {
        let (mesh, element) = vertical_wall_element();
        let material = Material {
            e: E,
            nu: NU,
            ..Material::concrete(30.0)
        };
        let eps = 1e-4;
        let mut d = DVector::zeros(24);
        for (i, node) in mesh.nodes.iter().enumerate() {
            d[6 * i] = eps * node.x;
            d[6 * i + 1] = -NU * eps * node.y;
        }
        let forces = element_forces(&mesh, &element, &material, &d).unwrap();
        assert_relative_eq!(forces.f11, E * eps * T, max_relative = 1e-9);
        assert!(forces.m11.abs() < 1e-9);
        assert_relative_eq!(forces.membrane_stress(T).von_mises, E * eps, max_relative = 1e-6);
    }

    #[test]
    fn test_element_stiffnesses_parallel_matches_serial() {
        let (mesh, element) = vertical_wall_element();
        let material = Material::concrete(30.0);
        let batch = element_stiffnesses(&mesh, &material).unwrap();
        let single = element_global_stiffness(&mesh, &element, &material).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0], single);
        assert_symmetric(&single);
    }
}
