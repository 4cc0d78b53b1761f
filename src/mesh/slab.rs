//! Tri3 meshing of slab outlines with openings
//!
//! The outline is projected onto its dominant coordinate plane and
//! triangulated by ear clipping. Openings are spliced into the outline
//! through a bridge edge first, so the clipper only ever sees one simple
//! polygon. A simple n-gon without openings yields n - 2 triangles.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{check_mesh_size, edge_divisions, log_quality, Mesh};
use crate::analysis::MeshOptions;
use crate::elements::{Node, NodeId, ParentKind, ShellElement, ShellTopology};
use crate::error::{EngineError, EngineResult};
use crate::math::{newell_normal, Vec3};

type Point2 = [f64; 2];

/// Slab outline with optional openings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabGeometry {
    pub id: String,
    /// Outline vertices in order (either winding)
    pub boundary: Vec<Node>,
    /// Hole outlines, each in order
    #[serde(default)]
    pub openings: Vec<Vec<Node>>,
    pub thickness: f64,
    #[serde(default)]
    pub material: Option<String>,
    /// Subdivide the triangulation so no edge exceeds the mesh size
    #[serde(default)]
    pub refine: bool,
}

impl SlabGeometry {
    pub fn new(id: &str, boundary: Vec<Node>, thickness: f64) -> Self {
        Self {
            id: id.to_string(),
            boundary,
            openings: Vec::new(),
            thickness,
            material: None,
            refine: false,
        }
    }

    /// Horizontal rectangular slab at elevation `y`, wound with its normal along +Y
    pub fn rectangle(id: &str, x0: f64, z0: f64, y: f64, width: f64, depth: f64, thickness: f64) -> Self {
        Self::new(
            id,
            vec![
                Node::new(x0, y, z0),
                Node::new(x0, y, z0 + depth),
                Node::new(x0 + width, y, z0 + depth),
                Node::new(x0 + width, y, z0),
            ],
            thickness,
        )
    }

    pub fn with_opening(mut self, opening: Vec<Node>) -> Self {
        self.openings.push(opening);
        self
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material = Some(material.to_string());
        self
    }

    pub fn refined(mut self) -> Self {
        self.refine = true;
        self
    }
}

/// Generate a tri3 mesh over a slab outline
///
/// Triangles are wound so every element normal points along the positive
/// dominant axis, whatever the order of the outline. A horizontal slab
/// therefore always faces +Y and gravity loads act downward.
pub fn generate_slab_mesh(slab: &SlabGeometry, options: &MeshOptions) -> EngineResult<Mesh> {
    if slab.boundary.len() < 3 {
        return Err(EngineError::topology("at least 3 slab boundary nodes", slab.boundary.len()));
    }
    if let Some(opening) = slab.openings.iter().find(|o| o.len() < 3) {
        return Err(EngineError::topology("at least 3 opening nodes", opening.len()));
    }
    check_mesh_size(options)?;

    let boundary: Vec<Vec3> = slab.boundary.iter().map(Node::position).collect();
    let plane = DominantPlane::of(&newell_normal(&boundary))?;

    // All outline and opening vertices, boundary first
    let positions: Vec<Vec3> = slab
        .boundary
        .iter()
        .chain(slab.openings.iter().flatten())
        .map(Node::position)
        .collect();
    let points: Vec<Point2> = positions.iter().map(|p| plane.project(p)).collect();

    let n_outer = slab.boundary.len();
    let mut outer: Vec<usize> = (0..n_outer).collect();
    if signed_area(&points, &outer) < 0.0 {
        outer.reverse();
    }

    let mut holes = Vec::with_capacity(slab.openings.len());
    let mut offset = n_outer;
    for opening in &slab.openings {
        let mut hole: Vec<usize> = (offset..offset + opening.len()).collect();
        if signed_area(&points, &hole) > 0.0 {
            hole.reverse();
        }
        offset += opening.len();
        check_opening_inside(&points, &outer, &hole)?;
        holes.push(hole);
    }

    let polygon = bridge_holes(&points, outer, holes)?;
    let mut triangles = ear_clip(&points, polygon)?;

    let mut mesh = Mesh::new();
    for p in &positions {
        mesh.add_node(Node::new(p.x, p.y, p.z));
    }
    if slab.refine {
        triangles = refine(&mut mesh, &triangles, options.mesh_size)?;
    }
    for tri in triangles {
        let mut element = ShellElement::new(
            mesh.element_count(),
            ShellTopology::Tri3([NodeId(tri[0]), NodeId(tri[1]), NodeId(tri[2])]),
            slab.thickness,
            &slab.id,
            ParentKind::Slab,
        );
        element.material = slab.material.clone();
        mesh.add_element(element)?;
    }

    log::debug!(
        "slab {}: {} openings, {} nodes, {} elements",
        slab.id,
        slab.openings.len(),
        mesh.node_count(),
        mesh.element_count()
    );
    log_quality(&mesh, options)?;
    Ok(mesh)
}

/// Coordinate plane the outline is projected onto
#[derive(Debug, Clone, Copy)]
enum DominantPlane {
    /// Normal along X, project to (y, z)
    Yz,
    /// Normal along Y, project to (z, x)
    Zx,
    /// Normal along Z, project to (x, y)
    Xy,
}

impl DominantPlane {
    fn of(normal: &Vec3) -> EngineResult<Self> {
        let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        if ax.max(ay).max(az) <= 0.0 {
            return Err(EngineError::DegenerateGeometry(
                "slab boundary has zero area".to_string(),
            ));
        }
        Ok(if ax >= ay && ax >= az {
            DominantPlane::Yz
        } else if ay >= az {
            DominantPlane::Zx
        } else {
            DominantPlane::Xy
        })
    }

    /// Cyclic axis order keeps the projection orientation-preserving
    fn project(self, p: &Vec3) -> Point2 {
        match self {
            DominantPlane::Yz => [p.y, p.z],
            DominantPlane::Zx => [p.z, p.x],
            DominantPlane::Xy => [p.x, p.y],
        }
    }
}

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn signed_area(points: &[Point2], polygon: &[usize]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = points[polygon[i]];
            let b = points[polygon[(i + 1) % n]];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f64>()
        * 0.5
}

fn same_point(a: Point2, b: Point2) -> bool {
    a[0] == b[0] && a[1] == b[1]
}

/// Proper crossing of segments p1-p2 and q1-q2 (shared endpoints excluded)
fn segments_cross(p1: Point2, p2: Point2, q1: Point2, q2: Point2) -> bool {
    if same_point(p1, q1) || same_point(p1, q2) || same_point(p2, q1) || same_point(p2, q2) {
        return false;
    }
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0) && d1 != 0.0 && d2 != 0.0 && d3 != 0.0 && d4 != 0.0
}

fn ring_edges(ring: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
}

/// Splice every hole into the outer ring through a mutually visible vertex pair
///
/// Holes are processed right to left by their rightmost vertex.
fn bridge_holes(points: &[Point2], mut outer: Vec<usize>, mut holes: Vec<Vec<usize>>) -> EngineResult<Vec<usize>> {
    let rightmost = |hole: &[usize]| -> usize {
        let mut best = 0;
        for (k, &idx) in hole.iter().enumerate() {
            if points[idx][0] > points[hole[best]][0] {
                best = k;
            }
        }
        best
    };
    holes.sort_by(|a, b| {
        let xa = points[a[rightmost(a)]][0];
        let xb = points[b[rightmost(b)]][0];
        xb.total_cmp(&xa)
    });

    for h in 0..holes.len() {
        let hole = &holes[h];
        let mi = rightmost(hole);
        let m = points[hole[mi]];

        let mut candidates: Vec<usize> = (0..outer.len()).collect();
        candidates.sort_by(|&a, &b| {
            let da = dist2(points[outer[a]], m);
            let db = dist2(points[outer[b]], m);
            da.total_cmp(&db)
        });

        let visible = candidates.into_iter().find(|&vi| {
            let v = points[outer[vi]];
            let blocked_by = |ring: &[usize]| ring_edges(ring).any(|(a, b)| segments_cross(m, v, points[a], points[b]));
            !blocked_by(&outer) && !holes[h..].iter().any(|other| blocked_by(other))
        });
        let vi = visible.ok_or_else(|| {
            EngineError::DegenerateGeometry("slab opening is not inside the boundary".to_string())
        })?;

        let mut merged = Vec::with_capacity(outer.len() + hole.len() + 2);
        merged.extend_from_slice(&outer[..=vi]);
        merged.extend_from_slice(&hole[mi..]);
        merged.extend_from_slice(&hole[..=mi]);
        merged.push(outer[vi]);
        merged.extend_from_slice(&outer[vi + 1..]);
        outer = merged;
    }
    Ok(outer)
}

/// Even-odd test, points exactly on an edge count as outside
fn point_in_polygon(points: &[Point2], ring: &[usize], p: Point2) -> bool {
    let mut inside = false;
    for (a, b) in ring_edges(ring) {
        let (a, b) = (points[a], points[b]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let t = (p[1] - a[1]) / (b[1] - a[1]);
            if p[0] < a[0] + t * (b[0] - a[0]) {
                inside = !inside;
            }
        }
    }
    inside
}

/// Reject openings that leave the outer ring or cut across it
fn check_opening_inside(points: &[Point2], outer: &[usize], hole: &[usize]) -> EngineResult<()> {
    let outside = hole.iter().any(|&v| !point_in_polygon(points, outer, points[v]));
    let crossing = ring_edges(hole).any(|(a, b)| {
        ring_edges(outer).any(|(c, d)| segments_cross(points[a], points[b], points[c], points[d]))
    });
    if outside || crossing {
        return Err(EngineError::DegenerateGeometry(
            "slab opening is not inside the boundary".to_string(),
        ));
    }
    Ok(())
}

fn dist2(a: Point2, b: Point2) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

/// Ear clipping of a counter-clockwise simple polygon
fn ear_clip(points: &[Point2], mut polygon: Vec<usize>) -> EngineResult<Vec<[usize; 3]>> {
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));

    while polygon.len() > 3 {
        let n = polygon.len();
        let ear = (0..n).find(|&i| {
            let (ia, ib, ic) = (polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n]);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            if cross(a, b, c) <= 0.0 {
                return false;
            }
            !polygon.iter().any(|&k| {
                let p = points[k];
                !same_point(p, a) && !same_point(p, b) && !same_point(p, c) && point_in_triangle(p, a, b, c)
            })
        });

        match ear {
            Some(i) => {
                triangles.push([polygon[(i + n - 1) % n], polygon[i], polygon[(i + 1) % n]]);
                polygon.remove(i);
            }
            None => {
                // Only straight-angle vertices left: drop one, it bounds no area
                if let Some(i) = (0..n).find(|&i| {
                    cross(points[polygon[(i + n - 1) % n]], points[polygon[i]], points[polygon[(i + 1) % n]]) == 0.0
                }) {
                    polygon.remove(i);
                } else {
                    return Err(EngineError::DegenerateGeometry(
                        "slab boundary is self-intersecting".to_string(),
                    ));
                }
            }
        }
    }

    if polygon.len() == 3 && cross(points[polygon[0]], points[polygon[1]], points[polygon[2]]) > 0.0 {
        triangles.push([polygon[0], polygon[1], polygon[2]]);
    }
    Ok(triangles)
}

/// Uniform subdivision into k² similar triangles per parent
///
/// k is shared by all triangles so edge nodes coincide between neighbours.
fn refine(mesh: &mut Mesh, triangles: &[[usize; 3]], mesh_size: f64) -> EngineResult<Vec<[usize; 3]>> {
    let longest = triangles
        .iter()
        .flat_map(|t| (0..3).map(move |e| (t[e], t[(e + 1) % 3])))
        .map(|(a, b)| (mesh.nodes[a].position() - mesh.nodes[b].position()).norm())
        .fold(0.0_f64, f64::max);
    let k = edge_divisions((longest / mesh_size).ceil())?;
    if k == 1 {
        return Ok(triangles.to_vec());
    }

    // Points on shared edges are keyed by (lower vertex, higher vertex, step)
    let mut edge_nodes: HashMap<(usize, usize, usize), usize> = HashMap::new();
    let mut refined = Vec::with_capacity(triangles.len() * k * k);

    for tri in triangles {
        let corners = [
            mesh.nodes[tri[0]].position(),
            mesh.nodes[tri[1]].position(),
            mesh.nodes[tri[2]].position(),
        ];
        let mut grid = vec![vec![0usize; k + 1]; k + 1];
        for i in 0..=k {
            for j in 0..=(k - i) {
                grid[i][j] = lattice_node(mesh, &mut edge_nodes, tri, &corners, i, j, k);
            }
        }
        for i in 0..k {
            for j in 0..(k - i) {
                refined.push([grid[i][j], grid[i + 1][j], grid[i][j + 1]]);
                if i + j + 1 < k {
                    refined.push([grid[i + 1][j], grid[i + 1][j + 1], grid[i][j + 1]]);
                }
            }
        }
    }
    Ok(refined)
}

/// Node at barycentric lattice point (i, j) of a triangle, P = A + i/k·(B-A) + j/k·(C-A)
fn lattice_node(
    mesh: &mut Mesh,
    edge_nodes: &mut HashMap<(usize, usize, usize), usize>,
    tri: &[usize; 3],
    corners: &[Vec3; 3],
    i: usize,
    j: usize,
    k: usize,
) -> usize {
    // Corners
    if i == 0 && j == 0 {
        return tri[0];
    }
    if i == k {
        return tri[1];
    }
    if j == k {
        return tri[2];
    }
    // Edge points: (edge start, edge end, steps from start)
    let edge = if j == 0 {
        Some((tri[0], tri[1], i))
    } else if i == 0 {
        Some((tri[0], tri[2], j))
    } else if i + j == k {
        Some((tri[1], tri[2], j))
    } else {
        None
    };

    let p = corners[0]
        + (corners[1] - corners[0]) * (i as f64 / k as f64)
        + (corners[2] - corners[0]) * (j as f64 / k as f64);

    match edge {
        Some((a, b, step)) => {
            let key = if a < b { (a, b, step) } else { (b, a, k - step) };
            *edge_nodes
                .entry(key)
                .or_insert_with(|| mesh.add_node(Node::new(p.x, p.y, p.z)).0)
        }
        None => mesh.add_node(Node::new(p.x, p.y, p.z)).0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::polygon_area;
    use approx::assert_relative_eq;

    fn opts() -> MeshOptions {
        MeshOptions::new(1000.0)
    }

    fn total_area(mesh: &Mesh) -> f64 {
        mesh.elements
            .iter()
            .map(|e| polygon_area(&mesh.element_coords(e).unwrap()))
            .sum()
    }

    fn assert_positive_orientation(mesh: &Mesh, reference: Vec3) {
        for e in &mesh.elements {
            let n = newell_normal(&mesh.element_coords(e).unwrap());
            assert!(n.dot(&reference) > 0.0, "element {} is flipped or degenerate", e.id);
        }
    }

    #[test]
    fn test_rectangle_gives_two_triangles() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 3000.0, 6000.0, 4000.0, 200.0);
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.element_count(), 2);
        assert_relative_eq!(total_area(&mesh), 24.0e6, max_relative = 1e-12);
    }

    #[test]
    fn test_convex_polygon_gives_n_minus_2() {
        let boundary: Vec<Node> = (0..7)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 7.0;
                Node::new(1000.0 * a.cos(), 0.0, 1000.0 * a.sin())
            })
            .collect();
        let slab = SlabGeometry::new("S1", boundary, 150.0);
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_eq!(mesh.element_count(), 5);
    }

    #[test]
    fn test_l_shape_is_covered_without_overlap() {
        // Non-convex outline where a fan from vertex 0 would leave the polygon
        let boundary = vec![
            Node::new(0.0, 0.0, 0.0),
            Node::new(4.0, 0.0, 0.0),
            Node::new(4.0, 0.0, 1.0),
            Node::new(1.0, 0.0, 1.0),
            Node::new(1.0, 0.0, 4.0),
            Node::new(0.0, 0.0, 4.0),
        ];
        let slab = SlabGeometry::new("L", boundary, 150.0);
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_eq!(mesh.element_count(), 4);
        assert_relative_eq!(total_area(&mesh), 7.0, epsilon = 1e-9);
        assert_positive_orientation(&mesh, Vec3::y());
    }

    #[test]
    fn test_opening_area_is_excluded() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 10.0, 10.0, 0.2).with_opening(vec![
            Node::new(4.0, 0.0, 4.0),
            Node::new(6.0, 0.0, 4.0),
            Node::new(6.0, 0.0, 6.0),
            Node::new(4.0, 0.0, 6.0),
        ]);
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_eq!(mesh.node_count(), 8);
        // n + 2h - 2 triangles for n vertices and h holes
        assert_eq!(mesh.element_count(), 8);
        assert_relative_eq!(total_area(&mesh), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rectangle_faces_up() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 3000.0, 2000.0, 2000.0, 200.0);
        let outline: Vec<Vec3> = slab.boundary.iter().map(Node::position).collect();
        assert!(newell_normal(&outline).y > 0.0);
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_positive_orientation(&mesh, Vec3::y());
    }

    #[test]
    fn test_horizontal_slab_faces_up_for_either_winding() {
        let mut slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 2.0, 2.0, 0.2).with_opening(vec![
            Node::new(0.5, 0.0, 0.5),
            Node::new(1.0, 0.0, 0.5),
            Node::new(1.0, 0.0, 1.0),
        ]);
        slab.boundary.reverse();
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_positive_orientation(&mesh, Vec3::y());

        slab.boundary.reverse();
        slab.openings[0].reverse();
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_positive_orientation(&mesh, Vec3::y());
    }

    #[test]
    fn test_opening_outside_boundary_is_rejected() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 10.0, 10.0, 0.2).with_opening(vec![
            Node::new(12.0, 0.0, 2.0),
            Node::new(14.0, 0.0, 2.0),
            Node::new(14.0, 0.0, 4.0),
            Node::new(12.0, 0.0, 4.0),
        ]);
        let err = generate_slab_mesh(&slab, &opts()).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_opening_crossing_boundary_is_rejected() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 10.0, 10.0, 0.2).with_opening(vec![
            Node::new(8.0, 0.0, 4.0),
            Node::new(11.0, 0.0, 4.0),
            Node::new(11.0, 0.0, 6.0),
            Node::new(8.0, 0.0, 6.0),
        ]);
        let err = generate_slab_mesh(&slab, &opts()).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_refinement_rejects_tiny_mesh_size() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 2000.0, 2000.0, 200.0).refined();
        let err = generate_slab_mesh(&slab, &MeshOptions::new(1e-6)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_refinement_is_conforming() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 2000.0, 2000.0, 200.0).refined();
        let mesh = generate_slab_mesh(&slab, &opts()).unwrap();
        // Diagonal 2828 mm -> k = 3 -> 9 triangles per parent
        assert_eq!(mesh.element_count(), 18);
        // Lattice of a square split on its diagonal: (k+1)^2 points
        assert_eq!(mesh.node_count(), 16);
        assert_relative_eq!(total_area(&mesh), 4.0e6, max_relative = 1e-9);
    }

    #[test]
    fn test_slab_requires_three_nodes() {
        let slab = SlabGeometry::new("S1", vec![Node::new(0.0, 0.0, 0.0), Node::new(1.0, 0.0, 0.0)], 0.2);
        let err = generate_slab_mesh(&slab, &opts()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTopology { found: 2, .. }));
    }

    #[test]
    fn test_slab_meshing_is_deterministic() {
        let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 0.0, 10.0, 10.0, 0.2).with_opening(vec![
            Node::new(2.0, 0.0, 2.0),
            Node::new(3.0, 0.0, 2.0),
            Node::new(3.0, 0.0, 3.0),
        ]);
        let a = generate_slab_mesh(&slab, &opts()).unwrap();
        let b = generate_slab_mesh(&slab, &opts()).unwrap();
        assert_eq!(a, b);
    }
}
