//! Structural Core demo - one storey of a steel frame with a shear wall and slab
//!
//! Run with `RUST_LOG=debug` to see meshing and stiffness logs.

use anyhow::{Context, Result};
use structural_core::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Structural Core demo ===\n");

    // Wall: 6 m x 3 m, 200 mm thick, 1 m elements (N, mm, MPa)
    let concrete = Material::concrete(30.0);
    let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 6000.0, 3000.0, 200.0).with_material(&concrete.name);
    let options = MeshOptions::new(1000.0);
    let wall_mesh = generate_wall_mesh(&wall, &options).context("meshing wall W1")?;
    println!(
        "Wall {}: {} nodes, {} quad elements",
        wall.id,
        wall_mesh.node_count(),
        wall_mesh.element_count()
    );

    let stiffness = element_stiffnesses(&wall_mesh, &concrete)?;
    let k0 = &stiffness[0];
    println!("  K[0] is {}x{}, K11 = {:.3e}", k0.nrows(), k0.ncols(), k0[(0, 0)]);

    // Slab: 8 m x 6 m at +3 m with a stair opening
    let slab = SlabGeometry::rectangle("S1", 0.0, 0.0, 3000.0, 8000.0, 6000.0, 180.0).with_opening(vec![
        Node::new(5000.0, 3000.0, 1000.0),
        Node::new(7000.0, 3000.0, 1000.0),
        Node::new(7000.0, 3000.0, 3000.0),
        Node::new(5000.0, 3000.0, 3000.0),
    ]);
    let slab_mesh = generate_slab_mesh(&slab, &options).context("meshing slab S1")?;
    println!(
        "Slab {}: {} nodes, {} elements",
        slab.id,
        slab_mesh.node_count(),
        slab_mesh.element_count()
    );

    // 5 kPa superimposed dead load
    let load = AreaLoad::gravity(0.005, "SDL");
    let nodal = mesh_nodal_forces(&slab_mesh, &load)?;
    let total_y: f64 = nodal.iter().map(|f| f.y).sum();
    println!("  {} total = {:.1} kN", load.case, total_y / 1000.0);

    // Seismic demands from two modes of the wall
    let spectrum = SpectrumParameters::default().synthesize("Design", 0.05)?;
    let top = wall_mesh.node_count() - 1;
    let modes = vec![
        ModalResult::from_frequency(1, 2.5)
            .with_participation([1.3, 0.0, 0.0])
            .with_shapes(vec![ModeShape {
                node: NodeId(top),
                components: [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            }]),
        ModalResult::from_frequency(2, 2.7)
            .with_participation([0.4, 0.0, 0.9])
            .with_shapes(vec![ModeShape {
                node: NodeId(top),
                components: [0.3, 0.0, 1.0, 0.0, 0.0, 0.0],
            }]),
    ];
    let mut cache = SpectrumCache::new();
    let rsa = ModalCombinationOptions::default()
        .with_directional_method(DirectionalMethod::Rule100_30)
        .with_acceleration_scale(9806.65);
    let demands = combine_node_demands(&modes, &spectrum, &rsa, &mut cache)?;
    for demand in &demands {
        println!(
            "Node {}: |u| = {:.2} mm (CQC, 100-30)",
            demand.node.index(),
            demand.translation_magnitude()
        );
    }

    // Steel column design from two combinations
    let member = Member::new("C1", MemberKind::Column, NodeId(0), NodeId(1), "W310x97", "A992", 3000.0);
    let results = vec![
        MemberResult::new(
            "C1",
            "1.2D+1.6L",
            vec![
                MemberStation {
                    position: 0.0,
                    forces: MemberForces::from_array([-900e3, 2e3, 40e3, 0.0, 60e6, 4e6]),
                },
                MemberStation {
                    position: 1.0,
                    forces: MemberForces::from_array([-900e3, 2e3, 40e3, 0.0, -55e6, -3e6]),
                },
            ],
        ),
        MemberResult::new(
            "C1",
            "1.2D+1.0E+L",
            vec![MemberStation {
                position: 0.0,
                forces: MemberForces::from_array([-1200e3, 8e3, 90e3, 1e5, 150e6, 10e6]),
            }],
        ),
    ];
    let envelope = ForceEnvelope::from_results(&results)?;
    let input = DesignInput::resolve(&member, &[Section::default()], &[Material::a992()], envelope.forces)?;
    let design = check_members(&[input], &DesignOptions::lrfd());

    println!("\nDesign results:");
    println!("{}", to_json(&design)?);

    Ok(())
}
