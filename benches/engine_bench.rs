//! Benchmarks for meshing, shell stiffness and batch design

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use structural_core::math::quad4_local_stiffness;
use structural_core::prelude::*;

fn design_batch(count: usize) -> Vec<DesignInput> {
    (0..count)
        .map(|i| {
            let length = 2000.0 + 50.0 * (i % 100) as f64;
            DesignInput {
                member: Member::new(&format!("M{i}"), MemberKind::Column, NodeId(0), NodeId(1), "W", "A992", length),
                section: Section::default(),
                material: Material::a992(),
                forces: GoverningForces::axial(-1.0e6).with_moments(1.0e8, 1.0e7).with_shears(1.0e4, 1.0e5),
            }
        })
        .collect()
}

fn benchmark_quad_stiffness(c: &mut Criterion) {
    let xy = [[0.0, 0.0], [1000.0, 50.0], [1050.0, 950.0], [-20.0, 1000.0]];
    c.bench_function("quad4_local_stiffness", |b| {
        b.iter(|| quad4_local_stiffness(black_box(&xy), 200.0, 30_000.0, 0.2))
    });
}

fn benchmark_wall_meshing(c: &mut Criterion) {
    let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 20_000.0, 12_000.0, 250.0);
    let options = MeshOptions::new(250.0).without_quality_check();
    c.bench_function("wall_mesh_80x48", |b| {
        b.iter(|| generate_wall_mesh(black_box(&wall), &options))
    });

    let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
    let material = Material::concrete(35.0);
    c.bench_function("wall_element_stiffnesses_240", |b| {
        b.iter(|| element_stiffnesses(black_box(&mesh), &material))
    });
}

fn benchmark_batch_design(c: &mut Criterion) {
    let inputs = design_batch(1000);
    let options = DesignOptions::lrfd();
    c.bench_function("check_members_1000", |b| {
        b.iter(|| check_members(black_box(&inputs), &options))
    });
}

criterion_group!(benches, benchmark_quad_stiffness, benchmark_wall_meshing, benchmark_batch_design);
criterion_main!(benches);
