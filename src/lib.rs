//! Structural Core - analysis and code-compliance engine for building structures
//!
//! The crate covers the parts of a structural workflow that sit around an
//! external global solver:
//! - Mesh generation for walls (structured quad4) and slabs (triangulated polygons with openings)
//! - Flat shell elements (Q4/T3 membrane + Mindlin plate + drilling DOF) and their force recovery
//! - Area load distribution to shell nodes
//! - Response-spectrum modal combination (CQC/SRSS/ABS, 100-30/100-40 directional rules)
//! - AISC 360 LRFD steel member checks
//!
//! ## Example
//! ```rust
//! use structural_core::prelude::*;
//!
//! let wall = WallGeometry::rectangle("W1", 0.0, 0.0, 0.0, 4000.0, 3000.0, 200.0);
//! let mesh = generate_wall_mesh(&wall, &MeshOptions::new(1000.0)).unwrap();
//! assert_eq!(mesh.element_count(), 12);
//!
//! let stiffness = element_stiffnesses(&mesh, &Material::concrete(30.0)).unwrap();
//! assert_eq!(stiffness[0].nrows(), 24);
//!
//! let member = Member::new("C1", MemberKind::Column, NodeId(0), NodeId(1), "W", "A992", 3000.0);
//! let section = Section::wide_flange("W", 300.0, 200.0, 15.0, 10.0);
//! let result = check_member(
//!     &member,
//!     &section,
//!     &Material::a992(),
//!     &GoverningForces::axial(-500_000.0),
//!     &DesignOptions::lrfd(),
//! );
//! assert!(result.passed());
//! ```

pub mod analysis;
pub mod design;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod modal;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{DesignOptions, DirectionalMethod, MeshOptions, ModalCombinationOptions, ModalMethod};
    pub use crate::design::{check_member, check_members, DesignInput, ForceEnvelope, GoverningForces};
    pub use crate::elements::{
        Material, MaterialFamily, Member, MemberKind, Node, NodeId, ParentKind, Section, ShellElement, ShellTopology,
    };
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::loads::{distribute_area_load, mesh_nodal_forces, AreaLoad, Distribution, LoadDirection, NodalForce};
    pub use crate::math::{element_forces, element_stiffnesses, ShellForces};
    pub use crate::mesh::{generate_slab_mesh, generate_wall_mesh, mesh_quality, Mesh, SlabGeometry, WallGeometry};
    pub use crate::modal::{
        combine_member_demands, combine_modal, combine_node_demands, ResponseSpectrum, SpectrumCache,
        SpectrumParameters, SpectrumPoint,
    };
    pub use crate::results::{
        DesignResult, DesignStatus, MemberForces, MemberResult, MemberStation, MembraneStress, ModalResult,
        ModeShape, NodeDemand,
    };
    pub use crate::results::{from_json, to_json};
}
