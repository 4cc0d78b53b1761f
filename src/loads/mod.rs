//! Surface loads and their distribution to element nodes

mod area_load;
mod nodal_force;

pub use area_load::{distribute_area_load, mesh_nodal_forces, AreaLoad, Distribution, LoadDirection};
pub use nodal_force::{LoadFrame, NodalForce};
