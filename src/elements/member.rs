//! Member element - beam, column or brace

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Structural role of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberKind {
    #[default]
    Beam,
    Column,
    Brace,
}

/// A frame member between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub kind: MemberKind,
    /// Start node
    pub i_node: NodeId,
    /// End node
    pub j_node: NodeId,
    /// Name of the section
    pub section: String,
    /// Name of the material
    pub material: String,
    /// Unbraced length for buckling about the strong axis
    pub lx: f64,
    /// Unbraced length for buckling about the weak axis
    pub ly: f64,
    /// Unbraced length of the compression flange (LTB)
    pub lb: f64,
    /// Effective-length factor, strong axis
    pub kx: f64,
    /// Effective-length factor, weak axis
    pub ky: f64,
    /// Lateral-torsional buckling modification factor
    pub cb: f64,
    /// Net area An for tension rupture (defaults to Ag)
    #[serde(default)]
    pub net_area: Option<f64>,
}

impl Member {
    /// Create a member braced only at its ends, K = 1.0 and Cb = 1.0
    pub fn new(
        id: &str,
        kind: MemberKind,
        i_node: NodeId,
        j_node: NodeId,
        section: &str,
        material: &str,
        length: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            i_node,
            j_node,
            section: section.to_string(),
            material: material.to_string(),
            lx: length,
            ly: length,
            lb: length,
            kx: 1.0,
            ky: 1.0,
            cb: 1.0,
            net_area: None,
        }
    }

    /// Set unbraced lengths (strong axis, weak axis, LTB)
    pub fn with_unbraced_lengths(mut self, lx: f64, ly: f64, lb: f64) -> Self {
        self.lx = lx;
        self.ly = ly;
        self.lb = lb;
        self
    }

    pub fn with_k_factors(mut self, kx: f64, ky: f64) -> Self {
        self.kx = kx;
        self.ky = ky;
        self
    }

    pub fn with_cb(mut self, cb: f64) -> Self {
        self.cb = cb;
        self
    }

    pub fn with_net_area(mut self, net_area: f64) -> Self {
        self.net_area = Some(net_area);
        self
    }

    /// Effective lengths (KLx, KLy)
    pub fn effective_lengths(&self) -> (f64, f64) {
        (self.kx * self.lx, self.ky * self.ly)
    }
}
