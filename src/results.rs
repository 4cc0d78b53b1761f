//! Result records exchanged with the external solver and the design checker

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::elements::NodeId;
use crate::error::EngineResult;

/// Serialize any record for the external solver or the UI
pub fn to_json<T: Serialize>(value: &T) -> EngineResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse a record produced by the external solver
pub fn from_json<T: DeserializeOwned>(json: &str) -> EngineResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Internal forces at one member station
///
/// Local y is the strong (major) axis: `moment_y` is major-axis bending and
/// `shear_z` the shear acting with it, parallel to the web.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force in local y direction (minor)
    pub shear_y: f64,
    /// Shear force in local z direction (major)
    pub shear_z: f64,
    /// Torsion
    pub torsion: f64,
    /// Bending moment about local y axis (major)
    pub moment_y: f64,
    /// Bending moment about local z axis (minor)
    pub moment_z: f64,
}

impl MemberForces {
    /// Create from array [P, Vy, Vz, T, My, Mz]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            axial: arr[0],
            shear_y: arr[1],
            shear_z: arr[2],
            torsion: arr[3],
            moment_y: arr[4],
            moment_z: arr[5],
        }
    }

    /// Get the forces as an array [P, Vy, Vz, T, My, Mz]
    pub fn as_array(&self) -> [f64; 6] {
        [self.axial, self.shear_y, self.shear_z, self.torsion, self.moment_y, self.moment_z]
    }
}

/// Forces at a normalized position along a member
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberStation {
    /// Position from the i-node, 0..1
    pub position: f64,
    pub forces: MemberForces,
}

/// Station forces of one member under one load combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResult {
    pub member_id: String,
    pub combination: String,
    pub stations: Vec<MemberStation>,
}

impl MemberResult {
    pub fn new(member_id: &str, combination: &str, stations: Vec<MemberStation>) -> Self {
        Self {
            member_id: member_id.to_string(),
            combination: combination.to_string(),
            stations,
        }
    }
}

/// Modal displacement of one node, [DX, DY, DZ, RX, RY, RZ]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeShape {
    pub node: NodeId,
    pub components: [f64; 6],
}

/// One vibration mode from the eigenvalue solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    /// Mode number, 1-based
    pub mode: usize,
    /// Natural frequency (Hz)
    pub frequency: f64,
    /// Circular frequency (rad/s)
    pub circular_frequency: f64,
    /// Period (s)
    pub period: f64,
    /// Participation factors for excitation along X, Y, Z
    #[serde(default)]
    pub participation: [f64; 3],
    pub mode_shapes: Vec<ModeShape>,
}

impl ModalResult {
    /// Mode with derived circular frequency and period
    pub fn from_frequency(mode: usize, frequency: f64) -> Self {
        let period = if frequency > 0.0 { 1.0 / frequency } else { f64::INFINITY };
        Self {
            mode,
            frequency,
            circular_frequency: 2.0 * PI * frequency,
            period,
            participation: [0.0; 3],
            mode_shapes: Vec::new(),
        }
    }

    pub fn with_participation(mut self, participation: [f64; 3]) -> Self {
        self.participation = participation;
        self
    }

    pub fn with_shapes(mut self, shapes: Vec<ModeShape>) -> Self {
        self.mode_shapes = shapes;
        self
    }

    pub fn shape_at(&self, node: NodeId) -> Option<&ModeShape> {
        self.mode_shapes.iter().find(|s| s.node == node)
    }
}

/// Combined seismic demand at a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeDemand {
    pub node: NodeId,
    /// Absolute combined [DX, DY, DZ, RX, RY, RZ]
    pub components: [f64; 6],
}

impl NodeDemand {
    pub fn translation_magnitude(&self) -> f64 {
        let [dx, dy, dz, ..] = self.components;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// In-plane stresses with principal and von Mises values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneStress {
    pub sx: f64,
    pub sy: f64,
    pub txy: f64,
    pub von_mises: f64,
    /// Maximum principal stress
    pub s1: f64,
    /// Minimum principal stress
    pub s2: f64,
}

impl MembraneStress {
    pub fn from_components(sx: f64, sy: f64, txy: f64) -> Self {
        let von_mises = (sx.powi(2) - sx * sy + sy.powi(2) + 3.0 * txy.powi(2)).sqrt();
        let s_avg = (sx + sy) / 2.0;
        let r = ((sx - sy).powi(2) / 4.0 + txy.powi(2)).sqrt();
        Self {
            sx,
            sy,
            txy,
            von_mises,
            s1: s_avg + r,
            s2: s_avg - r,
        }
    }
}

/// Outcome of a design check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignStatus {
    Pass,
    Fail,
}

/// Design verdict for one member, created once per run and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    pub member_id: String,
    /// Governing demand/capacity ratio
    pub ratio: f64,
    /// Name of the governing limit state
    pub governing_case: String,
    /// Intermediate capacities, ratios and parameters
    pub details: BTreeMap<String, f64>,
    pub status: DesignStatus,
    pub messages: Vec<String>,
}

impl DesignResult {
    pub fn passed(&self) -> bool {
        self.status == DesignStatus::Pass
    }
}
