//! Analysis options for meshing, modal combination and design checks

use serde::{Deserialize, Serialize};

/// Options for mesh generation and quality validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Target element edge length
    pub mesh_size: f64,
    /// Run quality validation on every generated element
    pub check_quality: bool,
    /// Aspect ratio above which a quad is flagged
    pub max_aspect_ratio: f64,
    /// Acceptable interior angle range for quads, degrees
    pub quad_angle_limits: (f64, f64),
    /// Minimum triangle angle before a warning, degrees
    pub min_triangle_angle: f64,
    /// Maximum triangle angle before a warning, degrees
    pub max_triangle_angle: f64,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            mesh_size: 1000.0,
            check_quality: true,
            max_aspect_ratio: 10.0,
            quad_angle_limits: (50.0, 130.0),
            min_triangle_angle: 20.0,
            max_triangle_angle: 120.0,
        }
    }
}

impl MeshOptions {
    pub fn new(mesh_size: f64) -> Self {
        Self {
            mesh_size,
            ..Self::default()
        }
    }

    /// Skip quality validation during generation
    pub fn without_quality_check(mut self) -> Self {
        self.check_quality = false;
        self
    }

    pub fn with_max_aspect_ratio(mut self, ratio: f64) -> Self {
        self.max_aspect_ratio = ratio;
        self
    }

    pub fn with_quad_angle_limits(mut self, min_deg: f64, max_deg: f64) -> Self {
        self.quad_angle_limits = (min_deg, max_deg);
        self
    }
}

/// Modal combination rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModalMethod {
    /// Complete Quadratic Combination
    #[default]
    Cqc,
    /// Square root of sum of squares
    Srss,
    /// Sum of absolute values
    Abs,
}

/// Rule for combining the responses to the three excitation directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirectionalMethod {
    #[default]
    Srss,
    Abs,
    /// 100% of one direction plus 30% of the other two
    Rule100_30,
    /// 100% of one direction plus 40% of the other two
    Rule100_40,
}

/// Options for response-spectrum combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalCombinationOptions {
    pub modal_method: ModalMethod,
    pub directional_method: DirectionalMethod,
    /// Modal damping ratio ξ applied to every mode
    pub damping: f64,
    /// Active excitation directions [X, Y, Z]
    pub directions: [bool; 3],
    /// Factor converting spectral acceleration to model units (e.g. g)
    pub acceleration_scale: f64,
}

impl Default for ModalCombinationOptions {
    fn default() -> Self {
        Self {
            modal_method: ModalMethod::Cqc,
            directional_method: DirectionalMethod::Srss,
            damping: 0.05,
            directions: [true, false, true],
            acceleration_scale: 1.0,
        }
    }
}

impl ModalCombinationOptions {
    pub fn with_modal_method(mut self, method: ModalMethod) -> Self {
        self.modal_method = method;
        self
    }

    pub fn with_directional_method(mut self, method: DirectionalMethod) -> Self {
        self.directional_method = method;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_directions(mut self, x: bool, y: bool, z: bool) -> Self {
        self.directions = [x, y, z];
        self
    }

    pub fn with_acceleration_scale(mut self, scale: f64) -> Self {
        self.acceleration_scale = scale;
        self
    }
}

/// LRFD resistance factors and limits for steel design checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignOptions {
    pub phi_tension_yield: f64,
    pub phi_tension_rupture: f64,
    pub phi_compression: f64,
    pub phi_flexure: f64,
    pub phi_shear: f64,
    /// Shear lag factor U used when no connection data is available
    pub shear_lag_factor: f64,
    /// Governing ratio above which a member fails
    pub dc_limit: f64,
}

impl Default for DesignOptions {
    fn default() -> Self {
        Self {
            phi_tension_yield: 0.90,
            phi_tension_rupture: 0.75,
            phi_compression: 0.90,
            phi_flexure: 0.90,
            phi_shear: 0.90,
            shear_lag_factor: 1.0,
            dc_limit: 1.0,
        }
    }
}

impl DesignOptions {
    /// AISC 360 LRFD factors
    pub fn lrfd() -> Self {
        Self::default()
    }

    pub fn with_shear_lag_factor(mut self, u: f64) -> Self {
        self.shear_lag_factor = u;
        self
    }

    pub fn with_dc_limit(mut self, limit: f64) -> Self {
        self.dc_limit = limit;
        self
    }
}
