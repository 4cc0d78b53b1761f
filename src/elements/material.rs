//! Material properties
//!
//! Values are unit-agnostic; the presets use N, mm and MPa.

use serde::{Deserialize, Serialize};

/// Material family tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaterialFamily {
    #[default]
    Steel,
    Concrete,
    Timber,
    Masonry,
    Aluminum,
}

/// Material properties for analysis and design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Yield strength Fy
    pub fy: f64,
    /// Ultimate tensile strength Fu
    pub fu: f64,
    /// Modulus of elasticity E
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    pub family: MaterialFamily,
}

impl Material {
    /// Create a new steel-family material
    pub fn new(name: &str, fy: f64, fu: f64, e: f64, nu: f64) -> Self {
        Self {
            name: name.to_string(),
            fy,
            fu,
            e,
            nu,
            family: MaterialFamily::Steel,
        }
    }

    pub fn with_family(mut self, family: MaterialFamily) -> Self {
        self.family = family;
        self
    }

    /// ASTM A992 (W-shapes): Fy = 345 MPa, Fu = 450 MPa
    pub fn a992() -> Self {
        Self::new("A992", 345.0, 450.0, 200_000.0, 0.3)
    }

    /// ASTM A36: Fy = 250 MPa, Fu = 400 MPa
    pub fn a36() -> Self {
        Self::new("A36", 250.0, 400.0, 200_000.0, 0.3)
    }

    /// Concrete with E = 4700·sqrt(f'c) (ACI 318, MPa)
    pub fn concrete(fc: f64) -> Self {
        Self {
            name: format!("C{fc:.0}"),
            fy: 0.0,
            fu: fc,
            e: 4700.0 * fc.sqrt(),
            nu: 0.2,
            family: MaterialFamily::Concrete,
        }
    }

    /// G = E / (2(1 + ν))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    pub fn is_steel(&self) -> bool {
        self.family == MaterialFamily::Steel
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::a992()
    }
}
