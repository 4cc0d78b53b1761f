//! AISC 360 (LRFD) member checks
//!
//! Capacities are design strengths (φ already applied). Section axes follow the
//! shapes tables: x is the strong axis, y the weak axis.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::GoverningForces;
use crate::analysis::DesignOptions;
use crate::elements::{Material, Member, Section};
use crate::results::{DesignResult, DesignStatus};

/// Tension design strength, AISC D2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TensionCapacity {
    /// φt·Fy·Ag
    pub yielding: f64,
    /// φt·Fu·Ae with Ae = U·An
    pub rupture: f64,
}

impl TensionCapacity {
    pub fn governing(&self) -> f64 {
        self.yielding.min(self.rupture)
    }
}

/// Compression design strength, AISC E3
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionCapacity {
    /// Governing KL/r
    pub slenderness: f64,
    /// Elastic buckling stress Fe (infinite for zero slenderness)
    pub fe: f64,
    /// Critical stress Fcr
    pub fcr: f64,
    /// φc·Fcr·Ag
    pub capacity: f64,
}

/// Lateral-torsional buckling regime of a strong-axis flexure check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LtbRegime {
    /// Lb ≤ Lp
    Yielding,
    /// Lp < Lb ≤ Lr
    Inelastic,
    /// Lb > Lr
    Elastic,
}

/// Strong-axis flexural design strength, AISC F2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexureCapacity {
    /// Plastic moment Fy·Zx
    pub mp: f64,
    pub lp: f64,
    pub lr: f64,
    /// Nominal moment Mn ≤ Mp
    pub mn: f64,
    /// φb·Mn
    pub capacity: f64,
    pub regime: LtbRegime,
}

/// Shear design strength, AISC G2/G6
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearCapacity {
    /// Shear area
    pub area: f64,
    /// Web (or flange) buckling coefficient Cv1/Cv2
    pub cv: f64,
    /// φv·0.6·Fy·Aw·Cv
    pub capacity: f64,
}

/// Interaction equation applied by [`combined_interaction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionEquation {
    H1a,
    H1b,
}

impl InteractionEquation {
    fn label(self) -> &'static str {
        match self {
            Self::H1a => "Combined (H1-1a)",
            Self::H1b => "Combined (H1-1b)",
        }
    }
}

pub fn tension_capacity(member: &Member, section: &Section, material: &Material, options: &DesignOptions) -> TensionCapacity {
    let an = member.net_area.unwrap_or(section.a);
    let ae = options.shear_lag_factor * an;
    TensionCapacity {
        yielding: options.phi_tension_yield * material.fy * section.a,
        rupture: options.phi_tension_rupture * material.fu * ae,
    }
}

pub fn compression_capacity(
    member: &Member,
    section: &Section,
    material: &Material,
    options: &DesignOptions,
) -> CompressionCapacity {
    let (klx, kly) = member.effective_lengths();
    let slenderness = slenderness_ratio(klx, section.rx()).max(slenderness_ratio(kly, section.ry()));

    let (fe, fcr) = if slenderness <= f64::EPSILON {
        (f64::INFINITY, material.fy)
    } else {
        let fe = PI.powi(2) * material.e / slenderness.powi(2);
        let fcr = if material.fy / fe <= 2.25 {
            0.658_f64.powf(material.fy / fe) * material.fy
        } else {
            0.877 * fe
        };
        (fe, fcr)
    };

    CompressionCapacity {
        slenderness,
        fe,
        fcr,
        capacity: options.phi_compression * fcr * section.a,
    }
}

fn slenderness_ratio(kl: f64, r: f64) -> f64 {
    if r > 0.0 {
        kl / r
    } else {
        0.0
    }
}

/// Strong-axis flexure for doubly symmetric I-shapes and solid sections (c = 1)
pub fn flexure_major_capacity(
    member: &Member,
    section: &Section,
    material: &Material,
    options: &DesignOptions,
) -> FlexureCapacity {
    let (e, fy) = (material.e, material.fy);
    let mp = fy * section.zx;
    let rts = section.rts();
    let lp = 1.76 * section.ry() * (e / fy).sqrt();

    let sx_ho = section.sx * section.ho();
    let jc_term = if sx_ho > 0.0 { section.j / sx_ho } else { 0.0 };
    let lr = 1.95 * rts * e / (0.7 * fy)
        * (jc_term + (jc_term.powi(2) + 6.76 * (0.7 * fy / e).powi(2)).sqrt()).sqrt();

    let lb = member.lb;
    let (regime, mn) = if lb <= lp || rts <= 0.0 {
        (LtbRegime::Yielding, mp)
    } else if lb <= lr {
        let mn = member.cb * (mp - (mp - 0.7 * fy * section.sx) * (lb - lp) / (lr - lp));
        (LtbRegime::Inelastic, mn.min(mp))
    } else {
        let slender = lb / rts;
        let fcr = member.cb * PI.powi(2) * e / slender.powi(2) * (1.0 + 0.078 * jc_term * slender.powi(2)).sqrt();
        (LtbRegime::Elastic, (fcr * section.sx).min(mp))
    };

    FlexureCapacity {
        mp,
        lp,
        lr,
        mn,
        capacity: options.phi_flexure * mn,
        regime,
    }
}

/// Weak-axis flexure, AISC F6: Mn = min(Fy·Zy, 1.6·Fy·Sy)
pub fn flexure_minor_capacity(section: &Section, material: &Material, options: &DesignOptions) -> f64 {
    let mp = material.fy * section.zy;
    options.phi_flexure * mp.min(1.6 * material.fy * section.sy)
}

/// Shear parallel to the web, AISC G2.1
pub fn shear_major_capacity(section: &Section, material: &Material, options: &DesignOptions) -> ShearCapacity {
    let (e, fy) = (material.e, material.fy);
    let area = section.depth * section.web_thickness;
    let h_tw = if section.web_thickness > 0.0 {
        section.web_height() / section.web_thickness
    } else {
        0.0
    };

    let kv = 5.34;
    let limit = 1.10 * (kv * e / fy).sqrt();
    let cv = if h_tw <= 2.24 * (e / fy).sqrt() || h_tw <= limit {
        1.0
    } else {
        limit / h_tw
    };

    ShearCapacity {
        area,
        cv,
        capacity: options.phi_shear * 0.6 * fy * area * cv,
    }
}

/// Shear parallel to the flanges, AISC G6 (web area for sections without flanges)
pub fn shear_minor_capacity(section: &Section, material: &Material, options: &DesignOptions) -> ShearCapacity {
    let (e, fy) = (material.e, material.fy);
    let (area, cv) = match (section.flange_width, section.flange_thickness) {
        (Some(bf), Some(tf)) if bf > 0.0 && tf > 0.0 => {
            let kv = 1.2;
            let slender = bf / (2.0 * tf);
            let root = (kv * e / fy).sqrt();
            let cv2 = if slender <= 1.10 * root {
                1.0
            } else if slender <= 1.37 * root {
                1.10 * root / slender
            } else {
                1.51 * kv * e / (slender.powi(2) * fy)
            };
            (2.0 * bf * tf, cv2)
        }
        _ => (section.depth * section.web_thickness, 1.0),
    };

    ShearCapacity {
        area,
        cv,
        capacity: options.phi_shear * 0.6 * fy * area * cv,
    }
}

/// AISC H1-1 interaction of axial load and biaxial bending
///
/// Ratios are demand over design strength; a zero moment ratio drops out.
pub fn combined_interaction(axial_ratio: f64, major_ratio: f64, minor_ratio: f64) -> (f64, InteractionEquation) {
    let moments = major_ratio + minor_ratio;
    if axial_ratio >= 0.2 {
        (axial_ratio + 8.0 / 9.0 * moments, InteractionEquation::H1a)
    } else {
        (axial_ratio / 2.0 + moments, InteractionEquation::H1b)
    }
}

/// Tracks the limit state with the highest ratio; earlier checks win ties
struct Governing {
    case: String,
    ratio: f64,
}

impl Governing {
    fn update(&mut self, case: &str, ratio: f64) {
        if ratio > self.ratio {
            self.case = case.to_string();
            self.ratio = ratio;
        }
    }
}

fn demand_ratio(demand: f64, capacity: f64) -> Option<f64> {
    (capacity > 0.0).then(|| demand.abs() / capacity)
}

/// Check one member against every applicable AISC 360 limit state
///
/// Never fails: missing or non-physical properties yield a failing result
/// with an explanatory message.
pub fn check_member(
    member: &Member,
    section: &Section,
    material: &Material,
    forces: &GoverningForces,
    options: &DesignOptions,
) -> DesignResult {
    let mut details = BTreeMap::new();
    let mut messages = Vec::new();

    let invalid = [
        ("Fy", material.fy),
        ("Fu", material.fu),
        ("E", material.e),
        ("Ag", section.a),
    ]
    .into_iter()
    .find(|(_, value)| !(value.is_finite() && *value > 0.0));
    if let Some((name, value)) = invalid {
        let message = format!("member {}: {name} must be positive, got {value}", member.id);
        log::warn!("{message}");
        return DesignResult {
            member_id: member.id.clone(),
            ratio: 0.0,
            governing_case: "Invalid input".to_string(),
            details,
            status: DesignStatus::Fail,
            messages: vec![message],
        };
    }
    if !material.is_steel() {
        messages.push(format!("material {} is not steel; AISC 360 checks applied as-is", material.name));
    }

    let mut governing = Governing {
        case: String::new(),
        ratio: f64::NEG_INFINITY,
    };

    // Axial
    let tension = tension_capacity(member, section, material, options);
    let compression = compression_capacity(member, section, material, options);
    details.insert("Pn_yield".to_string(), tension.yielding);
    details.insert("Pn_rupture".to_string(), tension.rupture);
    details.insert("KL/r".to_string(), compression.slenderness);
    details.insert("Fcr".to_string(), compression.fcr);
    details.insert("Pn_compression".to_string(), compression.capacity);
    if compression.fe.is_finite() {
        details.insert("Fe".to_string(), compression.fe);
    }

    let (axial_case, axial_capacity) = if forces.pu > 0.0 {
        ("Tension (D2)", tension.governing())
    } else {
        ("Compression (E3)", compression.capacity)
    };
    let axial_ratio = if forces.pu != 0.0 {
        match demand_ratio(forces.pu, axial_capacity) {
            Some(ratio) => {
                details.insert("ratio_axial".to_string(), ratio);
                governing.update(axial_case, ratio);
                ratio
            }
            None => {
                messages.push(format!("{axial_case} skipped: zero capacity"));
                0.0
            }
        }
    } else {
        0.0
    };

    // Flexure
    let major = flexure_major_capacity(member, section, material, options);
    let minor_capacity = flexure_minor_capacity(section, material, options);
    details.insert("Mp".to_string(), major.mp);
    details.insert("Lp".to_string(), major.lp);
    details.insert("Lr".to_string(), major.lr);
    details.insert("Mn_major".to_string(), major.capacity);
    details.insert("Mn_minor".to_string(), minor_capacity);

    let mut flexure = |case: &str, key: &str, demand: f64, capacity: f64| -> f64 {
        if demand == 0.0 {
            return 0.0;
        }
        match demand_ratio(demand, capacity) {
            Some(ratio) => {
                details.insert(key.to_string(), ratio);
                governing.update(case, ratio);
                ratio
            }
            None => {
                messages.push(format!("{case} skipped: zero capacity"));
                0.0
            }
        }
    };
    let major_ratio = flexure("Flexure major (F2)", "ratio_flexure_major", forces.muy, major.capacity);
    let minor_ratio = flexure("Flexure minor (F6)", "ratio_flexure_minor", forces.muz, minor_capacity);

    // Shear
    let shear_major = shear_major_capacity(section, material, options);
    let shear_minor = shear_minor_capacity(section, material, options);
    details.insert("Cv1".to_string(), shear_major.cv);
    details.insert("Vn_major".to_string(), shear_major.capacity);
    details.insert("Vn_minor".to_string(), shear_minor.capacity);
    for (case, key, demand, capacity) in [
        ("Shear major (G2)", "ratio_shear_major", forces.vuz, shear_major.capacity),
        ("Shear minor (G6)", "ratio_shear_minor", forces.vuy, shear_minor.capacity),
    ] {
        if demand == 0.0 {
            continue;
        }
        match demand_ratio(demand, capacity) {
            Some(ratio) => {
                details.insert(key.to_string(), ratio);
                governing.update(case, ratio);
            }
            None => messages.push(format!("{case} skipped: zero capacity")),
        }
    }
    if forces.tu != 0.0 {
        details.insert("Tu".to_string(), forces.tu.abs());
        messages.push("torsion is reported but not checked".to_string());
    }

    // Interaction, always evaluated
    let (combined, equation) = combined_interaction(axial_ratio, major_ratio, minor_ratio);
    details.insert("ratio_combined".to_string(), combined);
    messages.push(format!("{} = {:.3}", equation.label(), combined));
    governing.update(equation.label(), combined);

    let status = if governing.ratio <= options.dc_limit {
        messages.push(format!("{} governs with D/C = {:.3}", governing.case, governing.ratio));
        DesignStatus::Pass
    } else {
        let message = format!(
            "member {} fails {} with D/C = {:.3} > {:.3}",
            member.id, governing.case, governing.ratio, options.dc_limit
        );
        log::warn!("{message}");
        messages.push(message);
        DesignStatus::Fail
    };

    DesignResult {
        member_id: member.id.clone(),
        ratio: governing.ratio,
        governing_case: governing.case,
        details,
        status,
        messages,
    }
}
