//! Governing design forces from member station results

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::results::MemberResult;

/// Worst-case forces of one member across all combinations and stations
///
/// `pu` keeps its sign (positive = tension); all other values are absolute
/// maxima. `muy`/`vuz` act about/along the strong axis, `muz`/`vuy` about/along
/// the weak axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoverningForces {
    pub pu: f64,
    pub muy: f64,
    pub muz: f64,
    pub vuy: f64,
    pub vuz: f64,
    pub tu: f64,
}

impl GoverningForces {
    pub fn axial(pu: f64) -> Self {
        Self { pu, ..Self::default() }
    }

    pub fn with_moments(mut self, muy: f64, muz: f64) -> Self {
        self.muy = muy;
        self.muz = muz;
        self
    }

    pub fn with_shears(mut self, vuy: f64, vuz: f64) -> Self {
        self.vuy = vuy;
        self.vuz = vuz;
        self
    }

    pub fn with_torsion(mut self, tu: f64) -> Self {
        self.tu = tu;
        self
    }
}

/// Force envelope of one member with the combination that set its axial force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceEnvelope {
    pub member_id: String,
    pub forces: GoverningForces,
    /// Combination producing the governing axial force
    pub axial_combination: String,
    /// Number of stations scanned
    pub stations: usize,
}

impl ForceEnvelope {
    /// Envelope over every station of every combination of one member
    pub fn from_results(results: &[MemberResult]) -> EngineResult<Self> {
        let first = results
            .first()
            .ok_or_else(|| EngineError::InvalidInput("no member results to envelope".to_string()))?;
        if let Some(other) = results.iter().find(|r| r.member_id != first.member_id) {
            return Err(EngineError::InvalidInput(format!(
                "cannot envelope members {} and {} together",
                first.member_id, other.member_id
            )));
        }

        let mut forces = GoverningForces::default();
        let mut axial_combination = first.combination.clone();
        let mut stations = 0;
        for result in results {
            for station in &result.stations {
                let f = &station.forces;
                if f.axial.abs() > forces.pu.abs() {
                    forces.pu = f.axial;
                    axial_combination = result.combination.clone();
                }
                forces.muy = forces.muy.max(f.moment_y.abs());
                forces.muz = forces.muz.max(f.moment_z.abs());
                forces.vuy = forces.vuy.max(f.shear_y.abs());
                forces.vuz = forces.vuz.max(f.shear_z.abs());
                forces.tu = forces.tu.max(f.torsion.abs());
                stations += 1;
            }
        }

        Ok(Self {
            member_id: first.member_id.clone(),
            forces,
            axial_combination,
            stations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{MemberForces, MemberStation};

    fn result(combo: &str, rows: &[[f64; 6]]) -> MemberResult {
        let stations = rows
            .iter()
            .enumerate()
            .map(|(i, &row)| MemberStation {
                position: i as f64 / (rows.len() - 1).max(1) as f64,
                forces: MemberForces::from_array(row),
            })
            .collect();
        MemberResult::new("B1", combo, stations)
    }

    #[test]
    fn test_envelope_keeps_axial_sign() {
        let results = [
            result("1.4D", &[[200.0, 1.0, -5.0, 0.0, -40.0, 2.0], [200.0, 1.0, 5.0, 0.0, 60.0, -3.0]]),
            result("1.2D+1.0E", &[[-350.0, -4.0, 2.0, 7.0, 10.0, 0.0], [-350.0, 2.0, 8.0, -9.0, -20.0, 1.0]]),
        ];
        let env = ForceEnvelope::from_results(&results).unwrap();
        assert_eq!(env.forces.pu, -350.0);
        assert_eq!(env.axial_combination, "1.2D+1.0E");
        assert_eq!(env.forces.muy, 60.0);
        assert_eq!(env.forces.muz, 3.0);
        assert_eq!(env.forces.vuy, 4.0);
        assert_eq!(env.forces.vuz, 8.0);
        assert_eq!(env.forces.tu, 9.0);
        assert_eq!(env.stations, 4);
    }

    #[test]
    fn test_envelope_rejects_mixed_members() {
        let mut other = result("1.4D", &[[0.0; 6]]);
        other.member_id = "B2".to_string();
        let results = [result("1.4D", &[[0.0; 6]]), other];
        assert!(ForceEnvelope::from_results(&results).is_err());
        assert!(ForceEnvelope::from_results(&[]).is_err());
    }
}
