//! Modal and directional combination of response-spectrum results

use std::collections::{BTreeSet, HashMap};

use super::{ResponseSpectrum, SpectrumCache};
use crate::analysis::{DirectionalMethod, ModalCombinationOptions, ModalMethod};
use crate::elements::NodeId;
use crate::error::{EngineError, EngineResult};
use crate::results::{MemberForces, MemberResult, MemberStation, ModalResult, ModeShape, NodeDemand};

/// Frequency ratios closer to 1 than this are treated as identical modes
const SAME_FREQUENCY_TOL: f64 = 1e-6;
/// Denominators and circular frequencies below this are treated as zero
const ZERO_TOL: f64 = 1e-12;

/// CQC cross-modal correlation coefficient ρij (Der Kiureghian)
///
/// Returns 1.0 for identical frequencies and 0.0 when the expression would
/// divide by (nearly) zero.
pub fn cross_modal_damping_coefficient(xi_i: f64, xi_j: f64, omega_i: f64, omega_j: f64) -> f64 {
    if omega_i == omega_j {
        return 1.0;
    }
    if omega_j.abs() < ZERO_TOL {
        return 0.0;
    }
    let r = omega_i / omega_j;
    if (r - 1.0).abs() < SAME_FREQUENCY_TOL {
        return 1.0;
    }
    let numerator = 8.0 * (xi_i * xi_j).sqrt() * (xi_i + r * xi_j) * r.powf(1.5);
    let denominator = (1.0 - r * r).powi(2)
        + 4.0 * xi_i * xi_j * r * (1.0 + r * r)
        + 4.0 * (xi_i * xi_i + xi_j * xi_j) * r * r;
    if denominator.abs() < ZERO_TOL {
        return 0.0;
    }
    numerator / denominator
}

/// Complete quadratic combination with a common damping ratio
pub fn cqc_combination(responses: &[f64], omegas: &[f64], damping: f64) -> f64 {
    let mut sum = 0.0;
    for (&ri, &wi) in responses.iter().zip(omegas) {
        for (&rj, &wj) in responses.iter().zip(omegas) {
            sum += cross_modal_damping_coefficient(damping, damping, wi, wj) * ri * rj;
        }
    }
    sum.max(0.0).sqrt()
}

/// Square root of the sum of squares
pub fn srss_combination(responses: &[f64]) -> f64 {
    responses.iter().map(|r| r * r).sum::<f64>().sqrt()
}

/// Sum of absolute values
pub fn abs_combination(responses: &[f64]) -> f64 {
    responses.iter().map(|r| r.abs()).sum()
}

/// Combine one response quantity over all modes
pub fn combine_modal(responses: &[f64], omegas: &[f64], damping: f64, method: ModalMethod) -> EngineResult<f64> {
    if responses.len() != omegas.len() {
        return Err(EngineError::InvalidInput(format!(
            "{} modal responses for {} modes",
            responses.len(),
            omegas.len()
        )));
    }
    Ok(match method {
        ModalMethod::Cqc => cqc_combination(responses, omegas, damping),
        ModalMethod::Srss => srss_combination(responses),
        ModalMethod::Abs => abs_combination(responses),
    })
}

/// Combine the responses to X, Y and Z excitation into one value
pub fn combine_directional(responses: [f64; 3], method: DirectionalMethod) -> f64 {
    let [x, y, z] = responses.map(f64::abs);
    let percentage = |secondary: f64| {
        [x + secondary * (y + z), y + secondary * (x + z), z + secondary * (x + y)]
            .into_iter()
            .fold(0.0, f64::max)
    };
    match method {
        DirectionalMethod::Srss => (x * x + y * y + z * z).sqrt(),
        DirectionalMethod::Abs => x + y + z,
        DirectionalMethod::Rule100_30 => percentage(0.3),
        DirectionalMethod::Rule100_40 => percentage(0.4),
    }
}

/// Peak modal coordinate of one mode for excitation along `direction`
///
/// Γ·Sa(T)·scale / ω²; modes with ω ≈ 0 contribute nothing.
pub fn modal_response_scale(
    mode: &ModalResult,
    direction: usize,
    spectrum: &ResponseSpectrum,
    acceleration_scale: f64,
    cache: &mut SpectrumCache,
) -> EngineResult<f64> {
    let omega = mode.circular_frequency;
    if omega.abs() < ZERO_TOL || !mode.period.is_finite() {
        return Ok(0.0);
    }
    let gamma = mode.participation.get(direction).copied().ok_or_else(|| {
        EngineError::InvalidInput(format!("excitation direction {direction} out of range"))
    })?;
    let sa = cache.acceleration(spectrum, mode.period)?;
    Ok(gamma * sa * acceleration_scale / (omega * omega))
}

/// Modal scale factors, indexed [direction][mode]; inactive directions are empty
fn direction_scales(
    modes: &[ModalResult],
    spectrum: &ResponseSpectrum,
    options: &ModalCombinationOptions,
    cache: &mut SpectrumCache,
) -> EngineResult<[Vec<f64>; 3]> {
    let mut scales: [Vec<f64>; 3] = Default::default();
    for (direction, active) in options.directions.iter().enumerate() {
        if !active {
            continue;
        }
        scales[direction] = modes
            .iter()
            .map(|mode| modal_response_scale(mode, direction, spectrum, options.acceleration_scale, cache))
            .collect::<EngineResult<_>>()?;
    }
    Ok(scales)
}

/// Combine one quantity given its unit-modal values per mode
fn combine_quantity(
    unit_values: &[f64],
    scales: &[Vec<f64>; 3],
    omegas: &[f64],
    options: &ModalCombinationOptions,
) -> EngineResult<f64> {
    let mut per_direction = [0.0; 3];
    for (direction, scale) in scales.iter().enumerate() {
        if scale.is_empty() {
            continue;
        }
        let responses: Vec<f64> = unit_values.iter().zip(scale).map(|(v, s)| v * s).collect();
        per_direction[direction] = combine_modal(&responses, omegas, options.damping, options.modal_method)?;
    }
    Ok(combine_directional(per_direction, options.directional_method))
}

/// Combined seismic displacement demand at every node in the mode shapes
///
/// Nodes missing from a mode's shape take a zero modal displacement for
/// that mode. Output is sorted by node id.
pub fn combine_node_demands(
    modes: &[ModalResult],
    spectrum: &ResponseSpectrum,
    options: &ModalCombinationOptions,
    cache: &mut SpectrumCache,
) -> EngineResult<Vec<NodeDemand>> {
    let scales = direction_scales(modes, spectrum, options, cache)?;
    let omegas: Vec<f64> = modes.iter().map(|m| m.circular_frequency).collect();
    let nodes: BTreeSet<NodeId> = modes
        .iter()
        .flat_map(|m| m.mode_shapes.iter().map(|s| s.node))
        .collect();
    let lookups: Vec<HashMap<NodeId, &ModeShape>> = modes
        .iter()
        .map(|m| m.mode_shapes.iter().map(|s| (s.node, s)).collect())
        .collect();

    let mut demands = Vec::with_capacity(nodes.len());
    for node in nodes {
        let shapes: Vec<[f64; 6]> = lookups
            .iter()
            .map(|lookup| lookup.get(&node).map_or([0.0; 6], |s| s.components))
            .collect();
        let mut components = [0.0; 6];
        for (dof, value) in components.iter_mut().enumerate() {
            let unit: Vec<f64> = shapes.iter().map(|s| s[dof]).collect();
            *value = combine_quantity(&unit, &scales, &omegas, options)?;
        }
        demands.push(NodeDemand { node, components });
    }

    log::debug!(
        "combined {} modes into {} node demands ({:?}/{:?})",
        modes.len(),
        demands.len(),
        options.modal_method,
        options.directional_method
    );
    Ok(demands)
}

/// Combined seismic member forces per station
///
/// `per_mode[k]` holds the member's station forces for a unit modal
/// coordinate of `modes[k]`; every entry must have the same stations.
pub fn combine_member_demands(
    modes: &[ModalResult],
    per_mode: &[MemberResult],
    spectrum: &ResponseSpectrum,
    options: &ModalCombinationOptions,
    cache: &mut SpectrumCache,
) -> EngineResult<MemberResult> {
    if per_mode.len() != modes.len() {
        return Err(EngineError::InvalidInput(format!(
            "{} member results for {} modes",
            per_mode.len(),
            modes.len()
        )));
    }
    let first = per_mode
        .first()
        .ok_or_else(|| EngineError::InvalidInput("no modal member results".to_string()))?;
    let station_count = first.stations.len();
    if let Some(odd) = per_mode.iter().find(|r| r.stations.len() != station_count) {
        return Err(EngineError::InvalidInput(format!(
            "member {} has {} stations in one mode and {} in another",
            odd.member_id,
            station_count,
            odd.stations.len()
        )));
    }

    let scales = direction_scales(modes, spectrum, options, cache)?;
    let omegas: Vec<f64> = modes.iter().map(|m| m.circular_frequency).collect();

    let mut stations = Vec::with_capacity(station_count);
    for index in 0..station_count {
        let unit_forces: Vec<[f64; 6]> = per_mode.iter().map(|r| r.stations[index].forces.as_array()).collect();
        let mut combined = [0.0; 6];
        for (component, value) in combined.iter_mut().enumerate() {
            let unit: Vec<f64> = unit_forces.iter().map(|f| f[component]).collect();
            *value = combine_quantity(&unit, &scales, &omegas, options)?;
        }
        stations.push(MemberStation {
            position: first.stations[index].position,
            forces: MemberForces::from_array(combined),
        });
    }
    Ok(MemberResult::new(&first.member_id, "RSA", stations))
}
