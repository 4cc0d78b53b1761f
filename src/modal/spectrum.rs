//! Response spectra: interpolation, code-based synthesis and memoization

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One (period, spectral acceleration) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Period (s)
    pub period: f64,
    /// Spectral acceleration
    pub acceleration: f64,
}

impl SpectrumPoint {
    pub fn new(period: f64, acceleration: f64) -> Self {
        Self { period, acceleration }
    }
}

/// A design response spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpectrum {
    pub name: String,
    pub points: Vec<SpectrumPoint>,
    /// Damping ratio the spectrum was defined for
    pub damping: f64,
}

impl ResponseSpectrum {
    pub fn new(name: &str, points: Vec<SpectrumPoint>, damping: f64) -> Self {
        Self {
            name: name.to_string(),
            points,
            damping,
        }
    }

    /// Spectral acceleration at `period`, see [`interpolate_spectrum`]
    pub fn acceleration_at(&self, period: f64) -> EngineResult<f64> {
        interpolate_spectrum(&self.points, period)
    }
}

/// Spectral acceleration at `period`
///
/// Points are sorted by period first; queries outside the defined range
/// return the boundary value, anything in between is interpolated linearly.
pub fn interpolate_spectrum(points: &[SpectrumPoint], period: f64) -> EngineResult<f64> {
    if points.is_empty() {
        return Err(EngineError::InvalidInput("response spectrum has no points".to_string()));
    }
    if !period.is_finite() {
        return Err(EngineError::InvalidInput(format!("period must be finite, got {period}")));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.period.total_cmp(&b.period));

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];
    if period <= first.period {
        return Ok(first.acceleration);
    }
    if period >= last.period {
        return Ok(last.acceleration);
    }

    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if period >= a.period && period <= b.period {
            let span = b.period - a.period;
            if span <= 0.0 {
                return Ok(b.acceleration);
            }
            let t = (period - a.period) / span;
            return Ok(a.acceleration + t * (b.acceleration - a.acceleration));
        }
    }
    Ok(last.acceleration)
}

/// Code parameters for a synthesized design spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumParameters {
    /// Effective peak ground acceleration coefficient A0
    pub a0: f64,
    /// Site factor S
    pub site_factor: f64,
    /// Corner period of the ascending branch T0 (s)
    pub t0: f64,
    /// End of the plateau Tp (s)
    pub tp: f64,
    /// Decay exponent n of the descending branch
    pub exponent: f64,
    /// Importance factor I
    pub importance: f64,
    /// Response modification factor R0
    pub r0: f64,
    /// Number of discrete points over [0, max_period]
    pub points: usize,
    pub max_period: f64,
}

impl Default for SpectrumParameters {
    fn default() -> Self {
        Self {
            a0: 0.4,
            site_factor: 1.0,
            t0: 0.15,
            tp: 0.6,
            exponent: 0.8,
            importance: 1.0,
            r0: 4.0,
            points: 61,
            max_period: 6.0,
        }
    }
}

impl SpectrumParameters {
    pub fn new(a0: f64, site_factor: f64, t0: f64, tp: f64) -> Self {
        Self {
            a0,
            site_factor,
            t0,
            tp,
            ..Self::default()
        }
    }

    pub fn with_factors(mut self, importance: f64, r0: f64) -> Self {
        self.importance = importance;
        self.r0 = r0;
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Elastic spectral acceleration before importance/response scaling
    fn elastic_acceleration(&self, period: f64) -> f64 {
        let peak = self.a0 * self.site_factor;
        if period <= self.t0 {
            peak * (1.0 + 1.5 * period / self.t0)
        } else if period <= self.tp {
            2.5 * peak
        } else {
            2.5 * peak * (self.tp / period).powf(self.exponent)
        }
    }

    /// Discretize the design spectrum, scaled by I / (R0 * 0.9)
    pub fn synthesize(&self, name: &str, damping: f64) -> EngineResult<ResponseSpectrum> {
        if self.r0 <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "response modification factor must be positive, got {}",
                self.r0
            )));
        }
        if self.points < 2 {
            return Err(EngineError::InvalidInput(format!(
                "spectrum needs at least 2 points, got {}",
                self.points
            )));
        }
        if !(self.t0 > 0.0 && self.tp >= self.t0 && self.max_period > 0.0) {
            return Err(EngineError::InvalidInput(format!(
                "characteristic periods must satisfy 0 < T0 <= Tp, got T0 = {}, Tp = {}",
                self.t0, self.tp
            )));
        }

        let scale = self.importance / (self.r0 * 0.9);
        let step = self.max_period / (self.points - 1) as f64;
        let points = (0..self.points)
            .map(|i| {
                let period = step * i as f64;
                SpectrumPoint::new(period, self.elastic_acceleration(period) * scale)
            })
            .collect();
        Ok(ResponseSpectrum::new(name, points, damping))
    }
}

/// Memoized spectral accelerations keyed by (spectrum name, period in µs)
///
/// Owned by the caller and passed explicitly; entries never outlive it.
#[derive(Debug, Default)]
pub struct SpectrumCache {
    values: HashMap<(String, i64), f64>,
    hits: usize,
}

impl SpectrumCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acceleration(&mut self, spectrum: &ResponseSpectrum, period: f64) -> EngineResult<f64> {
        let key = (spectrum.name.clone(), (period * 1e6).round() as i64);
        if let Some(&value) = self.values.get(&key) {
            self.hits += 1;
            return Ok(value);
        }
        let value = spectrum.acceleration_at(period)?;
        self.values.insert(key, value);
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.hits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unsorted() -> Vec<SpectrumPoint> {
        vec![
            SpectrumPoint::new(1.0, 0.5),
            SpectrumPoint::new(0.0, 0.2),
            SpectrumPoint::new(0.5, 1.0),
        ]
    }

    #[test]
    fn test_interpolation_between_points() {
        assert_relative_eq!(interpolate_spectrum(&unsorted(), 0.25).unwrap(), 0.6, epsilon = 1e-12);
        assert_relative_eq!(interpolate_spectrum(&unsorted(), 0.75).unwrap(), 0.75, epsilon = 1e-12);
        assert_eq!(interpolate_spectrum(&unsorted(), 0.5).unwrap(), 1.0);
    }

    #[test]
    fn test_interpolation_clamps_outside_range() {
        assert_eq!(interpolate_spectrum(&unsorted(), -1.0).unwrap(), 0.2);
        assert_eq!(interpolate_spectrum(&unsorted(), 3.0).unwrap(), 0.5);
    }

    #[test]
    fn test_empty_spectrum_is_an_error() {
        assert!(interpolate_spectrum(&[], 1.0).is_err());
    }

    #[test]
    fn test_synthesized_branches() {
        let params = SpectrumParameters::default();
        let spectrum = params.synthesize("design", 0.05).unwrap();
        assert_eq!(spectrum.points.len(), 61);
        let scale = 1.0 / (4.0 * 0.9);
        assert_relative_eq!(spectrum.points[0].acceleration, 0.4 * scale, epsilon = 1e-12);
        // 0.3 s lies on the plateau
        assert_relative_eq!(spectrum.acceleration_at(0.3).unwrap(), 1.0 * scale, epsilon = 1e-12);
        let expected = 1.0 * (0.6_f64 / 1.2).powf(0.8) * scale;
        assert_relative_eq!(spectrum.acceleration_at(1.2).unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(spectrum.points[60].period, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ascending_branch_is_continuous_with_plateau() {
        let params = SpectrumParameters::default();
        assert_relative_eq!(params.elastic_acceleration(params.t0), 2.5 * 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_synthesis_rejects_bad_parameters() {
        let zero_r = SpectrumParameters::default().with_factors(1.0, 0.0);
        assert!(matches!(zero_r.synthesize("x", 0.05), Err(EngineError::InvalidInput(_))));
        let one_point = SpectrumParameters::default().with_points(1);
        assert!(one_point.synthesize("x", 0.05).is_err());
    }

    #[test]
    fn test_cache_reuses_quantized_period() {
        let spectrum = ResponseSpectrum::new("s", unsorted(), 0.05);
        let mut cache = SpectrumCache::new();
        let a = cache.acceleration(&spectrum, 0.25).unwrap();
        let b = cache.acceleration(&spectrum, 0.25 + 1e-9).unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
