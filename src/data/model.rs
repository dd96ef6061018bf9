use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// SpectrumPoint – one (energy, intensity) sample or user-picked point
// ---------------------------------------------------------------------------

/// A single point in the energy/intensity plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Binding energy (eV).
    pub energy: f64,
    /// Intensity (counts, or counts above background).
    pub intensity: f64,
}

impl SpectrumPoint {
    pub fn new(energy: f64, intensity: f64) -> Self {
        Self { energy, intensity }
    }
}

impl fmt::Display for SpectrumPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4} eV, {:.2})", self.energy, self.intensity)
    }
}

// ---------------------------------------------------------------------------
// Spectrum – validated, immutable energy/intensity columns
// ---------------------------------------------------------------------------

/// Direction of the energy axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyOrder {
    Ascending,
    Descending,
}

/// An ordered sequence of samples with a strictly monotonic energy axis and
/// at least two samples.
///
/// Intensities may be negative (a background-corrected spectrum); the loader
/// is responsible for rejecting negative raw counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    energy: Vec<f64>,
    intensity: Vec<f64>,
    order: EnergyOrder,
}

impl Spectrum {
    /// Build a spectrum from in-memory columns.
    pub fn new(energy: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        Self::from_columns("<in-memory>", energy, intensity)
    }

    /// Build a spectrum, naming `location` in any validation error.
    pub fn from_columns(location: &str, energy: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        if energy.len() != intensity.len() {
            return Err(SpectrumError::LengthMismatch {
                location: location.to_string(),
                energies: energy.len(),
                intensities: intensity.len(),
            });
        }
        if energy.len() < 2 {
            return Err(SpectrumError::EmptyData {
                location: location.to_string(),
                rows: energy.len(),
            });
        }
        if let Some(i) = energy
            .iter()
            .chain(intensity.iter())
            .position(|v| !v.is_finite())
        {
            let (column, index) = if i < energy.len() {
                ("energy", i)
            } else {
                ("intensity", i - energy.len())
            };
            return Err(SpectrumError::Parse {
                location: location.to_string(),
                line: index + 1,
                reason: format!("{column} value is not finite"),
            });
        }

        let order = if energy[1] > energy[0] {
            EnergyOrder::Ascending
        } else {
            EnergyOrder::Descending
        };
        for (i, pair) in energy.windows(2).enumerate() {
            let ok = match order {
                EnergyOrder::Ascending => pair[1] > pair[0],
                EnergyOrder::Descending => pair[1] < pair[0],
            };
            if !ok {
                return Err(SpectrumError::NotMonotonic {
                    location: location.to_string(),
                    index: i + 1,
                    previous: pair[0],
                    energy: pair[1],
                });
            }
        }

        Ok(Spectrum {
            energy,
            intensity,
            order,
        })
    }

    /// Same energy axis, new intensities. Callers guarantee equal length and
    /// finite values.
    pub(crate) fn with_intensity(&self, intensity: Vec<f64>) -> Spectrum {
        debug_assert_eq!(intensity.len(), self.energy.len());
        Spectrum {
            energy: self.energy.clone(),
            intensity,
            order: self.order,
        }
    }

    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    pub fn order(&self) -> EnergyOrder {
        self.order
    }

    /// Number of samples (always at least 2).
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    pub fn point(&self, index: usize) -> SpectrumPoint {
        SpectrumPoint::new(self.energy[index], self.intensity[index])
    }

    pub fn points(&self) -> impl Iterator<Item = SpectrumPoint> + '_ {
        self.energy
            .iter()
            .zip(self.intensity.iter())
            .map(|(&e, &i)| SpectrumPoint::new(e, i))
    }

    /// `(lowest, highest)` energy regardless of axis direction.
    pub fn energy_range(&self) -> (f64, f64) {
        let first = self.energy[0];
        let last = self.energy[self.energy.len() - 1];
        match self.order {
            EnergyOrder::Ascending => (first, last),
            EnergyOrder::Descending => (last, first),
        }
    }

    /// Smallest distance between adjacent energies.
    pub fn min_step(&self) -> f64 {
        self.energy
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest absolute intensity.
    pub fn max_abs_intensity(&self) -> f64 {
        self.intensity.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Index and value of the sample whose energy is closest to `energy`.
    /// Ties resolve to the lower index.
    pub fn nearest_sample(&self, energy: f64) -> (usize, SpectrumPoint) {
        let index = self
            .energy
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |(best, best_dist), (i, &e)| {
                let dist = (e - energy).abs();
                if dist < best_dist {
                    (i, dist)
                } else {
                    (best, best_dist)
                }
            })
            .0;
        (index, self.point(index))
    }
}

// ---------------------------------------------------------------------------
// Measurement / MeasurementSet – repeated records on a shared axis
// ---------------------------------------------------------------------------

/// A spectrum together with where it was read from.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub location: String,
    pub spectrum: Spectrum,
}

impl Measurement {
    pub fn new(location: impl Into<String>, spectrum: Spectrum) -> Self {
        Self {
            location: location.into(),
            spectrum,
        }
    }
}

/// Spectra that share one energy axis: equal lengths and energies pairwise
/// within ε, where ε is `tolerance` times the smallest energy step of the
/// first member.
#[derive(Debug, Clone)]
pub struct MeasurementSet {
    tolerance: f64,
    members: Vec<Measurement>,
}

impl MeasurementSet {
    /// An empty set that will accept members within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            members: Vec::new(),
        }
    }

    /// Build a set from all `measurements`, failing on the first one whose
    /// axis disagrees with the first member.
    pub fn from_measurements(measurements: Vec<Measurement>, tolerance: f64) -> Result<Self> {
        let mut set = Self::new(tolerance);
        for measurement in measurements {
            set.try_push(measurement)?;
        }
        Ok(set)
    }

    /// Add `measurement` if its energy axis matches the set's reference axis.
    /// On failure the set is left unchanged.
    pub fn try_push(&mut self, measurement: Measurement) -> Result<()> {
        if let Some(reference) = self.members.first() {
            check_axis(reference, &measurement, self.tolerance)?;
        }
        self.members.push(measurement);
        Ok(())
    }

    pub fn members(&self) -> &[Measurement] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Absolute energy tolerance ε, or `None` for an empty set.
    pub fn epsilon(&self) -> Option<f64> {
        self.members
            .first()
            .map(|m| self.tolerance * m.spectrum.min_step())
    }
}

fn check_axis(reference: &Measurement, candidate: &Measurement, tolerance: f64) -> Result<()> {
    let mismatch = |reason: String| SpectrumError::AxisMismatch {
        location: candidate.location.clone(),
        reference: reference.location.clone(),
        reason,
    };

    let expected = reference.spectrum.energy();
    let actual = candidate.spectrum.energy();
    if expected.len() != actual.len() {
        return Err(mismatch(format!(
            "{} samples, expected {}",
            actual.len(),
            expected.len()
        )));
    }

    let epsilon = tolerance * reference.spectrum.min_step();
    if let Some((i, (e, r))) = actual
        .iter()
        .zip(expected.iter())
        .enumerate()
        .find(|(_, (e, r))| (*e - *r).abs() > epsilon)
    {
        return Err(mismatch(format!(
            "sample {} is at {e} eV, expected {r} eV (tolerance {epsilon:.3e} eV)",
            i + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(location: &str, energy: Vec<f64>, intensity: Vec<f64>) -> Measurement {
        Measurement::new(location, Spectrum::new(energy, intensity).unwrap())
    }

    #[test]
    fn rejects_short_and_unsorted_columns() {
        assert!(matches!(
            Spectrum::new(vec![1.0], vec![2.0]),
            Err(SpectrumError::EmptyData { rows: 1, .. })
        ));
        assert!(matches!(
            Spectrum::new(vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]),
            Err(SpectrumError::NotMonotonic { index: 2, .. })
        ));
        assert!(matches!(
            Spectrum::new(vec![0.0, 1.0], vec![1.0]),
            Err(SpectrumError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Spectrum::new(vec![0.0, 1.0], vec![1.0, f64::NAN]),
            Err(SpectrumError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn descending_axis_is_accepted() {
        let sp = Spectrum::new(vec![300.0, 299.5, 299.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sp.order(), EnergyOrder::Descending);
        assert_eq!(sp.energy_range(), (299.0, 300.0));
        assert_eq!(sp.min_step(), 0.5);
    }

    #[test]
    fn nearest_sample_snaps_to_closest_energy() {
        let sp = Spectrum::new(vec![0.0, 1.0, 2.0], vec![5.0, 6.0, 7.0]).unwrap();
        let (index, point) = sp.nearest_sample(1.4);
        assert_eq!(index, 1);
        assert_eq!(point, SpectrumPoint::new(1.0, 6.0));
        assert_eq!(sp.nearest_sample(-10.0).0, 0);
        assert_eq!(sp.nearest_sample(0.5).0, 0);
    }

    #[test]
    fn measurement_set_accepts_axes_within_tolerance() {
        let set = MeasurementSet::from_measurements(
            vec![
                measurement("a", vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]),
                measurement("b", vec![0.001, 1.0, 2.0], vec![1.0, 1.0, 1.0]),
            ],
            0.01,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.epsilon(), Some(0.01));
    }

    #[test]
    fn measurement_set_reports_offending_member() {
        let mut set = MeasurementSet::new(0.01);
        set.try_push(measurement("a", vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]))
            .unwrap();

        let err = set
            .try_push(measurement("b", vec![0.0, 1.5, 2.0], vec![1.0, 1.0, 1.0]))
            .unwrap_err();
        match err {
            SpectrumError::AxisMismatch {
                location,
                reference,
                ..
            } => {
                assert_eq!(location, "b");
                assert_eq!(reference, "a");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = set
            .try_push(measurement("c", vec![0.0, 1.0], vec![1.0, 1.0]))
            .unwrap_err();
        assert!(matches!(err, SpectrumError::AxisMismatch { .. }));
        assert_eq!(set.len(), 1);
    }
}
