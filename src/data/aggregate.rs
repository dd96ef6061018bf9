//! Combine repeated measurements on a shared energy axis into one spectrum.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::{Result, SpectrumError};
use super::model::{MeasurementSet, Spectrum};

/// How intensities at one energy are combined across measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// Accumulate counts. Keeps the counting statistics of the combined
    /// acquisition.
    #[default]
    Sum,
    /// Average counts, comparable in magnitude to a single measurement.
    Mean,
}

/// Combine every member of `set` sample by sample.
///
/// The result does not depend on the order of the members: at each energy the
/// values are sorted before a compensated sum, and the output axis is the
/// lexicographically smallest member axis (all axes agree within the set's
/// tolerance, and are identical in the common case).
pub fn aggregate(set: &MeasurementSet, policy: AggregationPolicy) -> Result<Spectrum> {
    let members = set.members();
    let axis_source = members
        .iter()
        .map(|m| &m.spectrum)
        .min_by(|a, b| compare_axes(a.energy(), b.energy()))
        .ok_or(SpectrumError::EmptyMeasurementSet)?;

    let n_samples = axis_source.len();
    let mut column = Vec::with_capacity(members.len());
    let intensity: Vec<f64> = (0..n_samples)
        .map(|i| {
            column.clear();
            column.extend(members.iter().map(|m| m.spectrum.intensity()[i]));
            column.sort_by(f64::total_cmp);
            let total = compensated_sum(&column);
            match policy {
                AggregationPolicy::Sum => total,
                AggregationPolicy::Mean => total / members.len() as f64,
            }
        })
        .collect();

    log::debug!(
        "aggregated {} measurement(s) of {} samples ({:?})",
        members.len(),
        n_samples,
        policy
    );
    Ok(axis_source.with_intensity(intensity))
}

fn compare_axes(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Neumaier summation.
fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
