use super::error::{Result, SpectrumError};
use super::model::{Spectrum, SpectrumPoint};

/// A linear instrumental baseline, `intensity = slope * energy + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundModel {
    pub slope: f64,
    pub intercept: f64,
    anchors: Option<[SpectrumPoint; 2]>,
}

impl BackgroundModel {
    /// A background given directly by its coefficients. The line through
    /// `(0, intercept)` and `(1, slope + intercept)` is reported on failure.
    pub fn from_line(slope: f64, intercept: f64) -> Result<Self> {
        if !(slope.is_finite() && intercept.is_finite()) {
            return Err(SpectrumError::NonFiniteBackground {
                e1: 0.0,
                i1: intercept,
                e2: 1.0,
                i2: slope + intercept,
                slope,
                intercept,
            });
        }
        Ok(Self {
            slope,
            intercept,
            anchors: None,
        })
    }

    /// Baseline value at `energy`.
    pub fn evaluate(&self, energy: f64) -> f64 {
        self.slope * energy + self.intercept
    }

    /// The two points the line was fitted through, if any.
    pub fn anchors(&self) -> Option<[SpectrumPoint; 2]> {
        self.anchors
    }
}

/// Fit the line through two anchor points.
///
/// The anchors need not be samples of any spectrum.
pub fn fit_linear_background(p1: SpectrumPoint, p2: SpectrumPoint) -> Result<BackgroundModel> {
    if let Some(p) = [p1, p2]
        .into_iter()
        .find(|p| !(p.energy.is_finite() && p.intensity.is_finite()))
    {
        return Err(SpectrumError::NonFiniteAnchor {
            energy: p.energy,
            intensity: p.intensity,
        });
    }

    let scale = p1.energy.abs().max(p2.energy.abs()).max(1.0);
    if (p2.energy - p1.energy).abs() <= f64::EPSILON * scale {
        return Err(SpectrumError::DegenerateSelection { energy: p1.energy });
    }

    let slope = (p2.intensity - p1.intensity) / (p2.energy - p1.energy);
    let intercept = p1.intensity - slope * p1.energy;
    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(SpectrumError::NonFiniteBackground {
            e1: p1.energy,
            i1: p1.intensity,
            e2: p2.energy,
            i2: p2.intensity,
            slope,
            intercept,
        });
    }
    log::debug!("background through {p1} and {p2}: slope {slope}, intercept {intercept}");
    Ok(BackgroundModel {
        slope,
        intercept,
        anchors: Some([p1, p2]),
    })
}

/// Subtract `model` from every sample of `spectrum`; the energy axis is kept.
/// The result may contain negative intensities.
pub fn subtract(spectrum: &Spectrum, model: &BackgroundModel) -> Spectrum {
    let corrected = spectrum
        .points()
        .map(|p| p.intensity - model.evaluate(p.energy))
        .collect();
    spectrum.with_intensity(corrected)
}
