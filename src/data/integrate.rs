//! Peak intensity as the trapezoidal area over an energy window.
use serde::{Deserialize, Serialize};

use super::error::{Result, SpectrumError};
use super::model::{EnergyOrder, Spectrum};

/// The part of a spectrum to integrate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegrationWindow {
    /// Energy bounds, `low < high`. Snapped outwards to the enclosing samples.
    Energy { low: f64, high: f64 },
    /// Sample indices, `first < last`, both inclusive.
    Indices { first: usize, last: usize },
}

impl IntegrationWindow {
    /// A window between two energies given in either order.
    pub fn energies(a: f64, b: f64) -> Result<Self> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if low == high || !low.is_finite() || !high.is_finite() {
            return Err(SpectrumError::DegenerateWindow {
                low,
                high,
                samples: 0,
            });
        }
        Ok(IntegrationWindow::Energy { low, high })
    }

    /// A window between two sample indices given in either order.
    pub fn indices(a: usize, b: usize) -> Result<Self> {
        let (first, last) = (a.min(b), a.max(b));
        if first == last {
            return Err(SpectrumError::DegenerateWindow {
                low: first as f64,
                high: last as f64,
                samples: 1,
            });
        }
        Ok(IntegrationWindow::Indices { first, last })
    }
}

/// The estimated peak area and the window it was actually computed over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityResult {
    /// Trapezoidal area. Negative when the corrected signal is mostly below zero.
    pub area: f64,
    /// Lowest energy of the integrated samples.
    pub energy_low: f64,
    /// Highest energy of the integrated samples.
    pub energy_high: f64,
    /// First integrated sample index (inclusive).
    pub first_index: usize,
    /// Last integrated sample index (inclusive).
    pub last_index: usize,
}

impl IntensityResult {
    pub fn samples(&self) -> usize {
        self.last_index - self.first_index + 1
    }
}

/// Integrate `spectrum` over `window` with the composite trapezoidal rule.
///
/// Energy bounds snap outwards (the low bound down to the nearest sample at or
/// below it, the high bound up to the nearest sample at or above it) and are
/// clamped to the spectrum. Steps are taken as |ΔE|, so a descending axis
/// gives the same area as its ascending mirror.
pub fn integrate(spectrum: &Spectrum, window: &IntegrationWindow) -> Result<IntensityResult> {
    let (first, last) = resolve(spectrum, window)?;

    let energy = &spectrum.energy()[first..=last];
    let intensity = &spectrum.intensity()[first..=last];
    let area: f64 = energy
        .windows(2)
        .zip(intensity.windows(2))
        .map(|(e, y)| 0.5 * (y[0] + y[1]) * (e[1] - e[0]).abs())
        .sum();

    let (a, b) = (spectrum.energy()[first], spectrum.energy()[last]);
    let result = IntensityResult {
        area,
        energy_low: a.min(b),
        energy_high: a.max(b),
        first_index: first,
        last_index: last,
    };
    log::debug!(
        "integrated samples {first}..={last} [{}, {}] eV: {area}",
        result.energy_low,
        result.energy_high
    );
    Ok(result)
}

/// Inclusive index range of the samples covered by `window`.
fn resolve(spectrum: &Spectrum, window: &IntegrationWindow) -> Result<(usize, usize)> {
    let n = spectrum.len();
    let (first, last, low, high) = match ordered(window)? {
        IntegrationWindow::Indices { first, last } => {
            if first >= n {
                let (min, max) = (0.0, (n - 1) as f64);
                return Err(SpectrumError::OutOfRange {
                    low: first as f64,
                    high: last as f64,
                    min,
                    max,
                });
            }
            (first, last.min(n - 1), first as f64, last as f64)
        }
        IntegrationWindow::Energy { low, high } => {
            let (min, max) = spectrum.energy_range();
            if high < min || low > max {
                return Err(SpectrumError::OutOfRange {
                    low,
                    high,
                    min,
                    max,
                });
            }
            let energy = spectrum.energy();
            let (first, last) = match spectrum.order() {
                EnergyOrder::Ascending => {
                    let below = energy.partition_point(|&e| e <= low);
                    let above = energy.partition_point(|&e| e < high);
                    (below.saturating_sub(1), above.min(n - 1))
                }
                EnergyOrder::Descending => {
                    let above = energy.partition_point(|&e| e >= high);
                    let below = energy.partition_point(|&e| e > low);
                    (above.saturating_sub(1), below.min(n - 1))
                }
            };
            (first, last, low, high)
        }
    };

    if last <= first {
        return Err(SpectrumError::DegenerateWindow {
            low,
            high,
            samples: (last + 1).saturating_sub(first),
        });
    }
    Ok((first, last))
}

/// The variants are public, so a window may arrive inverted, empty or with
/// non-finite bounds; route it through the checking constructors.
fn ordered(window: &IntegrationWindow) -> Result<IntegrationWindow> {
    match *window {
        IntegrationWindow::Energy { low, high } => IntegrationWindow::energies(low, high),
        IntegrationWindow::Indices { first, last } => IntegrationWindow::indices(first, last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Spectrum {
        Spectrum::new(vec![0.0, 1.0, 2.0], vec![10.0, 20.0, 10.0]).unwrap()
    }

    fn window(a: f64, b: f64) -> IntegrationWindow {
        IntegrationWindow::energies(a, b).unwrap()
    }

    #[test]
    fn trapezoid_over_full_range() {
        let result = integrate(&triangle(), &window(0.0, 2.0)).unwrap();
        assert_eq!(result.area, 30.0);
        assert_eq!((result.energy_low, result.energy_high), (0.0, 2.0));
        assert_eq!(result.samples(), 3);
    }

    #[test]
    fn bounds_snap_outwards_to_enclosing_samples() {
        let result = integrate(&triangle(), &window(0.4, 1.2)).unwrap();
        assert_eq!((result.first_index, result.last_index), (0, 2));
        assert_eq!(result.area, 30.0);

        let result = integrate(&triangle(), &window(1.0, 1.5)).unwrap();
        assert_eq!((result.first_index, result.last_index), (1, 2));
        assert_eq!(result.area, 15.0);
    }

    #[test]
    fn bounds_are_clamped_to_the_spectrum() {
        let result = integrate(&triangle(), &window(-5.0, 0.5)).unwrap();
        assert_eq!((result.first_index, result.last_index), (0, 1));
        assert_eq!(result.energy_low, 0.0);
        assert_eq!(result.energy_high, 1.0);
    }

    #[test]
    fn irregular_grid() {
        let sp = Spectrum::new(vec![0.0, 0.5, 2.0], vec![2.0, 4.0, 0.0]).unwrap();
        let result = integrate(&sp, &window(0.0, 2.0)).unwrap();
        assert!((result.area - (1.5 + 3.0)).abs() < 1e-12);
    }

    #[test]
    fn descending_axis_matches_ascending_mirror() {
        let asc = Spectrum::new(vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 5.0, 2.0, 0.0]).unwrap();
        let desc = Spectrum::new(vec![4.0, 3.0, 2.0, 1.0], vec![0.0, 2.0, 5.0, 1.0]).unwrap();
        for (a, b) in [(1.0, 4.0), (1.5, 2.5), (2.0, 3.0), (3.2, 9.0)] {
            let ra = integrate(&asc, &window(a, b)).unwrap();
            let rd = integrate(&desc, &window(a, b)).unwrap();
            assert!((ra.area - rd.area).abs() < 1e-12, "[{a}, {b}]");
            assert_eq!((ra.energy_low, ra.energy_high), (rd.energy_low, rd.energy_high));
            assert_eq!(ra.samples(), rd.samples());
        }
        let rd = integrate(&desc, &window(2.5, 3.5)).unwrap();
        assert_eq!((rd.first_index, rd.last_index), (0, 2));
    }

    #[test]
    fn widening_never_decreases_non_negative_area() {
        let sp = Spectrum::new(
            (0..20).map(|i| i as f64 * 0.25).collect(),
            (0..20).map(|i| ((i * 7) % 5) as f64).collect(),
        )
        .unwrap();
        let mut previous = f64::NEG_INFINITY;
        for k in 0..10 {
            let half = 0.3 + k as f64 * 0.25;
            let area = integrate(&sp, &window(2.4 - half, 2.4 + half)).unwrap().area;
            assert!(area >= previous);
            previous = area;
        }
    }

    #[test]
    fn negative_areas_are_reported() {
        let sp = Spectrum::new(vec![0.0, 1.0], vec![-2.0, -4.0]).unwrap();
        assert_eq!(integrate(&sp, &window(0.0, 1.0)).unwrap().area, -3.0);
    }

    #[test]
    fn index_windows() {
        let result = integrate(&triangle(), &IntegrationWindow::indices(2, 1).unwrap()).unwrap();
        assert_eq!(result.area, 15.0);
        assert_eq!((result.energy_low, result.energy_high), (1.0, 2.0));

        let err = integrate(&triangle(), &IntegrationWindow::indices(3, 5).unwrap()).unwrap_err();
        assert!(matches!(err, SpectrumError::OutOfRange { .. }));
    }

    #[test]
    fn window_outside_the_spectrum() {
        let err = integrate(&triangle(), &window(2.5, 3.0)).unwrap_err();
        assert!(matches!(err, SpectrumError::OutOfRange { min, max, .. } if min == 0.0 && max == 2.0));
    }

    #[test]
    fn inverted_variants_are_reordered() {
        let energy = integrate(&triangle(), &IntegrationWindow::Energy { low: 2.0, high: 0.0 }).unwrap();
        assert_eq!(energy.area, 30.0);
        assert_eq!((energy.first_index, energy.last_index), (0, 2));

        let indices =
            integrate(&triangle(), &IntegrationWindow::Indices { first: 2, last: 0 }).unwrap();
        assert_eq!(indices.area, 30.0);
    }

    #[test]
    fn empty_or_non_finite_variants_are_degenerate() {
        let windows = [
            IntegrationWindow::Energy { low: 1.0, high: 1.0 },
            IntegrationWindow::Energy { low: f64::NAN, high: 1.0 },
            IntegrationWindow::Energy { low: 0.0, high: f64::INFINITY },
            IntegrationWindow::Indices { first: 1, last: 1 },
        ];
        for window in windows {
            assert!(
                matches!(
                    integrate(&triangle(), &window),
                    Err(SpectrumError::DegenerateWindow { .. })
                ),
                "{window:?}"
            );
        }
    }

    #[test]
    fn collapsed_windows_are_degenerate() {
        let err = integrate(&triangle(), &window(2.0, 3.0)).unwrap_err();
        assert!(matches!(err, SpectrumError::DegenerateWindow { samples: 1, .. }));
        assert!(matches!(
            IntegrationWindow::energies(1.0, 1.0),
            Err(SpectrumError::DegenerateWindow { .. })
        ));
        assert!(matches!(
            IntegrationWindow::indices(4, 4),
            Err(SpectrumError::DegenerateWindow { .. })
        ));
    }
}
