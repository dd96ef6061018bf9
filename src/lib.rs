//! Numerical core of the Spectral Matters analyzer.
//!
//! Repeated binding-energy/intensity measurements are loaded, summed onto a
//! shared energy axis, corrected for a linear instrumental background and
//! integrated over a chosen energy window to estimate peak intensities.
//!
//! ```
//! use spectral_matters::data::background::{fit_linear_background, subtract};
//! use spectral_matters::data::integrate::{integrate, IntegrationWindow};
//! use spectral_matters::data::model::{Spectrum, SpectrumPoint};
//!
//! let spectrum = Spectrum::new(vec![0.0, 1.0, 2.0], vec![10.0, 25.0, 20.0]).unwrap();
//! let background = fit_linear_background(
//!     SpectrumPoint::new(0.0, 10.0),
//!     SpectrumPoint::new(2.0, 20.0),
//! )
//! .unwrap();
//! let corrected = subtract(&spectrum, &background);
//! let result = integrate(&corrected, &IntegrationWindow::energies(0.0, 2.0).unwrap()).unwrap();
//! assert!((result.area - 10.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod data;

pub use data::error::{Result, SpectrumError};
