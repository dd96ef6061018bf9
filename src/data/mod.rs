/// Data layer: core types, loading, and the processing pipeline.
///
/// Architecture:
/// ```text
///  measurement_*.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → MeasurementSet (shared energy axis)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  sum counts per energy → Spectrum
///   └───────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ background  │  two anchors → line, subtract → Spectrum
///   └────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ integrate  │  trapezoid over a window → IntensityResult
///   └───────────┘
/// ```
///
/// Every stage takes its input by reference and returns a new value.

pub mod aggregate;
pub mod background;
pub mod error;
pub mod export;
pub mod integrate;
pub mod loader;
pub mod model;
