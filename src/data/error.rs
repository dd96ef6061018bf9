use thiserror::Error;

/// All the ways loading and processing a spectrum can fail.
///
/// Each variant carries enough context (file, line, point or bounds) to build
/// a precise message for the user. None of them is transient.
#[derive(Debug, Error)]
pub enum SpectrumError {
    #[error("{location}: cannot read file")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{location}, line {line}: {reason}")]
    Parse {
        location: String,
        line: usize,
        reason: String,
    },
    #[error("{location}: {rows} data row(s) found, at least 2 are required")]
    EmptyData { location: String, rows: usize },
    #[error(
        "{location}: energy column is not strictly monotonic at sample {index} ({previous} then {energy})"
    )]
    NotMonotonic {
        location: String,
        index: usize,
        previous: f64,
        energy: f64,
    },
    #[error("{location}: energy has {energies} value(s) but intensity has {intensities}")]
    LengthMismatch {
        location: String,
        energies: usize,
        intensities: usize,
    },
    #[error("{location}: energy axis does not match {reference}: {reason}")]
    AxisMismatch {
        location: String,
        reference: String,
        reason: String,
    },
    #[error("cannot aggregate an empty measurement set")]
    EmptyMeasurementSet,
    #[error("background anchors share the same energy ({energy} eV), a line needs two distinct energies")]
    DegenerateSelection { energy: f64 },
    #[error("background anchor ({energy}, {intensity}) is not a finite point")]
    NonFiniteAnchor { energy: f64, intensity: f64 },
    #[error(
        "background line through ({e1}, {i1}) and ({e2}, {i2}) is not finite: slope {slope}, intercept {intercept}"
    )]
    NonFiniteBackground {
        e1: f64,
        i1: f64,
        e2: f64,
        i2: f64,
        slope: f64,
        intercept: f64,
    },
    #[error(
        "window [{low}, {high}] lies outside the spectrum, which covers [{min}, {max}]"
    )]
    OutOfRange {
        low: f64,
        high: f64,
        min: f64,
        max: f64,
    },
    #[error("window [{low}, {high}] covers {samples} sample(s), at least 2 are required")]
    DegenerateWindow { low: f64, high: f64, samples: usize },
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
