use std::path::{Path, PathBuf};

use super::error::{Result, SpectrumError};
use super::model::{Measurement, MeasurementSet, Spectrum};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read one measurement file into a [`Spectrum`].
///
/// See [`parse_measurement`] for the accepted layout.
pub fn load_measurement(path: &Path) -> Result<Spectrum> {
    let location = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| SpectrumError::Io {
        location: location.clone(),
        source,
    })?;
    let text = decode_text(&location, bytes)?;
    let spectrum = parse_measurement(&location, &text)?;
    log::debug!("{location}: {} samples", spectrum.len());
    Ok(spectrum)
}

/// Read every file in `paths` into a [`MeasurementSet`].
///
/// Fails on the first unreadable, malformed or mismatched file; no partial
/// set is returned.
pub fn load_measurement_set<P: AsRef<Path>>(paths: &[P], tolerance: f64) -> Result<MeasurementSet> {
    let mut set = MeasurementSet::new(tolerance);
    for path in paths {
        let path = path.as_ref();
        let spectrum = load_measurement(path)?;
        set.try_push(Measurement::new(path.display().to_string(), spectrum))?;
    }
    Ok(set)
}

/// List the files in `folder` whose extension matches `extension`
/// (case-insensitive), sorted by path.
pub fn measurement_files(folder: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let io_err = |source| SpectrumError::Io {
        location: folder.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// The file was read but is not text: report the line holding the first
/// invalid byte as a parse failure.
fn decode_text(location: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        SpectrumError::Parse {
            location: location.to_string(),
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            reason: "not valid UTF-8 text".to_string(),
        }
    })
}

// ---------------------------------------------------------------------------
// Two-column text parser
// ---------------------------------------------------------------------------

/// Parse a two-column numeric table.
///
/// Layout:
/// * one sample per line: binding energy (eV), then intensity (counts)
/// * fields separated by any run of whitespace and/or commas
/// * blank lines and lines starting with `#` are ignored
/// * the first non-blank line may be a header if none of its fields is numeric
///
/// Intensities are raw counts and must be finite and non-negative.
pub fn parse_measurement(location: &str, text: &str) -> Result<Spectrum> {
    let parse_error = |line: usize, reason: String| SpectrumError::Parse {
        location: location.to_string(),
        line,
        reason,
    };

    let mut energy = Vec::new();
    let mut intensity = Vec::new();
    let mut first_content_line = true;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .collect();

        let is_header = first_content_line && !fields.iter().any(|f| is_finite_number(f));
        first_content_line = false;
        if is_header {
            log::debug!("{location}: skipping header line {line_no}");
            continue;
        }

        if fields.len() != 2 {
            return Err(parse_error(
                line_no,
                format!("expected 2 numeric fields, found {}", fields.len()),
            ));
        }

        let mut values = [0.0_f64; 2];
        for (slot, field) in values.iter_mut().zip(&fields) {
            let value: f64 = field
                .parse()
                .map_err(|_| parse_error(line_no, format!("'{field}' is not a number")))?;
            if !value.is_finite() {
                return Err(parse_error(line_no, format!("'{field}' is not a finite number")));
            }
            *slot = value;
        }

        let [e, counts] = values;
        if counts < 0.0 {
            return Err(parse_error(line_no, format!("negative intensity {counts}")));
        }
        energy.push(e);
        intensity.push(counts);
    }

    Spectrum::from_columns(location, energy, intensity)
}

/// `inf`, `nan` and friends parse as `f64` but are words in a header.
fn is_finite_number(field: &str) -> bool {
    field.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::EnergyOrder;

    #[test]
    fn parses_whitespace_and_comma_columns() {
        let text = "Energy Counts\n290.0 10\n290.5,\t20\n\n# comment\n291.0 , 30\n";
        let sp = parse_measurement("m.txt", text).unwrap();
        assert_eq!(sp.energy(), &[290.0, 290.5, 291.0]);
        assert_eq!(sp.intensity(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn accepts_descending_energy() {
        let sp = parse_measurement("m.txt", "3 1\n2 1\n1 1\n").unwrap();
        assert_eq!(sp.order(), EnergyOrder::Descending);
    }

    #[test]
    fn single_row_is_empty_data() {
        let err = parse_measurement("m.txt", "1.0 2.0\n").unwrap_err();
        assert!(matches!(err, SpectrumError::EmptyData { rows: 1, .. }));

        let err = parse_measurement("m.txt", "").unwrap_err();
        assert!(matches!(err, SpectrumError::EmptyData { rows: 0, .. }));
    }

    #[test]
    fn non_monotonic_energy_is_rejected() {
        let err = parse_measurement("m.txt", "0 1\n2 1\n1 1\n").unwrap_err();
        assert!(matches!(err, SpectrumError::NotMonotonic { index: 2, .. }));

        let err = parse_measurement("m.txt", "0 1\n0 1\n").unwrap_err();
        assert!(matches!(err, SpectrumError::NotMonotonic { .. }));
    }

    #[test]
    fn malformed_rows_report_their_line() {
        let cases = [
            ("0 1\n1 2 3\n", 2),
            ("0 1\n1\n", 2),
            ("0 1\n1 abc\n", 2),
            ("0 1\n1 NaN\n", 2),
            ("0 1\n1 -4\n", 2),
            ("header\nsecond header\n", 2),
        ];
        for (text, line) in cases {
            match parse_measurement("m.txt", text) {
                Err(SpectrumError::Parse { line: l, location, .. }) => {
                    assert_eq!(l, line, "{text:?}");
                    assert_eq!(location, "m.txt");
                }
                other => panic!("{text:?}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn header_must_be_fully_non_numeric() {
        let err = parse_measurement("m.txt", "energy 5\n0 1\n1 1\n").unwrap_err();
        assert!(matches!(err, SpectrumError::Parse { line: 1, .. }));
    }

    #[test]
    fn header_words_that_parse_as_non_finite_are_skipped() {
        for header in ["Energy inf", "nan Infinity", "-inf, NaN"] {
            let text = format!("{header}\n0 1\n1 2\n");
            let sp = parse_measurement("m.txt", &text).unwrap();
            assert_eq!(sp.intensity(), &[1.0, 2.0], "{header:?}");
        }
    }

    #[test]
    fn invalid_utf8_is_a_parse_error_on_its_line() {
        let path = std::env::temp_dir().join(format!(
            "spectral-matters-loader-binary-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, b"0 1\n1 2\n2 \xff\xfe\n").unwrap();
        match load_measurement(&path) {
            Err(SpectrumError::Parse { line, reason, .. }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("spectral-matters-does-not-exist.txt");
        let err = load_measurement(&path).unwrap_err();
        assert!(matches!(err, SpectrumError::Io { .. }));
    }
}
