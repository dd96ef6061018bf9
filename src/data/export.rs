use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::integrate::IntensityResult;
use super::model::Spectrum;

#[derive(Serialize)]
struct Row {
    energy_ev: f64,
    intensity: f64,
}

/// Write `spectrum` as CSV with an `energy_ev,intensity` header.
pub fn write_spectrum<W: Write>(writer: W, spectrum: &Spectrum) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for p in spectrum.points() {
        csv_writer
            .serialize(Row {
                energy_ev: p.energy,
                intensity: p.intensity,
            })
            .context("writing CSV row")?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write `spectrum` to a CSV file at `path`.
pub fn save_spectrum_csv(path: &Path, spectrum: &Spectrum) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_spectrum(file, spectrum).with_context(|| format!("writing {}", path.display()))
}

#[derive(Serialize)]
struct PeakReport<'a> {
    peaks: &'a [IntensityResult],
}

/// Write the integrated peaks as pretty JSON to `path`.
pub fn save_peak_report(path: &Path, peaks: &[IntensityResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(&PeakReport { peaks }).context("encoding peak report")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let sp = Spectrum::new(vec![290.0, 290.5], vec![12.0, -1.5]).unwrap();
        let mut buffer = Vec::new();
        write_spectrum(&mut buffer, &sp).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "energy_ev,intensity\n290.0,12.0\n290.5,-1.5\n");
    }
}
