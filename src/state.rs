use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use spectral_matters::config::AnalyzerConfig;
use spectral_matters::data::aggregate::aggregate;
use spectral_matters::data::background::{fit_linear_background, subtract, BackgroundModel};
use spectral_matters::data::export::{save_peak_report, save_spectrum_csv};
use spectral_matters::data::integrate::{integrate, IntegrationWindow, IntensityResult};
use spectral_matters::data::loader::{load_measurement, measurement_files};
use spectral_matters::data::model::{Measurement, MeasurementSet, Spectrum, SpectrumPoint};

// ---------------------------------------------------------------------------
// Session pieces
// ---------------------------------------------------------------------------

/// What a click on the plot is currently used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    /// Collecting two anchors for the linear background.
    Background,
    /// Collecting the two ends of an integration window.
    Interval,
}

/// Which files of the last loaded folder were used.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub folder: PathBuf,
    pub loaded: Vec<String>,
    /// File name and the reason it was skipped.
    pub faulty: Vec<(String, String)>,
}

/// An integrated window, kept for highlighting and the results table.
#[derive(Debug, Clone)]
pub struct PeakRegion {
    pub result: IntensityResult,
    pub points: Vec<SpectrumPoint>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering. Holds only the latest
/// spectrum; the numerical core never sees this struct.
pub struct AppState {
    pub config: AnalyzerConfig,

    /// Current spectrum (aggregated, then background-corrected).
    pub spectrum: Option<Spectrum>,

    pub load_report: Option<LoadReport>,

    pub selection: Selection,

    /// Points picked so far for the active selection.
    pub picked: Vec<SpectrumPoint>,

    /// Integrated windows on the current spectrum.
    pub peaks: Vec<PeakRegion>,

    /// Running log shown in the message panel.
    pub messages: Vec<String>,

    /// Last error, shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            spectrum: None,
            load_report: None,
            selection: Selection::Idle,
            picked: Vec::new(),
            peaks: Vec::new(),
            messages: Vec::new(),
            status_message: None,
        }
    }

    pub fn message(&mut self, text: impl Into<String>) {
        self.messages.push(text.into());
    }

    /// Record a failed action.
    pub fn fail(&mut self, err: anyhow::Error) {
        log::error!("{err:#}");
        self.message(format!("Error: {err:#}"));
        self.status_message = Some(format!("Error: {err:#}"));
    }

    /// Drop the data and every derived value; settings are kept.
    pub fn reset(&mut self) {
        self.spectrum = None;
        self.load_report = None;
        self.peaks.clear();
        self.cancel_selection();
    }

    pub fn cancel_selection(&mut self) {
        self.selection = Selection::Idle;
        self.picked.clear();
    }

    fn current_spectrum(&self) -> Result<&Spectrum> {
        self.spectrum.as_ref().context("Please load data first.")
    }

    // -- Load Data --

    /// Read every measurement file in `folder` and sum them.
    ///
    /// Unreadable files and files whose energy axis does not match the first
    /// good file are skipped and listed in the report; the load fails only
    /// when no file is usable.
    pub fn load_folder(&mut self, folder: &Path) -> Result<()> {
        let files = measurement_files(folder, &self.config.measurement_extension)
            .with_context(|| format!("listing {}", folder.display()))?;

        let folder_name = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| folder.display().to_string());
        self.message(format!(
            "{folder_name} contains {} measurement file(s).",
            files.len()
        ));

        let mut report = LoadReport {
            folder: folder.to_path_buf(),
            ..LoadReport::default()
        };
        let mut set = MeasurementSet::new(self.config.axis_tolerance);

        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let pushed = load_measurement(path)
                .and_then(|spectrum| set.try_push(Measurement::new(name.clone(), spectrum)));
            match pushed {
                Ok(()) => report.loaded.push(name),
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    report.faulty.push((name, e.to_string()));
                }
            }
        }

        if set.is_empty() {
            self.reset();
            self.load_report = Some(report);
            bail!("No valid data found in {}", folder.display());
        }

        let spectrum = aggregate(&set, self.config.aggregation)?;
        log::info!(
            "loaded {} of {} file(s) from {}",
            report.loaded.len(),
            files.len(),
            folder.display()
        );
        self.message(format!(
            "Loaded {} file(s), {} samples each ({:?} of counts).",
            report.loaded.len(),
            spectrum.len(),
            self.config.aggregation
        ));
        if !report.faulty.is_empty() {
            self.message("The following files could not be processed:");
            let lines: Vec<String> = report
                .faulty
                .iter()
                .map(|(name, reason)| format!("  - {name}: {reason}"))
                .collect();
            self.messages.extend(lines);
        }

        self.spectrum = Some(spectrum);
        self.load_report = Some(report);
        self.peaks.clear();
        self.cancel_selection();
        self.status_message = None;
        Ok(())
    }

    // -- Point selection --

    pub fn begin_background_selection(&mut self) -> Result<()> {
        self.current_spectrum()?;
        self.peaks.clear();
        self.picked.clear();
        self.selection = Selection::Background;
        self.message("Select two points on the plot for background removal.");
        Ok(())
    }

    pub fn begin_interval_selection(&mut self) -> Result<()> {
        self.current_spectrum()?;
        self.picked.clear();
        self.selection = Selection::Interval;
        self.message("Select the interval on the plot to calculate intensity.");
        Ok(())
    }

    /// Handle a click at plot coordinates `(energy, intensity)`.
    ///
    /// The click snaps to the nearest sample and is ignored when it is too
    /// far from the curve or repeats the previous point. The second accepted
    /// point runs the pending action.
    pub fn pick_point(&mut self, energy: f64, intensity: f64) -> Result<()> {
        if self.selection == Selection::Idle {
            return Ok(());
        }
        let spectrum = self.current_spectrum()?;
        let (_, nearest) = spectrum.nearest_sample(energy);
        let tolerance = self.config.pick_tolerance * spectrum.max_abs_intensity();

        if (nearest.intensity - intensity).abs() > tolerance {
            self.message("Selected point is not on the line. Please try again.");
            return Ok(());
        }
        if self.picked.last() == Some(&nearest) {
            return Ok(());
        }

        self.picked.push(nearest);
        self.message(format!("You selected: {nearest}"));
        if self.picked.len() < 2 {
            return Ok(());
        }

        let (first, second) = (self.picked[0], self.picked[1]);
        let action = self.selection;
        self.cancel_selection();
        match action {
            Selection::Background => self.remove_background(first, second).map(|_| ()),
            Selection::Interval => self
                .calculate_intensity(first.energy, second.energy)
                .map(|_| ()),
            Selection::Idle => Ok(()),
        }
    }

    // -- Remove Linear Background --

    pub fn remove_background(
        &mut self,
        first: SpectrumPoint,
        second: SpectrumPoint,
    ) -> Result<BackgroundModel> {
        let spectrum = self.current_spectrum()?;
        let model = fit_linear_background(first, second)?;
        let corrected = subtract(spectrum, &model);

        log::info!(
            "background removed: slope {}, intercept {}",
            model.slope,
            model.intercept
        );
        self.message(format!(
            "The slope is {} and the intercept is {}.",
            model.slope, model.intercept
        ));
        self.message("Linear background removed successfully.");
        self.spectrum = Some(corrected);
        self.peaks.clear();
        Ok(model)
    }

    // -- Calculate Intensities --

    pub fn calculate_intensity(&mut self, a: f64, b: f64) -> Result<IntensityResult> {
        let spectrum = self.current_spectrum()?;
        let result = integrate(spectrum, &IntegrationWindow::energies(a, b)?)?;
        let points = (result.first_index..=result.last_index)
            .map(|i| spectrum.point(i))
            .collect();

        log::info!(
            "intensity {} over [{}, {}] eV",
            result.area,
            result.energy_low,
            result.energy_high
        );
        self.message(format!(
            "Calculated Intensity: {:.2} over [{:.3}, {:.3}] eV ({} samples)",
            result.area,
            result.energy_low,
            result.energy_high,
            result.samples()
        ));
        self.peaks.push(PeakRegion { result, points });
        Ok(result)
    }

    // -- Save Data --

    /// Write the current spectrum as CSV; with integrated peaks, also write a
    /// JSON report next to it. Returns the CSV path.
    pub fn save(&mut self, path: &Path) -> Result<PathBuf> {
        let spectrum = self.current_spectrum()?;
        let csv_path = if path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        {
            path.to_path_buf()
        } else {
            let mut p = path.as_os_str().to_owned();
            p.push(".csv");
            PathBuf::from(p)
        };
        save_spectrum_csv(&csv_path, spectrum)?;

        if !self.peaks.is_empty() {
            let results: Vec<IntensityResult> = self.peaks.iter().map(|p| p.result).collect();
            save_peak_report(&csv_path.with_extension("peaks.json"), &results)?;
        }

        log::info!("saved {}", csv_path.display());
        self.message(format!("Data saved successfully to {}.", csv_path.display()));
        Ok(csv_path)
    }
}
