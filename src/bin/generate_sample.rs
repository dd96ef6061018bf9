//! Write a folder of synthetic XPS measurements: a C 1s-like doublet on a
//! sloped background, with counting noise.
//!
//! Usage: `generate_sample [out_dir] [count]` (defaults: `sample_data`, 8).

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Expected counts at each energy: linear background plus Gaussian peaks.
fn expected_counts(energies: &[f64], peaks: &[(f64, f64, f64)]) -> Vec<f64> {
    energies
        .iter()
        .map(|&e| {
            let background = 40.0 + 2.5 * (e - 280.0);
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(e, mu, sigma, amp))
                .sum();
            background + signal
        })
        .collect()
}

/// Counting noise for one measurement file: a SplitMix64 stream seeded by the
/// file index, so every file is reproducible on its own.
struct CountNoise {
    state: u64,
    spare: Option<f64>,
}

impl CountNoise {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    fn for_measurement(index: usize) -> Self {
        CountNoise {
            state: (index as u64 + 1).wrapping_mul(Self::GAMMA) ^ 0x5EED_C15,
            spare: None,
        }
    }

    /// Uniform in (0, 1].
    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        ((z >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller; the second value of each pair is kept for the next call.
    fn standard_normal(&mut self) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        let radius = (-2.0 * self.uniform().ln()).sqrt();
        let angle = std::f64::consts::TAU * self.uniform();
        self.spare = Some(radius * angle.sin());
        radius * angle.cos()
    }

    /// Observed counts around `expected`: normal approximation of Poisson
    /// statistics, rounded and never negative.
    fn sample(&mut self, expected: f64) -> f64 {
        let spread = expected.max(0.0).sqrt();
        (expected + spread * self.standard_normal()).round().max(0.0)
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "sample_data".to_string()));
    let count: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("'{n}' is not a file count"))?,
        None => 8,
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    // Binding energy: 295 → 280 eV, step 0.05 (descending, as analyzers scan)
    let energies: Vec<f64> = (0..=300).map(|i| 295.0 - i as f64 * 0.05).collect();
    let peaks = [(284.8, 0.45, 180.0), (286.4, 0.5, 60.0)];
    let expected = expected_counts(&energies, &peaks);

    for i in 1..=count {
        let mut noise = CountNoise::for_measurement(i);
        let mut text = String::from("BindingEnergy Counts\n");
        for (&e, &mu) in energies.iter().zip(&expected) {
            writeln!(text, "{e:.2} {}", noise.sample(mu))?;
        }
        let path = out_dir.join(format!("measurement_{i}.txt"));
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Wrote {count} measurements ({} energies each) to {}",
        energies.len(),
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(index: usize) -> Vec<f64> {
        let mut noise = CountNoise::for_measurement(index);
        (0..64).map(|_| noise.sample(100.0)).collect()
    }

    #[test]
    fn each_measurement_has_its_own_reproducible_stream() {
        assert_eq!(draw(3), draw(3));
        assert_ne!(draw(1), draw(2));
    }

    #[test]
    fn counts_are_whole_and_non_negative() {
        let mut noise = CountNoise::for_measurement(7);
        for expected in [0.0, 0.4, 2.0, 50.0, 1e4] {
            for _ in 0..200 {
                let c = noise.sample(expected);
                assert!(c >= 0.0 && c.fract() == 0.0, "{expected}: {c}");
            }
        }
    }

    #[test]
    fn spread_follows_counting_statistics() {
        let mut noise = CountNoise::for_measurement(1);
        let n = 4000;
        let draws: Vec<f64> = (0..n).map(|_| noise.sample(400.0)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 400.0).abs() < 3.0, "mean {mean}");
        assert!((var.sqrt() - 20.0).abs() < 2.0, "std {}", var.sqrt());
    }
}
