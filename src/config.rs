// Growth parameters, their defaults and file loading

use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::geometry::Point;
use crate::neuron::{ArborRules, DEFAULT_SPROUTS};

/// Files probed by [`GrowthConfig::from_default_paths`], in order.
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = ["neurogrow.yaml", "neurogrow.yml", "neurogrow.json"];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    // Step counts
    pub dendrite_steps: usize,
    pub axon_steps: usize,

    // Seed lengths
    pub initial_dendrite_length: f64,
    pub initial_axon_length: f64,

    // Growth rate ranges (inclusive), multiplied into the parent length
    pub dendrite_growth_range: (f64, f64),
    pub axon_growth_range: (f64, f64),

    // Operation choice. Dendrites: extend if choice > extend, else branch if
    // choice > branch, else skip. Axons: extend if choice > extend, else branch.
    pub dendrite_extend_threshold: f64,
    pub dendrite_branch_threshold: f64,
    pub axon_extend_threshold: f64,

    // Angles (degrees)
    pub dendrite_angle_variation: f64,
    pub axon_angle_variation: f64,
    pub dendrite_branch_offset: f64,
    pub axon_branch_offset: f64,
    pub sprout_count: usize,

    // Soma
    pub position: [f64; 2],

    // Randomness; None draws a seed from the OS
    pub seed: Option<u64>,

    // Display
    pub steps_per_frame: usize,
    pub window_size: u32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            dendrite_steps: 100,
            axon_steps: 100,
            initial_dendrite_length: 5.0,
            initial_axon_length: 10.0,
            dendrite_growth_range: (0.5, 1.0),
            axon_growth_range: (0.5, 1.1),
            dendrite_extend_threshold: 0.1,
            dendrite_branch_threshold: 0.4,
            axon_extend_threshold: 0.2,
            dendrite_angle_variation: ArborRules::DENDRITE.angle_variation,
            axon_angle_variation: ArborRules::AXON.angle_variation,
            dendrite_branch_offset: ArborRules::DENDRITE.branch_offset,
            axon_branch_offset: ArborRules::AXON.branch_offset,
            sprout_count: DEFAULT_SPROUTS,
            position: [0.0, 0.0],
            seed: None,
            steps_per_frame: 1,
            window_size: 800,
        }
    }
}

impl GrowthConfig {
    /// Load from a YAML or JSON file (picked by extension). Missing keys
    /// keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GrowthConfig = match ext.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// First readable file among [`DEFAULT_CONFIG_PATHS`] in `dir`, or defaults.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        for name in DEFAULT_CONFIG_PATHS {
            let candidate = dir.as_ref().join(name);
            if !candidate.exists() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "ignoring config file");
                }
            }
        }
        Self::default()
    }

    pub fn from_default_paths() -> Self {
        Self::from_dir(".")
    }

    pub fn validate(&self) -> Result<()> {
        check_range("dendrite_growth_range", self.dendrite_growth_range)?;
        check_range("axon_growth_range", self.axon_growth_range)?;
        for (name, value) in [
            ("dendrite_extend_threshold", self.dendrite_extend_threshold),
            ("dendrite_branch_threshold", self.dendrite_branch_threshold),
            ("axon_extend_threshold", self.axon_extend_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        for (name, value) in [
            ("initial_dendrite_length", self.initial_dendrite_length),
            ("initial_axon_length", self.initial_axon_length),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("dendrite_angle_variation", self.dendrite_angle_variation),
            ("axon_angle_variation", self.axon_angle_variation),
        ] {
            // Jitter is drawn from [-v, v]
            if value < 0.0 || !sampling_span_ok(2.0 * value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative number with a finite span, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("dendrite_branch_offset", self.dendrite_branch_offset),
            ("axon_branch_offset", self.axon_branch_offset),
            ("position.x", self.position[0]),
            ("position.y", self.position[1]),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if self.sprout_count == 0 {
            return Err(ConfigError::Invalid("sprout_count must be at least 1".into()));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::Invalid("steps_per_frame must be at least 1".into()));
        }
        Ok(())
    }

    pub fn soma(&self) -> Point {
        Point::new(self.position[0], self.position[1])
    }

    pub fn dendrite_rules(&self) -> ArborRules {
        ArborRules {
            angle_variation: self.dendrite_angle_variation,
            branch_offset: self.dendrite_branch_offset,
        }
    }

    pub fn axon_rules(&self) -> ArborRules {
        ArborRules {
            angle_variation: self.axon_angle_variation,
            branch_offset: self.axon_branch_offset,
        }
    }
}

// rand's inclusive float sampler divides the span by a factor just below 1,
// so the span needs headroom below f64::MAX.
fn sampling_span_ok(span: f64) -> bool {
    span.is_finite() && (2.0 * span).is_finite()
}

fn check_range(name: &str, (low, high): (f64, f64)) -> Result<()> {
    let valid = low.is_finite() && high.is_finite() && low >= 0.0 && low <= high;
    if !valid || !sampling_span_ok(high - low) {
        return Err(ConfigError::Invalid(format!(
            "{name} must satisfy 0 <= low <= high, got ({low}, {high})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulation;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = GrowthConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.dendrite_steps, 100);
        assert_eq!(cfg.axon_growth_range, (0.5, 1.1));
        assert_eq!(cfg.soma(), Point::ORIGIN);
        assert_eq!(cfg.dendrite_rules(), ArborRules::DENDRITE);
        assert_eq!(cfg.axon_rules(), ArborRules::AXON);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "grow.yaml",
            "dendrite_steps: 40\naxon_growth_range: [0.6, 0.9]\nseed: 12\nposition: [1.5, -2.0]\n",
        );

        let cfg = GrowthConfig::from_file(&path).unwrap();

        assert_eq!(cfg.dendrite_steps, 40);
        assert_eq!(cfg.axon_growth_range, (0.6, 0.9));
        assert_eq!(cfg.seed, Some(12));
        assert_eq!(cfg.soma(), Point::new(1.5, -2.0));
        assert_eq!(cfg.axon_steps, 100);
        assert_eq!(cfg.initial_axon_length, 10.0);
    }

    #[test]
    fn json_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "grow.json", r#"{"axon_steps": 5, "sprout_count": 3}"#);

        let cfg = GrowthConfig::from_file(&path).unwrap();

        assert_eq!(cfg.axon_steps, 5);
        assert_eq!(cfg.sprout_count, 3);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "grow.toml", "dendrite_steps = 1");

        let err = GrowthConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GrowthConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "grow.yml", "dendrite_steps: [not a number");
        let err = GrowthConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn validation_rejects_nonsense() {
        let bad = [
            GrowthConfig {
                sprout_count: 0,
                ..Default::default()
            },
            GrowthConfig {
                dendrite_growth_range: (-0.1, 1.0),
                ..Default::default()
            },
            GrowthConfig {
                axon_growth_range: (1.2, 0.5),
                ..Default::default()
            },
            GrowthConfig {
                axon_growth_range: (0.0, f64::MAX),
                ..Default::default()
            },
            GrowthConfig {
                dendrite_growth_range: (0.5, f64::INFINITY),
                ..Default::default()
            },
            GrowthConfig {
                axon_extend_threshold: 1.5,
                ..Default::default()
            },
            GrowthConfig {
                initial_dendrite_length: -1.0,
                ..Default::default()
            },
            GrowthConfig {
                dendrite_angle_variation: f64::NAN,
                ..Default::default()
            },
            GrowthConfig {
                dendrite_angle_variation: 1e308,
                ..Default::default()
            },
            GrowthConfig {
                axon_angle_variation: f64::MAX,
                ..Default::default()
            },
            GrowthConfig {
                dendrite_branch_offset: f64::INFINITY,
                ..Default::default()
            },
            GrowthConfig {
                axon_branch_offset: f64::NAN,
                ..Default::default()
            },
            GrowthConfig {
                position: [f64::NEG_INFINITY, 0.0],
                ..Default::default()
            },
            GrowthConfig {
                position: [0.0, f64::NAN],
                ..Default::default()
            },
            GrowthConfig {
                steps_per_frame: 0,
                ..Default::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))), "{cfg:?}");
        }
    }

    #[test]
    fn extreme_but_accepted_values_grow_without_panicking() {
        let cfg = GrowthConfig {
            dendrite_steps: 20,
            axon_steps: 20,
            dendrite_angle_variation: 1e307,
            axon_angle_variation: 1e307,
            axon_growth_range: (0.0, 1e307),
            ..Default::default()
        };
        cfg.validate().unwrap();

        let neuron = Simulation::with_seed(cfg, 1).into_neuron();
        assert!(!neuron.axon_terminals().is_empty());
    }

    #[test]
    fn non_finite_yaml_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for body in [
            "dendrite_branch_offset: .inf\n",
            "axon_branch_offset: .nan\n",
            "position: [.nan, 0.0]\n",
            "dendrite_angle_variation: 1.0e308\n",
        ] {
            let path = write_file(&dir, "grow.yaml", body);
            let err = GrowthConfig::from_file(&path).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{body}");
        }
    }

    #[test]
    fn invalid_values_in_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "grow.yaml", "sprout_count: 0\n");
        let err = GrowthConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn from_dir_prefers_yaml_and_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GrowthConfig::from_dir(dir.path()), GrowthConfig::default());

        write_file(&dir, "neurogrow.json", r#"{"axon_steps": 7}"#);
        write_file(&dir, "neurogrow.yaml", "axon_steps: 3\n");
        assert_eq!(GrowthConfig::from_dir(dir.path()).axon_steps, 3);
    }

    #[test]
    fn example_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/neurogrow.example.yaml");
        let cfg = GrowthConfig::from_file(path).unwrap();
        assert_eq!(
            cfg,
            GrowthConfig {
                steps_per_frame: 2,
                ..Default::default()
            }
        );
    }

    #[test]
    fn from_dir_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir, "neurogrow.yaml", "sprout_count: 0\n");
        write_file(&dir, "neurogrow.json", r#"{"axon_steps": 7}"#);
        assert_eq!(GrowthConfig::from_dir(dir.path()).axon_steps, 7);
    }
}
