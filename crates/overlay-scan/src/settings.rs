use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use overlay_scan_types::{
    RegionBounds, RegionDescriptor, RegionSet, Strategy, TextRole,
};

use crate::cli::{CliArgs, CliSources};
use crate::pipeline::ExtractionOptions;

const PROJECT_CONFIG_NAME: &str = "overlay-scan.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    backend: Option<String>,
    input: Option<String>,
    output: Option<String>,
    interval: Option<u32>,
    start_time: Option<f64>,
    end_time: Option<f64>,
    confidence_threshold: Option<f64>,
    record_confidence: Option<bool>,
    enhance_contrast: Option<bool>,
    region: Vec<RegionFileConfig>,
}

#[derive(Debug, Deserialize, Clone)]
struct RegionFileConfig {
    name: String,
    bounds: [u32; 4],
    strategy: Strategy,
    role: Option<TextRole>,
}

/// Settings after merging CLI arguments over the config file.
#[derive(Debug)]
pub struct EffectiveSettings {
    pub backend: Option<String>,
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub sampling: SamplingSettings,
    pub extraction: ExtractionOptions,
    pub regions: RegionSet,
}

#[derive(Debug, Clone, Copy)]
pub struct SamplingSettings {
    pub interval_frames: u32,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        path: Option<PathBuf>,
        field: &'static str,
        value: String,
    },
    Missing {
        field: &'static str,
    },
    Region {
        message: String,
    },
    NotFound {
        path: PathBuf,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(
                    f,
                    "failed to read config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "failed to parse config file {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidValue { path, field, value } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "invalid value '{}' for '{}' in {}",
                        value,
                        field,
                        path.display()
                    )
                } else {
                    write!(f, "invalid value '{}' for '{}'", value, field)
                }
            }
            ConfigError::Missing { field } => {
                write!(f, "'{}' must be provided on the command line or in the config file", field)
            }
            ConfigError::Region { message } => {
                write!(f, "invalid region configuration: {}", message)
            }
            ConfigError::NotFound { path } => {
                write!(f, "config file {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub fn resolve_settings(
    cli: &CliArgs,
    sources: &CliSources,
) -> Result<EffectiveSettings, ConfigError> {
    let (file, config_path) = load_config(cli.config.as_deref())?;
    merge(cli, sources, file, config_path)
}

fn load_config(path_override: Option<&Path>) -> Result<(FileConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = path_override {
        let path = path.to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound { path });
        }
        return read_config(path).map(|(config, path)| (config, Some(path)));
    }

    if let Some(project_path) = project_config_path() {
        if project_path.exists() {
            return read_config(project_path).map(|(config, path)| (config, Some(path)));
        }
    }

    let Some(default_path) = default_config_path() else {
        return Ok((FileConfig::default(), None));
    };
    if !default_path.exists() {
        return Ok((FileConfig::default(), None));
    }
    read_config(default_path).map(|(config, path)| (config, Some(path)))
}

fn read_config(path: PathBuf) -> Result<(FileConfig, PathBuf), ConfigError> {
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok((config, path))
}

fn merge(
    cli: &CliArgs,
    sources: &CliSources,
    file: FileConfig,
    config_path: Option<PathBuf>,
) -> Result<EffectiveSettings, ConfigError> {
    let FileConfig {
        backend: file_backend,
        input: file_input,
        output: file_output,
        interval: file_interval,
        start_time: file_start_time,
        end_time: file_end_time,
        confidence_threshold: file_threshold,
        record_confidence: file_record_confidence,
        enhance_contrast: file_enhance_contrast,
        region: file_regions,
    } = file;

    let mut backend = normalize_string(cli.backend.clone());
    if backend.is_none() {
        backend = normalize_string(file_backend);
    }

    let input = cli
        .input
        .clone()
        .or_else(|| normalize_string(file_input).map(PathBuf::from));

    let output = cli
        .output
        .clone()
        .or_else(|| normalize_string(file_output).map(PathBuf::from))
        .ok_or(ConfigError::Missing { field: "output" })?;
    let output = ensure_csv_extension(output);

    let mut interval = cli.interval;
    if !sources.interval_from_cli {
        if let Some(value) = file_interval {
            if value < 1 {
                return Err(ConfigError::InvalidValue {
                    path: config_path,
                    field: "interval",
                    value: value.to_string(),
                });
            }
            interval = value;
        }
    }

    let mut start_time = cli.start_time;
    if !sources.start_time_from_cli {
        if let Some(value) = file_start_time {
            start_time = value;
        }
    }
    if !start_time.is_finite() || start_time < 0.0 {
        return Err(ConfigError::InvalidValue {
            path: config_path,
            field: "start_time",
            value: start_time.to_string(),
        });
    }

    let end_time = if sources.end_time_from_cli {
        cli.end_time
    } else {
        cli.end_time.or(file_end_time)
    }
    .ok_or(ConfigError::Missing { field: "end_time" })?;
    if !end_time.is_finite() || end_time <= start_time {
        return Err(ConfigError::InvalidValue {
            path: config_path,
            field: "end_time",
            value: end_time.to_string(),
        });
    }

    let mut confidence_threshold = cli.confidence_threshold;
    if !sources.confidence_threshold_from_cli {
        if let Some(value) = file_threshold {
            confidence_threshold = value;
        }
    }
    if !(0.0..=1.0).contains(&confidence_threshold) {
        return Err(ConfigError::InvalidValue {
            path: config_path,
            field: "confidence_threshold",
            value: confidence_threshold.to_string(),
        });
    }

    let record_confidence = cli
        .record_confidence
        .or(file_record_confidence)
        .unwrap_or(false);
    let enhance_contrast = cli
        .enhance_contrast
        .or(file_enhance_contrast)
        .unwrap_or(false);

    let regions = build_regions(file_regions)?;

    Ok(EffectiveSettings {
        backend,
        input,
        output,
        sampling: SamplingSettings {
            interval_frames: interval,
            start_time,
            end_time,
        },
        extraction: ExtractionOptions {
            record_confidence,
            confidence_threshold: confidence_threshold as f32,
            enhance_contrast,
        },
        regions,
    })
}

fn build_regions(configs: Vec<RegionFileConfig>) -> Result<RegionSet, ConfigError> {
    let mut descriptors = Vec::with_capacity(configs.len());
    for (id, config) in configs.into_iter().enumerate() {
        let [x1, y1, x2, y2] = config.bounds;
        let bounds = RegionBounds::new(x1, y1, x2, y2).map_err(|err| ConfigError::Region {
            message: format!("region '{}': {}", config.name, err),
        })?;
        descriptors.push(RegionDescriptor {
            id: id as u32,
            name: config.name,
            bounds,
            strategy: config.strategy,
            role: config.role,
        });
    }
    RegionSet::new(descriptors).map_err(|err| ConfigError::Region {
        message: err.to_string(),
    })
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "overlay-scan", "overlay-scan")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    env::current_dir().ok().map(|dir| dir.join(PROJECT_CONFIG_NAME))
}

fn normalize_string(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Append `.csv` when the output path has no extension; an explicit
/// extension is kept as-is.
fn ensure_csv_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension("csv")
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliArgs {
        let mut full = vec!["overlay-scan"];
        full.extend_from_slice(args);
        CliArgs::try_parse_from(full).unwrap()
    }

    fn sample_regions() -> Vec<RegionFileConfig> {
        vec![RegionFileConfig {
            name: "speed".into(),
            bounds: [0, 0, 100, 30],
            strategy: Strategy::Text,
            role: None,
        }]
    }

    fn base_file() -> FileConfig {
        FileConfig {
            end_time: Some(10.0),
            output: Some("out".into()),
            region: sample_regions(),
            ..FileConfig::default()
        }
    }

    #[test]
    fn file_values_fill_in_when_cli_uses_defaults() {
        let mut file = base_file();
        file.interval = Some(15);
        file.confidence_threshold = Some(0.5);
        let settings = merge(&cli(&[]), &CliSources::default(), file, None).unwrap();
        assert_eq!(settings.sampling.interval_frames, 15);
        assert_eq!(settings.extraction.confidence_threshold, 0.5);
        assert_eq!(settings.output, PathBuf::from("out.csv"));
    }

    #[test]
    fn cli_wins_over_file() {
        let mut file = base_file();
        file.interval = Some(15);
        let sources = CliSources {
            interval_from_cli: true,
            ..CliSources::default()
        };
        let settings = merge(&cli(&["--interval", "30"]), &sources, file, None).unwrap();
        assert_eq!(settings.sampling.interval_frames, 30);
    }

    #[test]
    fn zero_interval_in_file_is_rejected() {
        let mut file = base_file();
        file.interval = Some(0);
        let err = merge(&cli(&[]), &CliSources::default(), file, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "interval", .. }));
    }

    #[test]
    fn end_time_is_required() {
        let mut file = base_file();
        file.end_time = None;
        let err = merge(&cli(&[]), &CliSources::default(), file, None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { field: "end_time" }));
    }

    #[test]
    fn end_time_must_exceed_start_time() {
        let mut file = base_file();
        file.start_time = Some(10.0);
        file.end_time = Some(5.0);
        let err = merge(&cli(&[]), &CliSources::default(), file, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "end_time", .. }));
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        let mut file = base_file();
        file.confidence_threshold = Some(1.5);
        let err = merge(&cli(&[]), &CliSources::default(), file, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "confidence_threshold", .. }
        ));
    }

    #[test]
    fn duplicate_region_names_are_rejected() {
        let mut file = base_file();
        file.region.push(RegionFileConfig {
            name: "speed".into(),
            bounds: [0, 40, 100, 70],
            strategy: Strategy::Text,
            role: None,
        });
        let err = merge(&cli(&[]), &CliSources::default(), file, None).unwrap_err();
        assert!(matches!(err, ConfigError::Region { .. }));
    }

    #[test]
    fn explicit_extension_is_respected() {
        assert_eq!(
            ensure_csv_extension(PathBuf::from("table.tsv")),
            PathBuf::from("table.tsv")
        );
        assert_eq!(
            ensure_csv_extension(PathBuf::from("table")),
            PathBuf::from("table.csv")
        );
    }

    #[test]
    fn region_tables_parse_from_toml() {
        let parsed: FileConfig = toml::from_str(
            r#"
                end_time = 30.0
                output = "run"

                [[region]]
                name = "timestamp"
                bounds = [10, 10, 200, 40]
                strategy = "text"

                [[region]]
                name = "throttle"
                bounds = [10, 50, 200, 70]
                strategy = "horizontal-bar"
            "#,
        )
        .unwrap();
        let settings = merge(&cli(&[]), &CliSources::default(), parsed, None).unwrap();
        assert_eq!(settings.regions.len(), 2);
        let names: Vec<_> = settings.regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["timestamp", "throttle"]);
    }
}
