//! src/configuration.rs
use crate::mappers::{DEFAULT_TERM_CODES, TermCodeSet};
use serde_aux::field_attributes::deserialize_number_from_string;
use std::num::NonZeroUsize;
use std::path::Path;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub cluster: ClusterSettings,
    pub job: JobSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClusterSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub workers: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reduce_tasks: usize,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct JobSettings {
    pub combine: bool,
    pub term_codes: Vec<String>,
}

impl JobSettings {
    pub fn term_code_set(&self) -> TermCodeSet {
        TermCodeSet::new(self.term_codes.iter().map(|code| code.trim()))
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: "gocount".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

/// Defaults, then a YAML file, then `GOCOUNT_*` environment variables.
///
/// Without an explicit file, `configuration/base.yaml` under the working directory is
/// used when present. An explicit file must exist.
pub fn get_configuration(config_file: Option<&Path>) -> Result<Settings, config::ConfigError> {
    let workers = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);

    let file = match config_file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(Path::new("configuration").join("base.yaml")).required(false),
    };

    let settings = config::Config::builder()
        .set_default("cluster.workers", workers as u64)?
        .set_default("cluster.reduce_tasks", 1)?
        .set_default("job.combine", true)?
        .set_default("job.term_codes", DEFAULT_TERM_CODES.to_vec())?
        .set_default("telemetry.service_name", "gocount")?
        .set_default("telemetry.log_level", "info")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("GOCOUNT")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("job.term_codes")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
