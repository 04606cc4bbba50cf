use crate::error::AppError;
use crate::models::{PeriodPolicy, RateSource};
use crate::usage::DEFAULT_FIXED_RATE;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SERVICE_NAME: &str = "akt-report";

const TOKEN_ENV: &str = "AKT_BEARER_TOKEN";
const LAST_NAME_ENV: &str = "AKT_LAST_NAME";

fn app_home_dir() -> Result<PathBuf, AppError> {
    if let Ok(custom) = std::env::var("AKT_REPORT_HOME") {
        return Ok(PathBuf::from(custom));
    }

    if let Some(dirs) = ProjectDirs::from("ru", "aktreport", SERVICE_NAME) {
        let candidate = dirs.data_local_dir().to_path_buf();
        if fs::create_dir_all(&candidate).is_ok() {
            return Ok(candidate);
        }
    }

    let cwd = std::env::current_dir()?;
    Ok(cwd.join(".akt-report"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Operator surname placed in the output file name.
    pub last_name: String,
    /// Where the per-minute rate comes from: the API's `playtime_cost`
    /// field or the fixed `fixed_rate` below. One choice per deployment.
    pub rate_source: RateSource,
    pub fixed_rate: f64,
    /// Which calendar month a run reports on.
    pub period_policy: PeriodPolicy,
    /// Render kopecks as "05" instead of "5".
    pub zero_pad_kopecks: bool,
    /// Skip malformed statistics entries with a warning instead of
    /// aborting the run.
    pub skip_malformed: bool,
    pub template_path: String,
    pub output_dir: String,
    /// Statistics endpoint override; defaults to the VK Play partner API.
    pub base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_name: String::new(),
            rate_source: RateSource::default(),
            fixed_rate: DEFAULT_FIXED_RATE,
            period_policy: PeriodPolicy::default(),
            zero_pad_kopecks: false,
            skip_malformed: false,
            template_path: "template.docx".into(),
            output_dir: "output".into(),
            base_url: None,
        }
    }
}

impl AppConfig {
    /// Surname for the output file name; the env var wins over the
    /// config file, matching how the credential is supplied.
    pub fn resolved_last_name(&self) -> String {
        match std::env::var(LAST_NAME_ENV) {
            Ok(v) if !v.is_empty() => v,
            _ => self.last_name.clone(),
        }
    }
}

pub fn config_dir() -> Result<PathBuf, AppError> {
    Ok(app_home_dir()?.join("config"))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn ensure_dirs() -> Result<(), AppError> {
    fs::create_dir_all(config_dir()?)?;
    Ok(())
}

pub fn load_config() -> Result<AppConfig, AppError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(&path)?;
    Ok(toml::from_str(&raw)?)
}

pub fn save_config(config: &AppConfig) -> Result<(), AppError> {
    ensure_dirs()?;
    let path = config_path()?;
    let raw = toml::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

pub fn set_bearer_token(token: &str) -> Result<(), AppError> {
    let entry = keyring::Entry::new(SERVICE_NAME, "bearer-token")?;
    entry.set_password(token)?;
    Ok(())
}

/// Resolves the billing API credential: OS keyring first, then the
/// AKT_BEARER_TOKEN environment variable. Absence is a precondition
/// failure, reported before any network work starts.
pub fn get_bearer_token() -> Result<String, AppError> {
    if let Ok(entry) = keyring::Entry::new(SERVICE_NAME, "bearer-token") {
        if let Ok(value) = entry.get_password() {
            if !value.is_empty() {
                return Ok(value);
            }
        }
    }

    if let Ok(value) = std::env::var(TOKEN_ENV) {
        if !value.is_empty() {
            return Ok(value);
        }
    }

    Err(AppError::Config(format!(
        "bearer token is not defined: run 'akt-report set-token' or set {TOKEN_ENV}"
    )))
}

pub fn ensure_initialized() -> Result<(), AppError> {
    ensure_dirs()?;
    let cfg_path = config_path()?;
    if !Path::new(&cfg_path).exists() {
        save_config(&AppConfig::default())?;
    }
    Ok(())
}
