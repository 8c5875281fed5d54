use portal_core::config::{configuration_directory, load_settings};
use portal_core::error::AppError;
use secrecy::Secret;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::services::SimulatedLatency;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub branding: BrandingSettings,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub flow: FlowSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint (e.g. http://tempo:4317). Spans are not exported
    /// when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone)]
pub struct BrandingSettings {
    /// Appended to the tenant name in the page title.
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    /// Tenant every new session starts with.
    #[serde(default = "default_tenant_id")]
    pub default_tenant_id: String,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            title_suffix: default_title_suffix(),
            default_tenant_id: default_tenant_id(),
        }
    }
}

fn default_title_suffix() -> String {
    crate::style::DEFAULT_TITLE_SUFFIX.to_string()
}

fn default_tenant_id() -> String {
    crate::models::DHUUD_TENANT_ID.to_string()
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    #[default]
    Simulated,
    Http,
}

#[derive(Deserialize, Clone)]
pub struct GatewaySettings {
    #[serde(default)]
    pub mode: GatewayMode,
    /// Auth backend base URL, required in `http` mode.
    pub base_url: Option<String>,
    pub api_key: Option<Secret<String>>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub latency: LatencySettings,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            latency: LatencySettings::default(),
        }
    }
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Simulated gateway round-trip times, in milliseconds.
#[derive(Deserialize, Clone, Copy)]
pub struct LatencySettings {
    #[serde(default = "default_validate_ms")]
    pub validate_invite_ms: u64,
    #[serde(default = "default_slow_ms")]
    pub register_ms: u64,
    #[serde(default = "default_slow_ms")]
    pub sign_in_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            validate_invite_ms: default_validate_ms(),
            register_ms: default_slow_ms(),
            sign_in_ms: default_slow_ms(),
        }
    }
}

impl From<LatencySettings> for SimulatedLatency {
    fn from(settings: LatencySettings) -> Self {
        SimulatedLatency {
            validate_invite: Duration::from_millis(settings.validate_invite_ms),
            register: Duration::from_millis(settings.register_ms),
            sign_in: Duration::from_millis(settings.sign_in_ms),
        }
    }
}

fn default_validate_ms() -> u64 {
    800
}

fn default_slow_ms() -> u64 {
    1500
}

#[derive(Deserialize, Clone, Copy, Default)]
pub struct FlowSettings {
    /// Enforce the five-character minimum on invite codes before the
    /// gateway is called.
    #[serde(default)]
    pub enforce_code_length: bool,
}

#[derive(Deserialize, Clone, Copy)]
pub struct SessionSettings {
    #[serde(default = "default_idle_timeout_hours")]
    pub idle_timeout_hours: i64,
    /// Set to true in production with HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
    /// Upper bound on live portal contexts.
    #[serde(default = "default_max_contexts")]
    pub max_contexts: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout_hours: default_idle_timeout_hours(),
            secure_cookie: false,
            max_contexts: default_max_contexts(),
        }
    }
}

fn default_max_contexts() -> usize {
    crate::session::DEFAULT_MAX_CONTEXTS
}

fn default_idle_timeout_hours() -> i64 {
    24
}

/// One year.
pub const MAX_IDLE_TIMEOUT_HOURS: i64 = 24 * 365;

impl SessionSettings {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=MAX_IDLE_TIMEOUT_HOURS).contains(&self.idle_timeout_hours) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "session.idle_timeout_hours must be between 1 and {}, got {}",
                MAX_IDLE_TIMEOUT_HOURS,
                self.idle_timeout_hours
            )));
        }
        if self.max_contexts == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "session.max_contexts must be at least 1"
            )));
        }
        Ok(())
    }

    /// Idle period after which a portal context is pruned.
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::hours(self.idle_timeout_hours)
    }

    /// Cookie inactivity expiry, same period as [`Self::idle_timeout`].
    pub fn cookie_expiry(&self) -> time::Duration {
        time::Duration::hours(self.idle_timeout_hours)
    }
}

/// Load and check settings from `directory`.
pub fn load_configuration(directory: &Path) -> Result<Settings, AppError> {
    let settings: Settings = load_settings(directory)?;
    settings.session.validate()?;
    Ok(settings)
}

pub fn get_configuration() -> Result<Settings, AppError> {
    let configuration_directory = configuration_directory("identity-portal")?;
    load_configuration(&configuration_directory)
}
