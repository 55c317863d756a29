use chrono::Duration as ChronoDuration;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("feedCooldownSecs must be at most {max}, got {got}")]
    CooldownTooLong { got: u64, max: u64 },
    #[error("time scale must be a positive number, got {0}")]
    BadTimeScale(f64),
    #[error("could not resolve project directories")]
    NoProjectDirs,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Keeps wall-clock arithmetic on the cooldown far from chrono's range limits.
pub const MAX_FEED_COOLDOWN_SECS: u64 = u32::MAX as u64;

/// User-facing settings, stored as camelCase JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub decay_interval_ms: u64,
    pub alert_interval_ms: u64,
    pub event_interval_ms: u64,
    pub day_interval_ms: u64,
    pub feed_cooldown_secs: u64,
    /// 0 draws a fresh seed at startup.
    pub seed: u64,
    pub fps_cap: u32,
    pub enable_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decay_interval_ms: 12_000,
            alert_interval_ms: 60_000,
            event_interval_ms: 120_000,
            day_interval_ms: 300_000,
            feed_cooldown_secs: 18_000,
            seed: 0,
            fps_cap: 30,
            enable_color: true,
        }
    }
}

impl Settings {
    /// Divides every interval and the feed cooldown by `factor`, keeping
    /// their ratios. Values never drop below one unit.
    pub fn time_scaled(&self, factor: f64) -> Result<Self, ConfigError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(ConfigError::BadTimeScale(factor));
        }
        let scale = |v: u64| ((v as f64 / factor).round() as u64).max(1);
        Ok(Self {
            decay_interval_ms: scale(self.decay_interval_ms),
            alert_interval_ms: scale(self.alert_interval_ms),
            event_interval_ms: scale(self.event_interval_ms),
            day_interval_ms: scale(self.day_interval_ms),
            feed_cooldown_secs: scale(self.feed_cooldown_secs),
            ..self.clone()
        })
    }

    pub fn rules(&self) -> Result<Rules, ConfigError> {
        let ms = |field: &'static str, v: u64| {
            if v == 0 {
                Err(ConfigError::ZeroInterval { field })
            } else {
                Ok(Duration::from_millis(v))
            }
        };
        if self.feed_cooldown_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "feedCooldownSecs",
            });
        }
        if self.feed_cooldown_secs > MAX_FEED_COOLDOWN_SECS {
            return Err(ConfigError::CooldownTooLong {
                got: self.feed_cooldown_secs,
                max: MAX_FEED_COOLDOWN_SECS,
            });
        }
        Ok(Rules {
            decay_every: ms("decayIntervalMs", self.decay_interval_ms)?,
            alert_every: ms("alertIntervalMs", self.alert_interval_ms)?,
            event_every: ms("eventIntervalMs", self.event_interval_ms)?,
            day_every: ms("dayIntervalMs", self.day_interval_ms)?,
            feed_cooldown: ChronoDuration::seconds(self.feed_cooldown_secs as i64),
        })
    }
}

/// Validated engine pacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    pub decay_every: Duration,
    pub alert_every: Duration,
    pub event_every: Duration,
    pub day_every: Duration,
    pub feed_cooldown: ChronoDuration,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            decay_every: Duration::from_millis(12_000),
            alert_every: Duration::from_millis(60_000),
            event_every: Duration::from_millis(120_000),
            day_every: Duration::from_millis(300_000),
            feed_cooldown: ChronoDuration::seconds(18_000),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("com", "petopia", "Petopia").ok_or(ConfigError::NoProjectDirs)
}

/// `settings.json` in the platform config dir, which is created if missing.
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    let dir = project_dirs()?.config_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir.join("settings.json"))
}

/// `petopia.log` in the platform local data dir, which is created if missing.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    let dir = project_dirs()?.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir.join("petopia.log"))
}

/// Reads settings from `path`. A missing file is created with defaults; an
/// unreadable or malformed one is ignored.
pub fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(s) => match serde_json::from_str::<Settings>(&s) {
            Ok(v) => v,
            Err(err) => {
                warn!(path = %path.display(), %err, "malformed settings, using defaults");
                Settings::default()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let defaults = Settings::default();
            if let Err(err) = save_settings_atomic(path, &defaults) {
                warn!(path = %path.display(), %err, "could not write default settings");
            }
            defaults
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "could not read settings, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<(), ConfigError> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_vec_pretty(s)?;
    fs::write(&tmp, data)?;
    atomic_rename(&tmp, path)?;
    Ok(())
}

fn atomic_rename(from: &Path, to: &Path) -> Result<(), ConfigError> {
    // rename-over-existing fails on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_match_default_rules() {
        assert_eq!(Settings::default().rules().unwrap(), Rules::default());
    }

    #[test]
    fn reference_pacing_is_ordered() {
        let r = Rules::default();
        assert!(r.decay_every < r.alert_every);
        assert!(r.alert_every < r.event_every);
        assert!(r.event_every < r.day_every);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let s = Settings {
            alert_interval_ms: 0,
            ..Settings::default()
        };
        let err = s.rules().unwrap_err();
        assert_eq!(err.to_string(), "alertIntervalMs must be greater than zero");
    }

    #[test]
    fn oversized_cooldown_is_rejected() {
        let s = Settings {
            feed_cooldown_secs: MAX_FEED_COOLDOWN_SECS + 1,
            ..Settings::default()
        };
        assert!(matches!(
            s.rules(),
            Err(ConfigError::CooldownTooLong { got, .. }) if got == MAX_FEED_COOLDOWN_SECS + 1
        ));

        let s = Settings {
            feed_cooldown_secs: MAX_FEED_COOLDOWN_SECS,
            ..Settings::default()
        };
        let rules = s.rules().unwrap();
        assert_eq!(
            rules.feed_cooldown,
            ChronoDuration::seconds(MAX_FEED_COOLDOWN_SECS as i64)
        );
    }

    #[test]
    fn recognizes_camel_case_keys_and_fills_gaps() {
        let s: Settings =
            serde_json::from_str(r#"{"decayIntervalMs": 500, "dayIntervalMs": 9000}"#).unwrap();
        assert_eq!(s.decay_interval_ms, 500);
        assert_eq!(s.day_interval_ms, 9000);
        assert_eq!(s.alert_interval_ms, 60_000);
        assert_eq!(s.feed_cooldown_secs, 18_000);
    }

    #[test]
    fn time_scale_keeps_ratios() {
        let s = Settings::default().time_scaled(60.0).unwrap();
        assert_eq!(s.decay_interval_ms, 200);
        assert_eq!(s.day_interval_ms, 5000);
        assert_eq!(s.feed_cooldown_secs, 300);
        assert!(Settings::default().time_scaled(0.0).is_err());
        assert!(Settings::default().time_scaled(f64::NAN).is_err());
    }

    #[test]
    fn missing_file_is_written_with_defaults() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("settings.json");
        assert_eq!(load_settings(&path), Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("settings.json");
        let s = Settings {
            seed: 42,
            enable_color: false,
            ..Settings::default()
        };
        save_settings_atomic(&path, &s).unwrap();
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
    }
}
