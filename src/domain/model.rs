use serde::{Deserialize, Serialize};

/// Fixed identifier for the cleanup resource. The server-side settings are a
/// singleton and have no natural id.
pub const PLACEHOLDER_ID: &str = "placeholder";

/// Cleanup settings as exchanged with the TeamCity REST API
/// (`/app/rest/server/cleanup`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSettings {
    pub enabled: bool,
    #[serde(rename = "maxCleanupDuration")]
    pub max_duration: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<CleanupDaily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<CleanupCron>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupDaily {
    pub hour: i32,
    pub minute: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupCron {
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub month: String,
    #[serde(rename = "dayWeek")]
    pub day_week: String,
}

/// The `cleanup` resource as the host runtime sees it, keyed by attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupResourceModel {
    /// `None` while the value is unknown (before the first apply).
    #[serde(default)]
    pub id: Option<String>,
    pub enabled: bool,
    pub max_duration: i64,
    #[serde(default)]
    pub daily: Option<DailyModel>,
    #[serde(default)]
    pub cron: Option<CronModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyModel {
    pub hour: i64,
    pub minute: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronModel {
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub month: String,
    pub day_week: String,
}

/// When cleanup is triggered. Cron fields are passed through to the server
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Daily { hour: i64, minute: i64 },
    Cron(CronModel),
}

/// Returned when a model carries both `daily` and `cron`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictingSchedules;

impl std::fmt::Display for ConflictingSchedules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("only one of `daily` or `cron` can be set")
    }
}

impl CleanupResourceModel {
    pub fn schedule(&self) -> std::result::Result<Option<Schedule>, ConflictingSchedules> {
        match (&self.daily, &self.cron) {
            (Some(_), Some(_)) => Err(ConflictingSchedules),
            (Some(daily), None) => Ok(Some(Schedule::Daily {
                hour: daily.hour,
                minute: daily.minute,
            })),
            (None, Some(cron)) => Ok(Some(Schedule::Cron(cron.clone()))),
            (None, None) => Ok(None),
        }
    }

    /// Builds the payload sent to the server. Integers are narrowed to the
    /// server's 32-bit fields by truncation.
    pub fn to_settings(&self) -> std::result::Result<CleanupSettings, ConflictingSchedules> {
        let mut settings = CleanupSettings {
            enabled: self.enabled,
            max_duration: self.max_duration as i32,
            daily: None,
            cron: None,
        };

        match self.schedule()? {
            Some(Schedule::Daily { hour, minute }) => {
                settings.daily = Some(CleanupDaily {
                    hour: hour as i32,
                    minute: minute as i32,
                });
            }
            Some(Schedule::Cron(cron)) => {
                settings.cron = Some(CleanupCron {
                    minute: cron.minute,
                    hour: cron.hour,
                    day: cron.day,
                    month: cron.month,
                    day_week: cron.day_week,
                });
            }
            None => {}
        }

        Ok(settings)
    }

    /// Rebuilds state from what the server reported.
    pub fn from_settings(settings: CleanupSettings) -> Self {
        Self {
            id: Some(PLACEHOLDER_ID.to_string()),
            enabled: settings.enabled,
            max_duration: i64::from(settings.max_duration),
            daily: settings.daily.map(|daily| DailyModel {
                hour: i64::from(daily.hour),
                minute: i64::from(daily.minute),
            }),
            cron: settings.cron.map(|cron| CronModel {
                minute: cron.minute,
                hour: cron.hour,
                day: cron.day,
                month: cron.month,
                day_week: cron.day_week,
            }),
        }
    }
}

impl From<CleanupSettings> for CleanupResourceModel {
    fn from(settings: CleanupSettings) -> Self {
        Self::from_settings(settings)
    }
}
