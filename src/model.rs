use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One anonymous community health check-in.
///
/// Field names serialize in camelCase so the stored blob keeps the same shape
/// the browser dashboard wrote to local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    #[serde(default)]
    pub region: String,
    pub age_group: AgeGroup,
    pub symptom_category: SymptomCategory,
    pub environment_issue: EnvironmentIssue,
    #[serde(default)]
    pub mental_health_flag: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65+")]
    Over65,
}

impl AgeGroup {
    pub const ALL: [Self; 6] = [
        Self::From18To24,
        Self::From25To34,
        Self::From35To44,
        Self::From45To54,
        Self::From55To64,
        Self::Over65,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::From18To24 => "18-24",
            Self::From25To34 => "25-34",
            Self::From35To44 => "35-44",
            Self::From45To54 => "45-54",
            Self::From55To64 => "55-64",
            Self::Over65 => "65+",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value| matches_label(value.label(), raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymptomCategory {
    #[serde(rename = "Respiratory (cough, shortness of breath)")]
    Respiratory,
    #[serde(rename = "Fever / flu-like symptoms")]
    Fever,
    #[serde(rename = "Headache / fatigue")]
    Headache,
    #[serde(rename = "Digestive issues")]
    Digestive,
    #[serde(rename = "Other")]
    Other,
}

impl SymptomCategory {
    pub const ALL: [Self; 5] = [
        Self::Respiratory,
        Self::Fever,
        Self::Headache,
        Self::Digestive,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Respiratory => "Respiratory (cough, shortness of breath)",
            Self::Fever => "Fever / flu-like symptoms",
            Self::Headache => "Headache / fatigue",
            Self::Digestive => "Digestive issues",
            Self::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value| matches_label(value.label(), raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentIssue {
    #[serde(rename = "Heat / humidity")]
    Heat,
    #[serde(rename = "Air quality / smoke")]
    AirQuality,
    #[serde(rename = "Water taste / smell")]
    Water,
    #[serde(rename = "Noise / pollution")]
    Noise,
    #[serde(rename = "Other")]
    Other,
}

impl EnvironmentIssue {
    pub const ALL: [Self; 5] = [
        Self::Heat,
        Self::AirQuality,
        Self::Water,
        Self::Noise,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Heat => "Heat / humidity",
            Self::AirQuality => "Air quality / smoke",
            Self::Water => "Water taste / smell",
            Self::Noise => "Noise / pollution",
            Self::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|value| matches_label(value.label(), raw))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SymptomCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for EnvironmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn matches_label(label: &str, raw: &str) -> bool {
    label.eq_ignore_ascii_case(raw.trim())
}

/// `createdAt` is written as `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|error| D::Error::custom(format!("invalid createdAt {raw:?}: {error}")))
    }
}
