use crate::model::{AgeGroup, EnvironmentIssue, Report, SymptomCategory};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please complete all required fields (region, age group, symptom, environment).")]
    MissingFields(Vec<&'static str>),
    #[error("unknown {field}: {value:?}")]
    UnknownChoice { field: &'static str, value: String },
}

/// Raw form input as typed by the user, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportDraft {
    pub region: Option<String>,
    pub age_group: Option<String>,
    pub symptom_category: Option<String>,
    pub environment_issue: Option<String>,
    pub mental_health_flag: bool,
    pub notes: Option<String>,
}

/// A validated submission that has not been stamped with an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    pub region: String,
    pub age_group: AgeGroup,
    pub symptom_category: SymptomCategory,
    pub environment_issue: EnvironmentIssue,
    pub mental_health_flag: bool,
    pub notes: String,
}

impl ReportDraft {
    pub fn validate(&self) -> Result<NewReport, IntakeError> {
        let region = present(&self.region);
        let age_group = present(&self.age_group);
        let symptom_category = present(&self.symptom_category);
        let environment_issue = present(&self.environment_issue);

        let missing = [
            ("region", region.is_none()),
            ("age group", age_group.is_none()),
            ("symptom", symptom_category.is_none()),
            ("environment", environment_issue.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect::<Vec<_>>();

        let (Some(region), Some(age_group), Some(symptom_category), Some(environment_issue)) =
            (region, age_group, symptom_category, environment_issue)
        else {
            return Err(IntakeError::MissingFields(missing));
        };

        Ok(NewReport {
            region: region.to_string(),
            age_group: AgeGroup::from_label(age_group)
                .ok_or_else(|| unknown("age group", age_group))?,
            symptom_category: SymptomCategory::from_label(symptom_category)
                .ok_or_else(|| unknown("symptom", symptom_category))?,
            environment_issue: EnvironmentIssue::from_label(environment_issue)
                .ok_or_else(|| unknown("environment", environment_issue))?,
            mental_health_flag: self.mental_health_flag,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

impl NewReport {
    pub fn into_report(self, now: DateTime<Utc>) -> Report {
        Report {
            id: Uuid::new_v4(),
            region: self.region,
            age_group: self.age_group,
            symptom_category: self.symptom_category,
            environment_issue: self.environment_issue,
            mental_health_flag: self.mental_health_flag,
            notes: self.notes,
            created_at: now.trunc_subsecs(3),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
}

fn unknown(field: &'static str, value: &str) -> IntakeError {
    IntakeError::UnknownChoice {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_draft() -> ReportDraft {
        ReportDraft {
            region: Some("  K1A ".to_string()),
            age_group: Some("45-54".to_string()),
            symptom_category: Some("Digestive issues".to_string()),
            environment_issue: Some("Water taste / smell".to_string()),
            mental_health_flag: true,
            notes: Some(" started after the boil advisory \n".to_string()),
        }
    }

    #[test]
    fn complete_draft_is_trimmed() {
        let report = complete_draft().validate().expect("valid draft");

        assert_eq!(report.region, "K1A");
        assert_eq!(report.age_group, AgeGroup::From45To54);
        assert_eq!(report.symptom_category, SymptomCategory::Digestive);
        assert_eq!(report.environment_issue, EnvironmentIssue::Water);
        assert_eq!(report.notes, "started after the boil advisory");
        assert!(report.mental_health_flag);
    }

    #[test]
    fn empty_or_blank_region_is_rejected() {
        for region in [None, Some(String::new()), Some("   ".to_string())] {
            let draft = ReportDraft {
                region,
                ..complete_draft()
            };

            assert_eq!(
                draft.validate(),
                Err(IntakeError::MissingFields(vec!["region"]))
            );
        }
    }

    #[test]
    fn missing_fields_are_listed_with_user_message() {
        let draft = ReportDraft {
            region: Some("M5V".to_string()),
            ..ReportDraft::default()
        };

        let error = draft.validate().unwrap_err();
        assert_eq!(
            error,
            IntakeError::MissingFields(vec!["age group", "symptom", "environment"])
        );
        assert_eq!(
            error.to_string(),
            "Please complete all required fields (region, age group, symptom, environment)."
        );
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let draft = ReportDraft {
            symptom_category: Some("Sneezing".to_string()),
            ..complete_draft()
        };

        assert_eq!(
            draft.validate(),
            Err(IntakeError::UnknownChoice {
                field: "symptom",
                value: "Sneezing".to_string()
            })
        );
    }

    #[test]
    fn notes_default_to_empty() {
        let draft = ReportDraft {
            notes: None,
            ..complete_draft()
        };

        assert_eq!(draft.validate().expect("valid draft").notes, "");
    }

    #[test]
    fn into_report_truncates_timestamp_to_millis() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let report = complete_draft()
            .validate()
            .expect("valid draft")
            .into_report(now);

        assert_eq!(report.created_at.timestamp_subsec_millis(), 123);
        assert_eq!(report.created_at.timestamp_subsec_nanos(), 123_000_000);
    }
}
