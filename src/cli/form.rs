use crate::intake::ReportDraft;
use crate::model::{AgeGroup, EnvironmentIssue, SymptomCategory};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

/// True when any required field still has to be asked for.
pub fn needs_prompt(draft: &ReportDraft) -> bool {
    [
        &draft.region,
        &draft.age_group,
        &draft.symptom_category,
        &draft.environment_issue,
    ]
    .into_iter()
    .any(is_blank)
}

/// Prompts for every field the draft is missing, keeping values given as flags.
pub fn run_report_form(mut draft: ReportDraft) -> Result<ReportDraft> {
    println!("──────────────────────────────────────────");
    println!("  New community health check-in");
    println!("  No names, emails, or phone numbers are collected.");
    println!("──────────────────────────────────────────");

    let theme = ColorfulTheme::default();

    if is_blank(&draft.region) {
        let region: String = Input::with_theme(&theme)
            .with_prompt("  Region / Postal code")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Region is required (e.g., M5V, K1A, or city / neighbourhood)")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .context("Failed to read region")?;
        draft.region = Some(region);
    }

    if is_blank(&draft.age_group) {
        let labels = AgeGroup::ALL.map(AgeGroup::label);
        draft.age_group = Some(select_label(&theme, "  Age group", &labels)?);
    }

    if is_blank(&draft.symptom_category) {
        let labels = SymptomCategory::ALL.map(SymptomCategory::label);
        draft.symptom_category = Some(select_label(&theme, "  Main symptom today", &labels)?);
    }

    if is_blank(&draft.environment_issue) {
        let labels = EnvironmentIssue::ALL.map(EnvironmentIssue::label);
        draft.environment_issue = Some(select_label(&theme, "  Environment issue", &labels)?);
    }

    if !draft.mental_health_flag {
        draft.mental_health_flag = Confirm::with_theme(&theme)
            .with_prompt("  Does this include mental health strain (stress, anxiety, low mood)?")
            .default(false)
            .interact()
            .context("Failed to read mental health input")?;
    }

    if draft.notes.is_none() {
        let notes: String = Input::with_theme(&theme)
            .with_prompt("  Optional notes")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read notes")?;
        draft.notes = Some(notes);
    }

    Ok(draft)
}

fn select_label(theme: &ColorfulTheme, prompt: &str, labels: &[&'static str]) -> Result<String> {
    let index = Select::with_theme(theme)
        .with_prompt(prompt)
        .default(0)
        .items(labels)
        .interact()
        .with_context(|| format!("Failed to read selection: {}", prompt.trim()))?;

    Ok(labels[index].to_string())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|raw| raw.trim().is_empty())
}
