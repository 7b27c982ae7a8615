use crate::model::Report;
use crate::stats::{CategoryCount, StatsSummary};
use chrono::{DateTime, TimeZone, Utc};

/// Human-friendly age of a check-in for the recent table.
pub fn format_relative<Tz: TimeZone>(created_at: DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let diff_ms = (now.with_timezone(&Utc) - created_at).num_milliseconds() as f64;
    let minutes = round_half_up(diff_ms / 60_000.0);
    let hours = round_half_up(diff_ms / 3_600_000.0);
    let days = round_half_up(diff_ms / 86_400_000.0);

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{hours} h ago")
    } else if days == 1 {
        "Yesterday".to_string()
    } else {
        created_at
            .with_timezone(&now.timezone())
            .date_naive()
            .format("%Y-%m-%d")
            .to_string()
    }
}

pub fn mental_health_sentence(share: u8) -> String {
    if share > 0 {
        format!("{share}% of check-ins flagged mental health strain.")
    } else {
        "No mental health signals reported yet.".to_string()
    }
}

pub fn render_markdown<Tz: TimeZone>(
    summary: &StatsSummary,
    recent: &[Report],
    now: &DateTime<Tz>,
) -> String {
    let trend_rows = summary
        .trend_data
        .iter()
        .map(|point| format!("| {} | {} |", point.date, point.count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# HealthWatch Communities\n\n## Summary\n- Total check-ins: {} (all-time community submissions)\n- Last 7 days: {} (recent activity)\n- Unique regions: {} (communities represented)\n\n## Trend - daily check-ins (last 14 days)\n| Date | Check-ins |\n|------|-----------|\n{}\n\n## Top reported categories\n### Symptoms\n{}\n\n### Environment\n{}\n\n### Mental health\n{}\n\n## Recent check-ins\n{}\n",
        summary.total,
        summary.last_7_days,
        summary.unique_regions,
        trend_rows,
        list_categories(&summary.top_symptoms, "No symptom data yet."),
        list_categories(&summary.top_environment, "No environment data yet."),
        mental_health_sentence(summary.mental_health_share),
        render_recent_table(recent, now),
    )
}

pub fn render_recent_table<Tz: TimeZone>(recent: &[Report], now: &DateTime<Tz>) -> String {
    if recent.is_empty() {
        return "No reports yet. Run `healthwatch submit` to add the first community signal."
            .to_string();
    }

    let rows = recent
        .iter()
        .map(|report| {
            format!(
                "| {} | {} | {} | {} | {} | {} |",
                format_relative(report.created_at, now),
                escape_cell(&report.region),
                report.age_group,
                report.symptom_category,
                report.environment_issue,
                if report.mental_health_flag {
                    "Flagged"
                } else {
                    "Not flagged"
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "| When | Region | Age group | Symptom | Environment | Mental health |\n|------|--------|-----------|---------|-------------|---------------|\n{rows}"
    )
}

fn list_categories(items: &[CategoryCount], empty_message: &str) -> String {
    if items.is_empty() {
        return format!("- {empty_message}");
    }

    items
        .iter()
        .map(|item| format!("- {}: {}", item.label, item.count))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use crate::stats::tests::sample_report;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
    }

    #[test]
    fn relative_time_thresholds() {
        let now = fixed_now();

        assert_eq!(format_relative(now - Duration::seconds(20), &now), "Just now");
        assert_eq!(format_relative(now + Duration::minutes(5), &now), "Just now");
        assert_eq!(format_relative(now - Duration::minutes(12), &now), "12 min ago");
        assert_eq!(format_relative(now - Duration::minutes(150), &now), "3 h ago");
        assert_eq!(format_relative(now - Duration::hours(30), &now), "Yesterday");
        assert_eq!(format_relative(now - Duration::days(4), &now), "2026-10-12");
    }

    #[test]
    fn mental_health_sentence_depends_on_share() {
        assert_eq!(
            mental_health_sentence(25),
            "25% of check-ins flagged mental health strain."
        );
        assert_eq!(
            mental_health_sentence(0),
            "No mental health signals reported yet."
        );
    }

    #[test]
    fn recent_table_escapes_region_and_marks_flag() {
        let now = fixed_now();
        let mut report = sample_report("Old|Town", now - Duration::minutes(2));
        report.mental_health_flag = true;

        let table = render_recent_table(&[report], &now);
        assert!(table.contains("| 2 min ago | Old\\|Town | 35-44 |"));
        assert!(table.ends_with("| Flagged |"));
    }

    #[test]
    fn markdown_lists_empty_placeholders() {
        let summary = compute_stats(&[], &fixed_now());
        let markdown = render_markdown(&summary, &[], &fixed_now());

        assert!(markdown.contains("- Total check-ins: 0"));
        assert!(markdown.contains("- No symptom data yet."));
        assert!(markdown.contains("- No environment data yet."));
        assert!(markdown.contains("No mental health signals reported yet."));
        assert!(markdown.contains("No reports yet."));
        assert_eq!(markdown.matches("| 0 |").count(), 14);
    }

    #[test]
    fn markdown_renders_recent_rows_against_given_clock() {
        let now = fixed_now();
        let mut flagged = sample_report("Harbour", now - Duration::minutes(45));
        flagged.mental_health_flag = true;
        let reports = vec![flagged, sample_report("Old Town", now - Duration::hours(30))];
        let summary = compute_stats(&reports, &now);

        let markdown = render_markdown(&summary, &reports, &now);

        assert!(markdown.contains("| 45 min ago | Harbour | 35-44 |"));
        assert!(markdown.contains("| Yesterday | Old Town | 35-44 |"));
        assert!(markdown.contains("50% of check-ins flagged mental health strain."));
        assert!(markdown.contains("- Headache / fatigue: 2"));
    }
}
