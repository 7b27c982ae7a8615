pub mod render;

use crate::config::DayBoundary;
use crate::model::Report;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const TREND_DAYS: i64 = 14;
pub const TOP_CATEGORY_LIMIT: usize = 4;
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: usize,
    #[serde(rename = "last7Days")]
    pub last_7_days: usize,
    pub unique_regions: usize,
    pub trend_data: Vec<TrendPoint>,
    pub top_symptoms: Vec<CategoryCount>,
    pub top_environment: Vec<CategoryCount>,
    pub mental_health_share: u8,
}

/// Aggregates the report sequence into the dashboard summary.
///
/// `now` is the reference instant for the seven-day window, and its timezone
/// is the calendar used to bucket `trend_data`. The result is a pure function
/// of the two arguments.
pub fn compute_stats<Tz: TimeZone>(reports: &[Report], now: &DateTime<Tz>) -> StatsSummary {
    let now_utc = now.with_timezone(&Utc);
    let zone = now.timezone();

    let last_7_days = reports
        .iter()
        .filter(|report| now_utc - report.created_at <= Duration::days(RECENT_WINDOW_DAYS))
        .count();

    let unique_regions = reports
        .iter()
        .map(|report| report.region.trim())
        .filter(|region| !region.is_empty())
        .collect::<HashSet<_>>()
        .len();

    let daily_counts = reports.iter().fold(HashMap::new(), |mut acc, report| {
        let day = report.created_at.with_timezone(&zone).date_naive();
        *acc.entry(day).or_insert(0_usize) += 1;
        acc
    });
    let trend_data = trend_window(now.date_naive())
        .into_iter()
        .map(|day| TrendPoint {
            date: day.format("%m-%d").to_string(),
            count: daily_counts.get(&day).copied().unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    let top_symptoms = top_categories(
        reports
            .iter()
            .map(|report| report.symptom_category.label()),
    );
    let top_environment = top_categories(
        reports
            .iter()
            .map(|report| report.environment_issue.label()),
    );

    let flagged = reports
        .iter()
        .filter(|report| report.mental_health_flag)
        .count();

    StatsSummary {
        total: reports.len(),
        last_7_days,
        unique_regions,
        trend_data,
        top_symptoms,
        top_environment,
        mental_health_share: rounded_percent(flagged, reports.len()),
    }
}

/// Summarizes against the current instant on the configured calendar.
pub fn compute_stats_now(reports: &[Report], boundary: DayBoundary) -> StatsSummary {
    match boundary {
        DayBoundary::Utc => compute_stats(reports, &Utc::now()),
        DayBoundary::Local => compute_stats(reports, &Local::now()),
    }
}

/// The fourteen calendar days ending at `today`, oldest first.
fn trend_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..TREND_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

fn top_categories<'a, I>(labels: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let counts = labels.into_iter().fold(HashMap::new(), |mut acc, label| {
        *acc.entry(label).or_insert(0_usize) += 1;
        acc
    });

    let mut items = counts
        .into_iter()
        .map(|(label, count)| CategoryCount {
            label: label.to_string(),
            count,
        })
        .collect::<Vec<_>>();

    items.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.label.cmp(&right.label))
    });
    items.truncate(TOP_CATEGORY_LIMIT);
    items
}

// Half-up rounding in integer arithmetic: floor((200 * part + whole) / (2 * whole)).
fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }

    let scaled = (200 * part as u64 + whole as u64) / (2 * whole as u64);
    scaled.min(100) as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{AgeGroup, EnvironmentIssue, SymptomCategory};
    use chrono::FixedOffset;
    use uuid::Uuid;

    pub(crate) fn sample_report(region: &str, created_at: DateTime<Utc>) -> Report {
        Report {
            id: Uuid::new_v4(),
            region: region.to_string(),
            age_group: AgeGroup::From35To44,
            symptom_category: SymptomCategory::Headache,
            environment_issue: EnvironmentIssue::Heat,
            mental_health_flag: false,
            notes: String::new(),
            created_at,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let summary = compute_stats(&[], &fixed_now());

        assert_eq!(summary.total, 0);
        assert_eq!(summary.last_7_days, 0);
        assert_eq!(summary.unique_regions, 0);
        assert_eq!(summary.trend_data.len(), 14);
        assert!(summary.trend_data.iter().all(|point| point.count == 0));
        assert!(summary.top_symptoms.is_empty());
        assert!(summary.top_environment.is_empty());
        assert_eq!(summary.mental_health_share, 0);
    }

    #[test]
    fn last_seven_days_counts_inclusive_window_and_future_reports() {
        let now = fixed_now();
        let reports = vec![
            sample_report("A", now - Duration::days(7)),
            sample_report("A", now - Duration::days(7) - Duration::seconds(1)),
            sample_report("A", now - Duration::hours(3)),
            sample_report("A", now + Duration::hours(2)),
        ];

        let summary = compute_stats(&reports, &now);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.last_7_days, 3);
        assert!(summary.last_7_days <= summary.total);
    }

    #[test]
    fn unique_regions_trims_and_skips_blank_values() {
        let now = fixed_now();
        let reports = vec![
            sample_report("M5V", now),
            sample_report("  M5V ", now),
            sample_report("m5v", now),
            sample_report("   ", now),
            sample_report("", now),
        ];

        assert_eq!(compute_stats(&reports, &now).unique_regions, 2);
    }

    #[test]
    fn trend_buckets_by_calendar_day_oldest_first() {
        let now = fixed_now();
        let reports = vec![
            sample_report("A", Utc.with_ymd_and_hms(2026, 10, 16, 0, 5, 0).unwrap()),
            sample_report("A", Utc.with_ymd_and_hms(2026, 10, 16, 14, 0, 0).unwrap()),
            sample_report("A", Utc.with_ymd_and_hms(2026, 10, 15, 23, 59, 0).unwrap()),
            sample_report("A", Utc.with_ymd_and_hms(2026, 10, 3, 1, 0, 0).unwrap()),
            sample_report("A", Utc.with_ymd_and_hms(2026, 10, 2, 23, 0, 0).unwrap()),
        ];

        let summary = compute_stats(&reports, &now);
        let trend = &summary.trend_data;

        assert_eq!(trend.len(), 14);
        assert_eq!(trend[0].date, "10-03");
        assert_eq!(trend[0].count, 1);
        assert_eq!(trend[12].date, "10-15");
        assert_eq!(trend[12].count, 1);
        assert_eq!(trend[13].date, "10-16");
        assert_eq!(trend[13].count, 2);
        assert_eq!(trend.iter().map(|point| point.count).sum::<usize>(), 4);
    }

    #[test]
    fn trend_length_is_fixed_for_large_inputs() {
        let now = fixed_now();
        let reports = (0..1200)
            .map(|index| sample_report("A", now - Duration::hours(index)))
            .collect::<Vec<_>>();

        let summary = compute_stats(&reports, &now);
        assert_eq!(summary.trend_data.len(), 14);
        assert_eq!(summary.total, 1200);
    }

    #[test]
    fn trend_uses_timezone_of_reference_instant() {
        let report = sample_report("A", Utc.with_ymd_and_hms(2026, 10, 15, 19, 30, 0).unwrap());
        let now_utc = Utc.with_ymd_and_hms(2026, 10, 15, 20, 0, 0).unwrap();
        let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
        let now_shifted = now_utc.with_timezone(&plus_five);

        let utc_summary = compute_stats(std::slice::from_ref(&report), &now_utc);
        let shifted_summary = compute_stats(std::slice::from_ref(&report), &now_shifted);

        let utc_last = utc_summary.trend_data.last().unwrap();
        assert_eq!((utc_last.date.as_str(), utc_last.count), ("10-15", 1));

        let shifted_last = shifted_summary.trend_data.last().unwrap();
        assert_eq!((shifted_last.date.as_str(), shifted_last.count), ("10-16", 1));
    }

    #[test]
    fn top_symptoms_sorted_by_count() {
        let now = fixed_now();
        let mut reports = vec![
            sample_report("A", now),
            sample_report("A", now),
            sample_report("A", now),
        ];
        reports[0].symptom_category = SymptomCategory::Fever;
        reports[1].symptom_category = SymptomCategory::Fever;

        let summary = compute_stats(&reports, &now);
        assert_eq!(
            summary.top_symptoms,
            vec![
                CategoryCount {
                    label: "Fever / flu-like symptoms".to_string(),
                    count: 2
                },
                CategoryCount {
                    label: "Headache / fatigue".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn top_environment_caps_at_four_and_breaks_ties_alphabetically() {
        let now = fixed_now();
        let reports = EnvironmentIssue::ALL
            .into_iter()
            .chain([EnvironmentIssue::Water])
            .map(|issue| {
                let mut report = sample_report("A", now);
                report.environment_issue = issue;
                report
            })
            .collect::<Vec<_>>();

        let top = compute_stats(&reports, &now).top_environment;
        let labels = top.iter().map(|item| item.label.as_str()).collect::<Vec<_>>();

        assert_eq!(top.len(), 4);
        assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
        assert_eq!(
            labels,
            vec![
                "Water taste / smell",
                "Air quality / smoke",
                "Heat / humidity",
                "Noise / pollution",
            ]
        );
    }

    #[test]
    fn mental_health_share_rounds_to_nearest_percent() {
        let now = fixed_now();
        let mut reports = (0..8)
            .map(|_| sample_report("A", now))
            .collect::<Vec<_>>();
        assert_eq!(compute_stats(&reports, &now).mental_health_share, 0);

        reports[0].mental_health_flag = true;
        assert_eq!(compute_stats(&reports, &now).mental_health_share, 13);

        reports.truncate(3);
        assert_eq!(compute_stats(&reports, &now).mental_health_share, 33);

        reports.iter_mut().for_each(|report| report.mental_health_flag = true);
        assert_eq!(compute_stats(&reports, &now).mental_health_share, 100);
    }

    #[test]
    fn rounded_percent_handles_empty_total() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(rounded_percent(1, 201), 0);
    }
}
