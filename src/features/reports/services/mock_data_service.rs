use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use uuid::Uuid;

use crate::features::reports::models::{
    Department, Location, Report, ReportStatus, Stage, StageComment, StageRecord, UnifiedReport,
};

/// Upper bound on stage comment length in the staged layout
pub const MAX_COMMENT_CHARS: usize = 100;

/// Days between consecutive stages in the staged layout
const STAGE_GAP_DAYS_MIN: i64 = 1;
const STAGE_GAP_DAYS_MAX: i64 = 20;

/// Generates synthetic incident reports and stage records
#[derive(Debug, Clone, Default)]
pub struct MockDataService;

impl MockDataService {
    pub fn new() -> Self {
        Self
    }

    /// New report with status `Report`, created some time this year
    pub fn report(&self, now: DateTime<Utc>) -> Report {
        Report {
            report_id: Uuid::new_v4().to_string(),
            department: self.department(),
            details: self.details(),
            location: self.location(),
            topic: Sentence(3..4).fake(),
            username: SafeEmail().fake(),
            created_at: self.datetime_between(start_of_year(now), now),
            status: ReportStatus::Report,
            image_url: None,
        }
    }

    /// Stage record for `report_id`, 1-20 days after `previous_created_at`
    pub fn stage_record(
        &self,
        report_id: &str,
        department: Department,
        previous_created_at: DateTime<Utc>,
    ) -> StageRecord {
        let gap_days: i64 = (STAGE_GAP_DAYS_MIN..=STAGE_GAP_DAYS_MAX).fake();

        StageRecord {
            report_id: report_id.to_string(),
            comment: self.comment(),
            created_at: previous_created_at + Duration::days(gap_days),
            image_url: None,
            updater: SafeEmail().fake(),
            updater_role: department.worker_role(),
            department,
        }
    }

    /// Unified report that has progressed up to `status`, created this month.
    /// Stage timestamps and comments exist only for reached stages.
    pub fn unified_report(&self, status: ReportStatus, now: DateTime<Utc>) -> UnifiedReport {
        let created_at = self.datetime_between(start_of_month(now), now);

        let ack_time = created_at + self.stage_delta();
        let processing_time = ack_time + self.stage_delta();
        let done_time = processing_time + self.stage_delta();

        let reached = |stage: Stage| status >= stage.status();

        // Stages are reached in order, one per step past `Report`
        let comments = Stage::ALL
            .into_iter()
            .take(status.ordinal())
            .map(|stage| StageComment {
                stage,
                comment: stage.unified_comment().to_string(),
                image_url: self.image_url(),
                updater: SafeEmail().fake(),
                updater_role: stage.unified_role().to_string(),
                created_at: match stage {
                    Stage::Ack => ack_time,
                    Stage::Processing => processing_time,
                    Stage::Done => done_time,
                },
            })
            .collect();

        UnifiedReport {
            report_id: Uuid::new_v4().to_string(),
            department: self.department(),
            details: self.details(),
            location: self.location(),
            status,
            topic: Sentence(4..10).fake(),
            username: SafeEmail().fake(),
            created_at,
            acknowledged_at: reached(Stage::Ack).then_some(ack_time),
            processing_started_at: reached(Stage::Processing).then_some(processing_time),
            done_at: reached(Stage::Done).then_some(done_time),
            image_url: self.image_url(),
            comments,
        }
    }

    fn department(&self) -> Department {
        let index: usize = (0..Department::ALL.len()).fake();
        Department::ALL[index]
    }

    fn details(&self) -> String {
        Paragraph(1..3).fake()
    }

    fn comment(&self) -> String {
        let sentence: String = Sentence(4..12).fake();
        truncate_chars(&sentence, MAX_COMMENT_CHARS)
    }

    fn location(&self) -> Location {
        Location {
            latitude: round6((-90.0..90.0).fake::<f64>()),
            longitude: round6((-180.0..180.0).fake::<f64>()),
        }
    }

    fn image_url(&self) -> String {
        let width: u32 = (200..=1200).fake();
        let height: u32 = (200..=1200).fake();
        format!("https://picsum.photos/{}/{}", width, height)
    }

    /// 1-10 days, 0-23 hours, 0-59 minutes
    fn stage_delta(&self) -> Duration {
        let days: i64 = (1..=10).fake();
        let hours: i64 = (0..=23).fake();
        let minutes: i64 = (0..=59).fake();
        Duration::days(days) + Duration::hours(hours) + Duration::minutes(minutes)
    }

    /// Uniform timestamp in `[start, end]`, whole seconds
    fn datetime_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
        let span = (end - start).num_seconds().max(0);
        let offset: i64 = (0..=span).fake();
        start + Duration::seconds(offset)
    }
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Cut `text` to at most `max` characters without splitting a char
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 27, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_report_defaults() {
        let mock = MockDataService::new();
        for _ in 0..20 {
            let report = mock.report(now());
            assert_eq!(report.status, ReportStatus::Report);
            assert!(Uuid::parse_str(&report.report_id).is_ok());
            assert!(report.created_at >= start_of_year(now()) && report.created_at <= now());
            assert!((-90.0..=90.0).contains(&report.location.latitude));
            assert!((-180.0..=180.0).contains(&report.location.longitude));
            assert!(report.username.contains('@'));
            assert!(report.image_url.is_none());
        }
    }

    #[test]
    fn test_stage_record_is_strictly_later() {
        let mock = MockDataService::new();
        let previous = now();
        for _ in 0..50 {
            let record = mock.stage_record("r-1", Department::Finance, previous);
            let gap = record.created_at - previous;
            assert!(gap >= Duration::days(1) && gap <= Duration::days(20));
            assert_eq!(record.updater_role, "Finance-Worker");
            assert_eq!(record.department, Department::Finance);
            assert!(record.comment.chars().count() <= MAX_COMMENT_CHARS);
        }
    }

    #[test]
    fn test_unified_report_matches_status() {
        let mock = MockDataService::new();
        for status in ReportStatus::ALL {
            let report = mock.unified_report(status, now());
            assert_eq!(report.status, status);
            assert_eq!(report.comments.len(), status.ordinal());
            assert_eq!(report.acknowledged_at.is_some(), status >= ReportStatus::Ack);
            assert_eq!(
                report.processing_started_at.is_some(),
                status >= ReportStatus::Processing
            );
            assert_eq!(report.done_at.is_some(), status == ReportStatus::Done);
            assert!(report.created_at >= start_of_month(now()));

            let mut previous = report.created_at;
            for comment in &report.comments {
                assert!(comment.created_at > previous);
                assert_eq!(comment.updater_role, comment.stage.unified_role());
                previous = comment.created_at;
            }
        }
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("สวัสดีครับ", 3), "สวั");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_datetime_between_degenerate_range() {
        let mock = MockDataService::new();
        assert_eq!(mock.datetime_between(now(), now()), now());
    }
}
