//! Service and event attendance report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::types::*;

/// One dated occurrence in an attendance report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub date: NaiveDate,
    pub total: u32,
    pub members_present: usize,
}

/// Attendance for a single service or event over an optional date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub service_id: String,
    pub service_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Oldest occurrence first
    pub rows: Vec<AttendanceRow>,
    pub total_attendance: u64,
    /// Distinct directory members seen across all rows
    pub unique_attendees: usize,
}

impl AttendanceReport {
    /// Build the report from a service's records
    ///
    /// Both ends of the range are inclusive and either may be left open.
    /// Records for other services are ignored.
    pub fn build(
        service_id: &str,
        records: &[AttendanceRecord],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> ChurchResult<Self> {
        if service_id.trim().is_empty() {
            return Err(ChurchError::Validation(
                "Please select a service or event.".to_string(),
            ));
        }

        let mut selected: Vec<&AttendanceRecord> = records
            .iter()
            .filter(|r| r.service_id == service_id)
            .filter(|r| start_date.map_or(true, |start| r.date >= start))
            .filter(|r| end_date.map_or(true, |end| r.date <= end))
            .collect();
        selected.sort_by_key(|r| r.date);

        let unique: BTreeSet<&str> = selected
            .iter()
            .flat_map(|r| r.attendee_ids.iter().map(String::as_str))
            .collect();

        let service_name = records
            .iter()
            .find(|r| r.service_id == service_id)
            .map(|r| r.service_name.clone())
            .unwrap_or_else(|| "Unknown Service".to_string());

        Ok(Self {
            service_id: service_id.to_string(),
            service_name,
            start_date,
            end_date,
            total_attendance: selected.iter().map(|r| u64::from(r.total)).sum(),
            unique_attendees: unique.len(),
            rows: selected
                .into_iter()
                .map(|r| AttendanceRow {
                    date: r.date,
                    total: r.total,
                    members_present: r.attendee_ids.len(),
                })
                .collect(),
        })
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Attendance Report: {}", self.service_name);
        let range = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string())
        };
        let _ = writeln!(
            out,
            "Period: {} to {}",
            range(self.start_date),
            range(self.end_date)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<12} {:>8} {:>8}", "Date", "Total", "Members");
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<12} {:>8} {:>8}",
                row.date.format("%Y-%m-%d"),
                row.total,
                row.members_present
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Total Attendance: {}", self.total_attendance);
        let _ = writeln!(out, "Unique Attendees: {}", self.unique_attendees);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, day).unwrap()
    }

    fn record(service_id: &str, day: u32, total: u32, ids: &[&str]) -> AttendanceRecord {
        AttendanceRecord {
            service_id: service_id.to_string(),
            service_name: "Sunday Morning Worship".to_string(),
            date: date(day),
            total,
            attendee_ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn sample() -> Vec<AttendanceRecord> {
        vec![
            record("srv001", 23, 115, &["m001", "m004"]),
            record("srv001", 16, 120, &["m001", "m002"]),
            record("evt001", 20, 75, &["m003"]),
            record("srv001", 30, 98, &[]),
        ]
    }

    #[test]
    fn test_rows_sorted_and_totals() {
        let report = AttendanceReport::build("srv001", &sample(), None, None).unwrap();
        let dates: Vec<_> = report.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(16), date(23), date(30)]);
        assert_eq!(report.total_attendance, 333);
        assert_eq!(report.service_name, "Sunday Morning Worship");
    }

    #[test]
    fn test_unique_attendees_counted_once() {
        let report = AttendanceReport::build("srv001", &sample(), None, Some(date(23))).unwrap();
        // m001 attended both weeks
        assert_eq!(report.unique_attendees, 3);
        assert_eq!(report.rows[0].members_present, 2);
    }

    #[test]
    fn test_range_edges_are_inclusive() {
        let records = sample();

        let exact = AttendanceReport::build("srv001", &records, Some(date(16)), Some(date(23)))
            .unwrap();
        assert_eq!(exact.rows.len(), 2);
        assert_eq!(exact.total_attendance, 235);

        let from = AttendanceReport::build("srv001", &records, Some(date(23)), None).unwrap();
        assert_eq!(from.rows.len(), 2);

        let until = AttendanceReport::build("srv001", &records, None, Some(date(22))).unwrap();
        assert_eq!(until.rows.len(), 1);
        assert_eq!(until.rows[0].date, date(16));

        let empty = AttendanceReport::build("srv001", &records, Some(date(24)), Some(date(29)))
            .unwrap();
        assert!(empty.rows.is_empty());
        assert_eq!(empty.total_attendance, 0);
        assert_eq!(empty.unique_attendees, 0);
    }

    #[test]
    fn test_service_required() {
        match AttendanceReport::build("  ", &sample(), None, None) {
            Err(ChurchError::Validation(msg)) => assert_eq!(msg, "Please select a service or event."),
            other => panic!("expected validation error, got {:?}", other),
        }

        let unknown = AttendanceReport::build("srv999", &sample(), None, None).unwrap();
        assert_eq!(unknown.service_name, "Unknown Service");
        assert!(unknown.rows.is_empty());
    }

    #[test]
    fn test_render_text() {
        let text = AttendanceReport::build("srv001", &sample(), Some(date(16)), None)
            .unwrap()
            .render_text();
        assert!(text.contains("Attendance Report: Sunday Morning Worship"));
        assert!(text.contains("Period: 2023-07-16 to N/A"));
        assert!(text.contains("Total Attendance: 333"));
        assert!(text.contains("Unique Attendees: 3"));
    }
}
