//! Seeded demo data used by the CLI demo command and stakeholder walkthroughs.

use chrono::{DateTime, NaiveDate, Utc};

use super::checklist::AuditChecklist;
use super::domain::{ItemVerdict, Severity};
use super::history::{AuditHistory, FailureEntry, HistoryRecord};
use super::session::AuditSession;

/// A walkthrough with the first six sections already answered: three seeded
/// failures, everything else passing, cursor parked on the final section so
/// a demo operator finishes the Documentation & Records items live.
pub fn demo_session(started_at: DateTime<Utc>) -> AuditSession {
    let mut session = AuditSession::new(AuditChecklist::standard(), started_at);

    let seeded_fails: &[(usize, usize, Severity, &str)] = &[
        (
            0,
            2,
            Severity::Major,
            "Walk-in cooler cooling log showed 135°F to 80°F in 2 hours. Needs recalibration.",
        ),
        (
            2,
            4,
            Severity::Minor,
            "Allergen labels missing on two prep containers in dry storage.",
        ),
        (
            4,
            3,
            Severity::Major,
            "Ansul system service tag shows last inspection was 7 months ago.",
        ),
    ];

    for section_index in 0..6 {
        let item_count = session.sections()[section_index].items.len();
        for item_index in 0..item_count {
            let seeded = seeded_fails
                .iter()
                .find(|(si, ii, _, _)| *si == section_index && *ii == item_index);
            match seeded {
                Some((_, _, severity, notes)) => {
                    session
                        .set_status(section_index, item_index, ItemVerdict::Fail)
                        .expect("seeded item in range");
                    session
                        .set_severity(section_index, item_index, *severity)
                        .expect("seeded item failing");
                    session
                        .set_notes(section_index, item_index, *notes)
                        .expect("seeded item failing");
                }
                None => {
                    session
                        .set_status(section_index, item_index, ItemVerdict::Pass)
                        .expect("item in range");
                }
            }
        }
    }

    for _ in 0..6 {
        session.next_section();
    }

    session
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}

fn entry(section: &str, item: &str, severity: Severity, notes: &str) -> FailureEntry {
    FailureEntry {
        section: section.to_string(),
        item: item.to_string(),
        severity,
        notes: notes.to_string(),
    }
}

/// Three past audits showing an improving score line (85 → 89 → 94).
pub fn demo_history() -> AuditHistory {
    AuditHistory::from_records(vec![
        HistoryRecord {
            id: "h1".to_string(),
            date: date(2026, 1, 15),
            score: 85,
            total_fails: 7,
            critical: 2,
            major: 3,
            minor: 2,
            auditor: "Maria Gonzalez".to_string(),
            fails: vec![
                entry(
                    "Food Temperature Control",
                    "Cold holding below 41°F",
                    Severity::Critical,
                    "Walk-in cooler temp at 47°F.",
                ),
                entry(
                    "Food Temperature Control",
                    "Thermometer calibration verified",
                    Severity::Major,
                    "Two thermometers not calibrated.",
                ),
                entry(
                    "Employee Hygiene & Health",
                    "Proper handwashing observed",
                    Severity::Critical,
                    "Line cook skipped handwashing between tasks.",
                ),
                entry(
                    "Food Storage & Labeling",
                    "FIFO rotation followed",
                    Severity::Major,
                    "Old stock found behind new deliveries.",
                ),
                entry(
                    "Equipment & Utensils",
                    "Cutting boards in good repair",
                    Severity::Minor,
                    "One cutting board has deep scoring.",
                ),
                entry(
                    "Facility Safety & Suppression",
                    "Ansul system last service within 6 months",
                    Severity::Major,
                    "Last service was 8 months ago.",
                ),
                entry(
                    "Facility & Pest Control",
                    "No evidence of pest activity",
                    Severity::Minor,
                    "Minor fly activity near back door.",
                ),
            ],
        },
        HistoryRecord {
            id: "h2".to_string(),
            date: date(2026, 1, 29),
            score: 89,
            total_fails: 5,
            critical: 1,
            major: 2,
            minor: 2,
            auditor: "Maria Gonzalez".to_string(),
            fails: vec![
                entry(
                    "Food Temperature Control",
                    "Cooling from 135°F to 70°F within 2 hours",
                    Severity::Critical,
                    "Soup cooling took 2.5 hours.",
                ),
                entry(
                    "Food Storage & Labeling",
                    "Date marking on opened TCS foods",
                    Severity::Major,
                    "Three containers missing date labels.",
                ),
                entry(
                    "Equipment & Utensils",
                    "Sanitizer concentration verified (quat/chlorine)",
                    Severity::Minor,
                    "Quat sanitizer slightly below range.",
                ),
                entry(
                    "Facility Safety & Suppression",
                    "Grease filter cleaning schedule current",
                    Severity::Major,
                    "Filters overdue by one week.",
                ),
                entry(
                    "Documentation & Records",
                    "Vendor service records current",
                    Severity::Minor,
                    "Missing one vendor certificate.",
                ),
            ],
        },
        HistoryRecord {
            id: "h3".to_string(),
            date: date(2026, 2, 10),
            score: 94,
            total_fails: 2,
            critical: 0,
            major: 1,
            minor: 1,
            auditor: "Maria Gonzalez".to_string(),
            fails: vec![
                entry(
                    "Food Temperature Control",
                    "Cooling from 135°F to 70°F within 2 hours",
                    Severity::Major,
                    "Walk-in cooler cooling log showed 135°F to 80°F in 2 hours.",
                ),
                entry(
                    "Food Storage & Labeling",
                    "Allergen labeling present",
                    Severity::Minor,
                    "Allergen labels missing on two prep containers.",
                ),
            ],
        },
    ])
}
