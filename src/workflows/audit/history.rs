use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ItemStatus, Severity};
use super::session::AuditSession;

/// One failed item preserved inside a finalized record. Owned strings, so a
/// record stays valid even if the checklist wording changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub section: String,
    pub item: String,
    pub severity: Severity,
    pub notes: String,
}

/// An immutable finalized audit. Corrections require a new audit, never an
/// edit to an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub date: NaiveDate,
    pub score: u8,
    pub total_fails: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub auditor: String,
    pub fails: Vec<FailureEntry>,
}

impl HistoryRecord {
    /// Snapshot a finalized session into a permanent record.
    pub fn from_session(
        id: impl Into<String>,
        session: &AuditSession,
        auditor: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let mut fails = Vec::new();
        for section in session.sections() {
            for item in &section.items {
                if let ItemStatus::Fail(detail) = &item.status {
                    fails.push(FailureEntry {
                        section: section.name.to_string(),
                        item: item.text.to_string(),
                        severity: detail.severity,
                        notes: detail.notes.clone(),
                    });
                }
            }
        }

        let count = |severity: Severity| {
            fails
                .iter()
                .filter(|entry| entry.severity == severity)
                .count()
        };

        Self {
            id: id.into(),
            date,
            score: session.score(),
            total_fails: fails.len(),
            critical: count(Severity::Critical),
            major: count(Severity::Major),
            minor: count(Severity::Minor),
            auditor: auditor.into(),
            fails,
        }
    }

    /// Display grouping for a single record, keyed off its own score. Not a
    /// statistical claim; the cross-audit comparison lives in [`TrendSummary`].
    pub const fn direction(&self) -> TrendDirection {
        if self.score >= 90 {
            TrendDirection::Improving
        } else if self.score >= 85 {
            TrendDirection::Holding
        } else {
            TrendDirection::Declining
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Holding,
    Declining,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Holding => "Holding",
            Self::Declining => "Declining",
        }
    }
}

/// Signed score movement from the earliest to the most recent retained
/// audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendSummary {
    pub earliest: u8,
    pub latest: u8,
    pub delta: i16,
    pub audits: usize,
}

/// Append-only list of finalized audits, ordered oldest to newest.
#[derive(Debug, Clone, Default)]
pub struct AuditHistory {
    records: Vec<HistoryRecord>,
}

impl AuditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn trend(&self) -> Option<TrendSummary> {
        let earliest = self.records.first()?;
        let latest = self.records.last()?;
        Some(TrendSummary {
            earliest: earliest.score,
            latest: latest.score,
            delta: i16::from(latest.score) - i16::from(earliest.score),
            audits: self.records.len(),
        })
    }
}
