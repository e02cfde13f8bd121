use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::actions::corrective_action;
use super::domain::{EvidenceRef, ItemStatus, Severity};
use super::scoring::{section_score, ScoreBand};
use super::session::AuditSession;

/// Live walkthrough snapshot for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuditProgress {
    pub live_score: u8,
    pub band: ScoreBand,
    pub answered: usize,
    pub total: usize,
    pub percent_complete: u8,
    pub completed_sections: usize,
    pub section_count: usize,
    pub current_section: usize,
    pub sections: Vec<SectionProgressEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionProgressEntry {
    pub id: usize,
    pub name: &'static str,
    pub citation: &'static str,
    pub answered: usize,
    pub total: usize,
}

impl AuditProgress {
    pub fn from_session(session: &AuditSession) -> Self {
        let answered = session.answered_count();
        let total = session.total_items();
        let percent_complete = if total == 0 {
            0
        } else {
            (answered * 100 / total) as u8
        };
        let score = session.score();

        Self {
            live_score: score,
            band: ScoreBand::from_score(score),
            answered,
            total,
            percent_complete,
            completed_sections: session.completed_sections(),
            section_count: session.sections().len(),
            current_section: session.current_section_index(),
            sections: session
                .sections()
                .iter()
                .map(|section| SectionProgressEntry {
                    id: section.id,
                    name: section.name,
                    citation: section.citation,
                    answered: section.answered_count(),
                    total: section.items.len(),
                })
                .collect(),
        }
    }
}

/// One failed item as it appears in the finalized results.
#[derive(Debug, Clone, Serialize)]
pub struct FailedItemView {
    pub item_id: String,
    pub text: &'static str,
    pub section: &'static str,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub notes: String,
    pub evidence: Vec<EvidenceRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionScoreEntry {
    pub id: usize,
    pub name: &'static str,
    pub citation: &'static str,
    pub score: u8,
    pub band: ScoreBand,
}

/// Finalized results payload: overall and per-section scores, failures
/// grouped by severity, and the generated corrective-action plan.
#[derive(Debug, Clone, Serialize)]
pub struct AuditResults {
    pub score: u8,
    pub band: ScoreBand,
    pub scored_items: usize,
    pub failed_items: usize,
    pub section_scores: Vec<SectionScoreEntry>,
    pub critical: Vec<FailedItemView>,
    pub major: Vec<FailedItemView>,
    pub minor: Vec<FailedItemView>,
    pub action_plan: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl AuditResults {
    pub fn from_session(session: &AuditSession, completed_at: DateTime<Utc>) -> Self {
        let mut scored_items = 0;
        let mut failures: Vec<FailedItemView> = Vec::new();

        for section in session.sections() {
            for item in &section.items {
                if item.status.is_scoreable() {
                    scored_items += 1;
                }
                if let ItemStatus::Fail(detail) = &item.status {
                    failures.push(FailedItemView {
                        item_id: item.id.clone(),
                        text: item.text,
                        section: section.name,
                        severity: detail.severity,
                        severity_label: detail.severity.label(),
                        notes: detail.notes.clone(),
                        evidence: detail.evidence.clone(),
                    });
                }
            }
        }

        // Plan entries keep checklist order; severity grouping is separate.
        let action_plan = failures
            .iter()
            .map(|failure| corrective_action(failure.text, failure.section, failure.severity))
            .collect();

        let by_severity = |severity: Severity| {
            failures
                .iter()
                .filter(|failure| failure.severity == severity)
                .cloned()
                .collect::<Vec<_>>()
        };

        let score = session.score();

        Self {
            score,
            band: ScoreBand::from_score(score),
            scored_items,
            failed_items: failures.len(),
            section_scores: session
                .sections()
                .iter()
                .map(|section| {
                    let score = section_score(section);
                    SectionScoreEntry {
                        id: section.id,
                        name: section.name,
                        citation: section.citation,
                        score,
                        band: ScoreBand::from_score(score),
                    }
                })
                .collect(),
            critical: by_severity(Severity::Critical),
            major: by_severity(Severity::Major),
            minor: by_severity(Severity::Minor),
            action_plan,
            started_at: session.started_at(),
            completed_at,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailedItemView> {
        self.critical.iter().chain(&self.major).chain(&self.minor)
    }

    /// Export the corrective-action plan as CSV, one row per failed item in
    /// severity order.
    pub fn write_action_plan_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["severity", "section", "item", "notes", "corrective_action"])?;
        for failure in self.failures() {
            csv.write_record([
                failure.severity_label,
                failure.section,
                failure.text,
                failure.notes.as_str(),
                corrective_action(failure.text, failure.section, failure.severity).as_str(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}
