use chrono::{DateTime, Utc};
use tracing::warn;

use super::checklist::AuditChecklist;
use super::domain::{
    AuditError, AuditPhase, AuditSection, EvidenceRef, FailDetail, ItemStatus, ItemVerdict,
    Severity,
};
use super::draft::{DraftStore, SectionDraft, SessionDraft};
use super::report::{AuditProgress, AuditResults};
use super::scoring::overall_score;

/// One audit in flight: the answered copy of the checklist plus the
/// operator's position in it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditSession {
    sections: Vec<AuditSection>,
    current_section: usize,
    started_at: DateTime<Utc>,
}

impl AuditSession {
    pub fn new(checklist: AuditChecklist, started_at: DateTime<Utc>) -> Self {
        Self {
            sections: checklist.into_sections(),
            current_section: 0,
            started_at,
        }
    }

    /// Rebuild a session from a saved draft by pairing the draft against a
    /// fresh template position-by-position. Anything the draft is missing
    /// keeps its template default, so a truncated or partial draft still
    /// yields a usable session.
    pub fn from_draft(checklist: AuditChecklist, draft: SessionDraft, now: DateTime<Utc>) -> Self {
        let mut sections = checklist.into_sections();

        for (section, saved) in sections.iter_mut().zip(draft.sections) {
            for (item, status) in section.items.iter_mut().zip(saved.items) {
                item.status = status;
            }
        }

        let last = sections.len().saturating_sub(1);
        Self {
            current_section: draft.current_section.min(last),
            started_at: draft.started_at.unwrap_or(now),
            sections,
        }
    }

    pub fn to_draft(&self) -> SessionDraft {
        SessionDraft {
            sections: self
                .sections
                .iter()
                .map(|section| SectionDraft {
                    items: section.items.iter().map(|item| item.status.clone()).collect(),
                })
                .collect(),
            current_section: self.current_section,
            started_at: Some(self.started_at),
        }
    }

    pub fn sections(&self) -> &[AuditSection] {
        &self.sections
    }

    pub fn current_section_index(&self) -> usize {
        self.current_section
    }

    pub fn current_section(&self) -> &AuditSection {
        &self.sections[self.current_section]
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    pub fn answered_count(&self) -> usize {
        self.sections
            .iter()
            .map(AuditSection::answered_count)
            .sum()
    }

    pub fn unanswered_count(&self) -> usize {
        self.total_items() - self.answered_count()
    }

    pub fn completed_sections(&self) -> usize {
        self.sections
            .iter()
            .filter(|section| section.is_complete())
            .count()
    }

    /// Live score over everything answered so far.
    pub fn score(&self) -> u8 {
        overall_score(&self.sections)
    }

    pub fn progress(&self) -> AuditProgress {
        AuditProgress::from_session(self)
    }

    fn item_mut(
        &mut self,
        section: usize,
        item: usize,
    ) -> Result<&mut super::domain::AuditItem, AuditError> {
        let sections = self.sections.len();
        let entry = self
            .sections
            .get_mut(section)
            .ok_or(AuditError::SectionOutOfRange {
                index: section,
                sections,
            })?;
        entry
            .items
            .get_mut(item)
            .ok_or(AuditError::ItemOutOfRange { section, item })
    }

    /// Record a judgment for one item. A fresh failure starts at `Major`
    /// with empty notes; re-failing an already failed item keeps whatever
    /// was recorded; leaving the failed state drops severity, notes, and
    /// evidence together.
    pub fn set_status(
        &mut self,
        section: usize,
        item: usize,
        verdict: ItemVerdict,
    ) -> Result<(), AuditError> {
        let entry = self.item_mut(section, item)?;
        let previous = std::mem::take(&mut entry.status);
        entry.status = match (verdict, previous) {
            (ItemVerdict::Fail, ItemStatus::Fail(detail)) => ItemStatus::Fail(detail),
            (ItemVerdict::Fail, _) => ItemStatus::Fail(FailDetail::default()),
            (ItemVerdict::Pass, _) => ItemStatus::Pass,
            (ItemVerdict::NotApplicable, _) => ItemStatus::NotApplicable,
        };
        Ok(())
    }

    pub fn set_severity(
        &mut self,
        section: usize,
        item: usize,
        severity: Severity,
    ) -> Result<(), AuditError> {
        match &mut self.item_mut(section, item)?.status {
            ItemStatus::Fail(detail) => {
                detail.severity = severity;
                Ok(())
            }
            _ => Err(AuditError::NotFailing),
        }
    }

    pub fn set_notes(
        &mut self,
        section: usize,
        item: usize,
        notes: impl Into<String>,
    ) -> Result<(), AuditError> {
        match &mut self.item_mut(section, item)?.status {
            ItemStatus::Fail(detail) => {
                detail.notes = notes.into();
                Ok(())
            }
            _ => Err(AuditError::NotFailing),
        }
    }

    pub fn attach_evidence(
        &mut self,
        section: usize,
        item: usize,
        evidence: EvidenceRef,
    ) -> Result<(), AuditError> {
        match &mut self.item_mut(section, item)?.status {
            ItemStatus::Fail(detail) => {
                detail.evidence.push(evidence);
                Ok(())
            }
            _ => Err(AuditError::NotFailing),
        }
    }

    pub fn next_section(&mut self) {
        let last = self.sections.len().saturating_sub(1);
        self.current_section = (self.current_section + 1).min(last);
    }

    pub fn previous_section(&mut self) {
        self.current_section = self.current_section.saturating_sub(1);
    }
}

/// State machine driving a single operator through overview, walkthrough,
/// and results. At most one session exists at a time; starting a new audit
/// replaces any existing one. Every mutation during the walkthrough is
/// checkpointed to the draft store, and a failed checkpoint degrades
/// resumability without interrupting the audit.
#[derive(Debug)]
pub struct AuditWorkflow<S: DraftStore> {
    phase: AuditPhase,
    session: Option<AuditSession>,
    store: S,
}

impl<S: DraftStore> AuditWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self {
            phase: AuditPhase::Overview,
            session: None,
            store,
        }
    }

    pub fn phase(&self) -> AuditPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&AuditSession> {
        self.session.as_ref()
    }

    pub fn has_draft(&self) -> bool {
        self.store.restore().is_some()
    }

    /// Begin a fresh walkthrough, replacing any session and stale draft.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.discard_draft();
        self.session = Some(AuditSession::new(AuditChecklist::standard(), now));
        self.phase = AuditPhase::Walkthrough;
        self.checkpoint();
    }

    /// Resume the saved draft, reconciling it against a fresh template.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), AuditError> {
        let draft = self.store.restore().ok_or(AuditError::NoDraft)?;
        self.session = Some(AuditSession::from_draft(
            AuditChecklist::standard(),
            draft,
            now,
        ));
        self.phase = AuditPhase::Walkthrough;
        Ok(())
    }

    /// Delete the saved draft without touching the in-memory session.
    pub fn discard_draft(&mut self) {
        if let Err(err) = self.store.discard() {
            warn!(%err, "failed to discard saved draft");
        }
    }

    fn active_session(&mut self) -> Result<&mut AuditSession, AuditError> {
        if self.phase != AuditPhase::Walkthrough {
            return Err(AuditError::NoActiveSession);
        }
        self.session.as_mut().ok_or(AuditError::NoActiveSession)
    }

    /// Fire-and-forget persistence: the in-memory answer always wins, and a
    /// write failure is logged rather than rolled back.
    fn checkpoint(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let draft = session.to_draft();
        if let Err(err) = self.store.checkpoint(&draft) {
            warn!(%err, "draft checkpoint failed; audit continues without saved progress");
        }
    }

    pub fn set_status(
        &mut self,
        section: usize,
        item: usize,
        verdict: ItemVerdict,
    ) -> Result<(), AuditError> {
        self.active_session()?.set_status(section, item, verdict)?;
        self.checkpoint();
        Ok(())
    }

    pub fn set_severity(
        &mut self,
        section: usize,
        item: usize,
        severity: Severity,
    ) -> Result<(), AuditError> {
        self.active_session()?.set_severity(section, item, severity)?;
        self.checkpoint();
        Ok(())
    }

    pub fn set_notes(
        &mut self,
        section: usize,
        item: usize,
        notes: impl Into<String>,
    ) -> Result<(), AuditError> {
        self.active_session()?.set_notes(section, item, notes)?;
        self.checkpoint();
        Ok(())
    }

    pub fn attach_evidence(
        &mut self,
        section: usize,
        item: usize,
        evidence: EvidenceRef,
    ) -> Result<(), AuditError> {
        self.active_session()?.attach_evidence(section, item, evidence)?;
        self.checkpoint();
        Ok(())
    }

    pub fn next_section(&mut self) -> Result<(), AuditError> {
        self.active_session()?.next_section();
        self.checkpoint();
        Ok(())
    }

    pub fn previous_section(&mut self) -> Result<(), AuditError> {
        self.active_session()?.previous_section();
        self.checkpoint();
        Ok(())
    }

    pub fn progress(&self) -> Option<AuditProgress> {
        self.session.as_ref().map(AuditSession::progress)
    }

    /// Finalize the walkthrough. Rejected with the exact outstanding count
    /// while any item is unanswered; on success the draft is deleted and
    /// the workflow moves to the read-only results phase.
    pub fn finish(&mut self, completed_at: DateTime<Utc>) -> Result<AuditResults, AuditError> {
        let unanswered = self.active_session()?.unanswered_count();
        if unanswered > 0 {
            return Err(AuditError::Unanswered(unanswered));
        }
        self.finalize(completed_at)
    }

    /// Finalize immediately, scoring only what has been answered so far.
    pub fn finish_early(&mut self, completed_at: DateTime<Utc>) -> Result<AuditResults, AuditError> {
        self.active_session()?;
        self.finalize(completed_at)
    }

    fn finalize(&mut self, completed_at: DateTime<Utc>) -> Result<AuditResults, AuditError> {
        let session = self.session.as_ref().ok_or(AuditError::NoActiveSession)?;
        let results = AuditResults::from_session(session, completed_at);
        self.discard_draft();
        self.phase = AuditPhase::Results;
        Ok(results)
    }

    /// Abandon everything and return to the overview.
    pub fn reset(&mut self) {
        self.discard_draft();
        self.session = None;
        self.phase = AuditPhase::Overview;
    }
}
