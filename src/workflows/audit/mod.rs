//! Guided self-audit engine: a section-by-section compliance walkthrough
//! with severity-weighted scoring, resumable drafts, a corrective-action
//! plan, and score history.

mod actions;
mod checklist;
pub mod demo;
pub mod domain;
pub mod draft;
pub mod history;
pub mod report;
mod scoring;
mod session;

pub use actions::corrective_action;
pub use checklist::AuditChecklist;
pub use domain::{
    AuditError, AuditItem, AuditPhase, AuditSection, EvidenceRef, FailDetail, ItemStatus,
    ItemVerdict, Severity,
};
pub use draft::{DraftError, DraftStore, FileDraftStore, MemoryDraftStore, SessionDraft};
pub use history::{AuditHistory, HistoryRecord, TrendDirection, TrendSummary};
pub use report::{AuditProgress, AuditResults, FailedItemView, SectionScoreEntry};
pub use scoring::{overall_score, score_items, section_score, ScoreBand};
pub use session::{AuditSession, AuditWorkflow};
