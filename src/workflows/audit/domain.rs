use serde::{Deserialize, Serialize};

/// Weight class assigned to a failed checklist item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    #[default]
    Major,
    Minor,
}

impl Severity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Critical, Self::Major, Self::Minor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Major => "Major",
            Self::Minor => "Minor",
        }
    }

    /// Points deducted from a section's budget when an item fails at this
    /// severity. Each scoreable item contributes ten points to the budget.
    pub const fn penalty(self) -> u32 {
        match self {
            Self::Critical => 10,
            Self::Major => 5,
            Self::Minor => 2,
        }
    }
}

/// Opaque handle to evidence captured by the external photo pipeline. The
/// engine stores and surfaces the association without interpreting it.
pub type EvidenceRef = String;

/// Everything recorded against a failing item. Dropped in full whenever the
/// item leaves the failed state, so stale notes or severity can never leak
/// into a later answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailDetail {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceRef>,
}

/// Answer state of a single checklist item. Severity, notes, and evidence
/// only exist inside the `Fail` variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Unanswered,
    Pass,
    NotApplicable,
    Fail(FailDetail),
}

impl ItemStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unanswered => "Unanswered",
            Self::Pass => "Pass",
            Self::NotApplicable => "N/A",
            Self::Fail(_) => "Fail",
        }
    }

    pub const fn is_answered(&self) -> bool {
        !matches!(self, Self::Unanswered)
    }

    /// Whether the item counts toward the scoring denominator.
    pub const fn is_scoreable(&self) -> bool {
        matches!(self, Self::Pass | Self::Fail(_))
    }
}

/// Judgment an operator can record for an item during the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemVerdict {
    Pass,
    Fail,
    NotApplicable,
}

/// One checklist question within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditItem {
    /// Stable identifier, used to reconcile persisted drafts against the
    /// canonical checklist across resumed sessions.
    pub id: String,
    pub text: &'static str,
    pub status: ItemStatus,
}

impl AuditItem {
    pub fn fail_detail(&self) -> Option<&FailDetail> {
        match &self.status {
            ItemStatus::Fail(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Ordered group of items sharing a regulatory citation. Item order is
/// significant: drafts are reconciled by position, not by matching text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSection {
    pub id: usize,
    pub name: &'static str,
    pub citation: &'static str,
    pub items: Vec<AuditItem>,
}

impl AuditSection {
    pub fn answered_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.status.is_answered())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.items.iter().all(|item| item.status.is_answered())
    }
}

/// Where the workflow currently sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPhase {
    #[default]
    Overview,
    Walkthrough,
    Results,
}

impl AuditPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Walkthrough => "Walkthrough",
            Self::Results => "Results",
        }
    }
}

/// Recoverable conditions surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("{0} item(s) still unanswered; complete every item to finish")]
    Unanswered(usize),
    #[error("no audit walkthrough is in progress")]
    NoActiveSession,
    #[error("no saved draft available to resume")]
    NoDraft,
    #[error("section index {index} out of range ({sections} sections)")]
    SectionOutOfRange { index: usize, sections: usize },
    #[error("item index {item} out of range in section {section}")]
    ItemOutOfRange { section: usize, item: usize },
    #[error("unknown checklist item '{0}'")]
    UnknownItem(String),
    #[error("severity, notes, and evidence apply only to failed items")]
    NotFailing,
}
