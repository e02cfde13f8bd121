use serde::Serialize;

use super::domain::{AuditItem, AuditSection, ItemStatus};

/// Point budget contributed by each scoreable item.
const POINTS_PER_ITEM: u32 = 10;

/// Severity-weighted compliance score over any collection of items.
///
/// Unanswered and not-applicable items are excluded from both the
/// denominator and the penalty sum. An empty scoreable set is reported as
/// fully compliant, so an audit where everything is N/A scores 100. The
/// same formula serves both per-section and whole-audit scores; the overall
/// score recombines raw items rather than averaging section results.
pub fn score_items<'a, I>(items: I) -> u8
where
    I: IntoIterator<Item = &'a AuditItem>,
{
    let mut scoreable = 0u32;
    let mut penalty = 0u32;

    for item in items {
        match &item.status {
            ItemStatus::Unanswered | ItemStatus::NotApplicable => {}
            ItemStatus::Pass => scoreable += 1,
            ItemStatus::Fail(detail) => {
                scoreable += 1;
                penalty += detail.severity.penalty();
            }
        }
    }

    if scoreable == 0 {
        return 100;
    }

    let max_points = scoreable * POINTS_PER_ITEM;
    let earned = max_points.saturating_sub(penalty);
    let score = (f64::from(earned) / f64::from(max_points) * 100.0).round();
    score.clamp(0.0, 100.0) as u8
}

pub fn section_score(section: &AuditSection) -> u8 {
    score_items(&section.items)
}

pub fn overall_score(sections: &[AuditSection]) -> u8 {
    score_items(sections.iter().flat_map(|section| &section.items))
}

/// Coarse display grouping for a score. Presentation convenience only; the
/// numeric score is the compliance claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Watch,
    AtRisk,
}

impl ScoreBand {
    pub const fn from_score(score: u8) -> Self {
        if score >= 90 {
            Self::Good
        } else if score >= 75 {
            Self::Watch
        } else {
            Self::AtRisk
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Watch => "Watch",
            Self::AtRisk => "At Risk",
        }
    }
}
