use evidly_audit::workflows::audit::{
    overall_score, score_items, section_score, AuditItem, AuditSection, FailDetail, ItemStatus,
    ScoreBand, Severity,
};

fn item(id: &str, status: ItemStatus) -> AuditItem {
    AuditItem {
        id: id.to_string(),
        text: "checklist item",
        status,
    }
}

fn fail(severity: Severity) -> ItemStatus {
    ItemStatus::Fail(FailDetail {
        severity,
        notes: String::new(),
        evidence: Vec::new(),
    })
}

fn section(id: usize, statuses: Vec<ItemStatus>) -> AuditSection {
    AuditSection {
        id,
        name: "Section",
        citation: "Citation",
        items: statuses
            .into_iter()
            .enumerate()
            .map(|(index, status)| item(&format!("s{id}-i{index}"), status))
            .collect(),
    }
}

#[test]
fn pass_fail_na_mix_scores_seventy_five() {
    // Three items: pass, major fail, N/A. Two scored items give a 20-point
    // budget; the major fail costs 5: round(100 * (20 - 5) / 20) = 75.
    let section = section(
        0,
        vec![
            ItemStatus::Pass,
            fail(Severity::Major),
            ItemStatus::NotApplicable,
        ],
    );
    assert_eq!(section_score(&section), 75);
}

#[test]
fn overall_score_recombines_items_rather_than_averaging_sections() {
    let sections = vec![
        section(0, vec![ItemStatus::Pass, ItemStatus::Pass]),
        section(1, vec![ItemStatus::Pass, fail(Severity::Critical)]),
    ];

    assert_eq!(section_score(&sections[0]), 100);
    assert_eq!(section_score(&sections[1]), 50);
    // Four scored items, 10-point critical penalty: round(100 * 30/40) = 75.
    assert_eq!(overall_score(&sections), 75);

    let uneven = vec![
        section(0, vec![ItemStatus::Pass]),
        section(
            1,
            vec![
                ItemStatus::Pass,
                ItemStatus::Pass,
                ItemStatus::Pass,
                fail(Severity::Critical),
            ],
        ),
    ];
    assert_eq!(section_score(&uneven[0]), 100);
    assert_eq!(section_score(&uneven[1]), 75);
    // Five items, one critical: round(100 * 40/50) = 80, while averaging
    // section scores would give 87.5.
    assert_eq!(overall_score(&uneven), 80);
}

#[test]
fn severity_weights_scale_the_penalty() {
    let critical = section(0, vec![ItemStatus::Pass, fail(Severity::Critical)]);
    let major = section(0, vec![ItemStatus::Pass, fail(Severity::Major)]);
    let minor = section(0, vec![ItemStatus::Pass, fail(Severity::Minor)]);

    assert_eq!(section_score(&critical), 50);
    assert_eq!(section_score(&major), 75);
    assert_eq!(section_score(&minor), 90);
}

#[test]
fn nothing_scoreable_is_fully_compliant() {
    let all_na = section(
        0,
        vec![ItemStatus::NotApplicable, ItemStatus::NotApplicable],
    );
    assert_eq!(section_score(&all_na), 100);

    let untouched = section(0, vec![ItemStatus::Unanswered, ItemStatus::Unanswered]);
    assert_eq!(section_score(&untouched), 100);

    let empty: Vec<AuditItem> = Vec::new();
    assert_eq!(score_items(&empty), 100);
}

#[test]
fn switching_pass_to_fail_never_raises_the_score() {
    for count in 1..=8usize {
        for failed in 0..count {
            let mut statuses = vec![ItemStatus::Pass; count];
            let before = score_items(
                &statuses
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, status)| item(&format!("i{index}"), status))
                    .collect::<Vec<_>>(),
            );

            statuses[failed] = fail(Severity::Minor);
            let after = score_items(
                &statuses
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(index, status)| item(&format!("i{index}"), status))
                    .collect::<Vec<_>>(),
            );

            assert!(after <= before, "score rose after a fail ({count} items)");
        }
    }
}

#[test]
fn not_applicable_items_are_neutral() {
    // Marking extra items N/A leaves the contribution of the others alone.
    let with_na = section(
        0,
        vec![
            ItemStatus::Pass,
            fail(Severity::Major),
            ItemStatus::NotApplicable,
            ItemStatus::NotApplicable,
        ],
    );
    let without_na = section(0, vec![ItemStatus::Pass, fail(Severity::Major)]);
    assert_eq!(section_score(&with_na), section_score(&without_na));
}

#[test]
fn score_bands_group_for_display() {
    assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
    assert_eq!(ScoreBand::from_score(90), ScoreBand::Good);
    assert_eq!(ScoreBand::from_score(89), ScoreBand::Watch);
    assert_eq!(ScoreBand::from_score(75), ScoreBand::Watch);
    assert_eq!(ScoreBand::from_score(74), ScoreBand::AtRisk);
    assert_eq!(ScoreBand::from_score(0), ScoreBand::AtRisk);
}
