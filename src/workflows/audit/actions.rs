use super::domain::Severity;

/// Remediation text for a failed item, keyed by severity. Consulted only
/// when a walkthrough is finalized, never while answers are still changing.
pub fn corrective_action(item_text: &str, section_name: &str, severity: Severity) -> String {
    match severity {
        Severity::Critical => format!(
            "Immediately address \"{item_text}\" in {section_name}. Halt affected operations \
             until corrected. Document corrective steps and re-verify within 24 hours."
        ),
        Severity::Major => format!(
            "Schedule corrective action for \"{item_text}\" in {section_name} within 48 hours. \
             Assign responsible staff and document completion."
        ),
        Severity::Minor => format!(
            "Address \"{item_text}\" in {section_name} during next scheduled maintenance or \
             shift change. Log the correction."
        ),
    }
}
