use super::domain::{AuditItem, AuditSection, ItemStatus};

/// Canonical self-inspection checklist: an immutable, ordered template the
/// session copies from on every start. Section and item order never changes,
/// since saved drafts are restored by position.
#[derive(Debug)]
pub struct AuditChecklist {
    sections: Vec<AuditSection>,
}

impl AuditChecklist {
    pub fn standard() -> Self {
        let sections = STANDARD_SECTIONS
            .iter()
            .enumerate()
            .map(|(section_index, raw)| AuditSection {
                id: section_index,
                name: raw.name,
                citation: raw.citation,
                items: raw
                    .items
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(item_index, text)| AuditItem {
                        id: format!("s{section_index}-i{item_index}"),
                        text,
                        status: ItemStatus::Unanswered,
                    })
                    .collect(),
            })
            .collect();

        Self { sections }
    }

    pub fn sections(&self) -> &[AuditSection] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<AuditSection> {
        self.sections
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|section| section.items.len()).sum()
    }

    /// Resolve a stable item id (e.g. `s2-i4`) to its section and item
    /// position within the template.
    pub fn locate(&self, item_id: &str) -> Option<(usize, usize)> {
        self.sections.iter().enumerate().find_map(|(si, section)| {
            section
                .items
                .iter()
                .position(|item| item.id == item_id)
                .map(|ii| (si, ii))
        })
    }
}

struct RawSection {
    name: &'static str,
    citation: &'static str,
    items: &'static [&'static str],
}

const STANDARD_SECTIONS: &[RawSection] = &[
    RawSection {
        name: "Food Temperature Control",
        citation: "CalCode §113996",
        items: &[
            "Cold holding below 41°F",
            "Hot holding above 135°F",
            "Cooling from 135°F to 70°F within 2 hours",
            "Reheating to 165°F within 1 hour",
            "Time as temperature control procedures posted",
            "Thermometer calibration verified",
        ],
    },
    RawSection {
        name: "Employee Hygiene & Health",
        citation: "CalCode §113968",
        items: &[
            "Proper handwashing observed",
            "Hair restraints worn",
            "No bare hand contact with RTE food",
            "Ill employee exclusion/restriction policy",
            "Clean uniforms/aprons",
        ],
    },
    RawSection {
        name: "Food Storage & Labeling",
        citation: "CalCode §114047",
        items: &[
            "FIFO rotation followed",
            "Date marking on opened TCS foods",
            "Foods stored 6″ above floor",
            "Raw/cooked separation maintained",
            "Allergen labeling present",
            "Chemical storage separated",
        ],
    },
    RawSection {
        name: "Equipment & Utensils",
        citation: "CalCode §114130",
        items: &[
            "Food contact surfaces clean and sanitized",
            "Sanitizer concentration verified (quat/chlorine)",
            "Ice machine clean (FDA §4-602.11)",
            "Cutting boards in good repair",
            "3-compartment sink setup correct",
        ],
    },
    RawSection {
        name: "Facility Safety & Suppression",
        citation: "NFPA 96 (2024) §12.4",
        items: &[
            "Hood suppression system inspection current",
            "Fire extinguishers accessible and tagged",
            "Grease filter cleaning schedule current",
            "Ansul system last service within 6 months",
            "Emergency exit paths clear",
        ],
    },
    RawSection {
        name: "Facility & Pest Control",
        citation: "CalCode §114259",
        items: &[
            "Floors, walls, ceiling in good repair",
            "Adequate ventilation operational",
            "Pest control service current",
            "No evidence of pest activity",
            "Restrooms clean and stocked",
            "Garbage areas clean and covered",
        ],
    },
    RawSection {
        name: "Documentation & Records",
        citation: "CalCode §113725",
        items: &[
            "Health permit displayed and current",
            "Food handler certifications on file",
            "Manager food safety certification valid",
            "HACCP plan available (if applicable)",
            "Vendor service records current",
            "Food supplier licenses verified",
            "Delivery temperature logs maintained",
            "Receiving inspection procedures followed",
        ],
    },
];
