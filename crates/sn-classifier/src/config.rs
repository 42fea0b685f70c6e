//! Default keyword sets.

use crate::types::ClassifierConfig;

fn s(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Default classifier configuration.
pub fn default_classifier_config() -> ClassifierConfig {
    ClassifierConfig {
        critical_section_keywords: s(&[
            "requirements", "requirement", "acceptance criteria", "acceptance scenarios",
            "success criteria", "must", "must have", "constraints", "constraint",
        ]),
        structural_keys: s(&[
            "id", "version", "date", "status", "created", "updated", "priority",
        ]),
        optional_section_keywords: s(&[
            "background", "motivation", "acknowledgments", "acknowledgements",
            "examples", "example", "illustration", "illustrations", "rationale", "references",
        ]),
        imperative_markers: s(&[
            "must", "shall", "should", "required", "recommended", "ensure", "ensures",
            "need to", "needs to", "will", "may", "cannot", "never", "always",
        ]),
        example_markers: s(&[
            "for example", "e.g.", "example:", "for instance", "illustration:",
        ]),
    }
}

/// The default config instance.
pub static CLASSIFIER_CONFIG: std::sync::LazyLock<ClassifierConfig> =
    std::sync::LazyLock::new(default_classifier_config);
