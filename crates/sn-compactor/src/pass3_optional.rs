//! Pass 3: drop optional elements.

use sn_core::{Document, Section, Tier};

use crate::policy::{OptionalPolicy, RetentionPolicy};

/// Returns the document and the number of elements removed.
pub fn apply(mut doc: Document, policy: &RetentionPolicy) -> (Document, usize) {
    let mut dropped = 0;
    if policy.optional == OptionalPolicy::Drop {
        for section in &mut doc.sections {
            drop_optional(section, &mut dropped);
        }
    }
    (doc, dropped)
}

fn drop_optional(section: &mut Section, dropped: &mut usize) {
    let before = section.elements.len();
    section.elements.retain(|e| e.tier != Some(Tier::Optional));
    *dropped += before - section.elements.len();
    for child in &mut section.children {
        drop_optional(child, dropped);
    }
}
