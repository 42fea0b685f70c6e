//! Pass 1: pin critical content.
//!
//! Critical elements pass through untouched. An element that reaches the
//! optimizer without a tier is treated as critical so nothing unclassified
//! can be lost.

use sn_core::{Document, Section, Tier};
use tracing::warn;

/// Returns the document and the number of untiered elements promoted to critical.
pub fn apply(mut doc: Document) -> (Document, usize) {
    let mut promoted = 0;
    for section in &mut doc.sections {
        pin(section, &mut promoted);
    }
    if promoted > 0 {
        warn!(promoted, "unclassified elements reached the optimizer; kept as critical");
    }
    (doc, promoted)
}

fn pin(section: &mut Section, promoted: &mut usize) {
    for element in &mut section.elements {
        if element.tier.is_none() {
            element.tier = Some(Tier::Critical);
            *promoted += 1;
        }
    }
    for child in &mut section.children {
        pin(child, promoted);
    }
}
