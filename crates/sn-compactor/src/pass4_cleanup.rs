//! Pass 4: remove sections left with no elements and no children, bottom-up.

use sn_core::{Document, Section};

/// Returns the document and the number of sections removed.
pub fn apply(mut doc: Document) -> (Document, usize) {
    let mut removed = 0;
    prune(&mut doc.sections, &mut removed);
    (doc, removed)
}

fn prune(sections: &mut Vec<Section>, removed: &mut usize) {
    for section in sections.iter_mut() {
        prune(&mut section.children, removed);
    }
    let before = sections.len();
    sections.retain(|s| !s.is_empty());
    *removed += before - sections.len();
}
