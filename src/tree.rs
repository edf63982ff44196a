//! Tree assembly: flat link rows to the two-level structure the UI renders.
//!
//! Pure functions — recomputed on every read. The result sets are tens of
//! rows at most, so there is no caching layer.

use std::collections::HashMap;

use crate::types::link::{ChildLink, Link, LinkKind, LinkNode};

/// Assembles ordered links and their per-parent ordered children into
/// [`LinkNode`]s.
///
/// A link with zero persisted children gets `children = None` — absent, not
/// an empty list — so the UI can tell "never a folder" apart from "folder,
/// currently empty". Icon-kind links ignore any children rows outright.
pub fn assemble(
    links: Vec<Link>,
    mut children_by_parent: HashMap<String, Vec<ChildLink>>,
) -> Vec<LinkNode> {
    links
        .into_iter()
        .map(|link| {
            let children = match link.kind {
                LinkKind::Icon => None,
                LinkKind::List => children_by_parent
                    .remove(&link.id)
                    .filter(|c| !c.is_empty()),
            };
            LinkNode { link, children }
        })
        .collect()
}
