//! Candidate lists for relationship pickers.
//!
//! These filters are a convenience for whoever is filling in a draft. The
//! tree itself accepts any existing id.

use kinship_core::{FamilyTree, Individual, IndividualId};

/// What the user has chosen so far while filling in a draft.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Selection<'a> {
    /// Individual being edited, `None` while adding
    pub(crate) editing: Option<&'a IndividualId>,
    pub(crate) parents: &'a [IndividualId],
    pub(crate) partner: Option<&'a IndividualId>,
}

/// Individuals offered as a partner: not the one being edited, not
/// already partnered, not already picked as a parent.
pub(crate) fn partner_candidates<'t>(tree: &'t FamilyTree, selection: &Selection<'_>) -> Vec<&'t Individual> {
    tree.all()
        .filter(|m| Some(m.id()) != selection.editing)
        .filter(|m| m.partner().is_none())
        .filter(|m| !selection.parents.contains(m.id()))
        .collect()
}

/// Individuals offered as a parent: anyone but the one being edited and
/// the chosen partner.
pub(crate) fn parent_candidates<'t>(tree: &'t FamilyTree, selection: &Selection<'_>) -> Vec<&'t Individual> {
    tree.all()
        .filter(|m| Some(m.id()) != selection.editing)
        .filter(|m| Some(m.id()) != selection.partner)
        .collect()
}
