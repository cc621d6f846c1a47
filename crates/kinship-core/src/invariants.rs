//! Structural invariant checks over a store.

use crate::store::Store;
use crate::types::IndividualId;
use std::fmt;

/// Types of invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantCheck {
    /// Every name has visible characters.
    NonBlankName,
    /// Partner links point both ways.
    PartnerSymmetry,
    /// Each parent lists the child and the child lists the parent.
    ParentChildSymmetry,
    /// Every referenced id exists.
    NoDanglingReference,
    /// Nobody is their own parent, child or partner.
    NoSelfReference,
}

/// A specific invariant violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Which rule failed.
    pub check: InvariantCheck,
    /// Record the failure was found on.
    pub individual: IndividualId,
    /// Human-readable description.
    pub details: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.check, self.individual, self.details)
    }
}

/// Every violation in the store, in store order. Empty means consistent.
pub fn check(store: &Store) -> Vec<InvariantViolation> {
    let mut found = Vec::new();
    let mut report = |check, individual: &IndividualId, details: String| {
        found.push(InvariantViolation {
            check,
            individual: individual.clone(),
            details,
        });
    };

    for individual in store.all() {
        let id = individual.id();

        if individual.name().trim().is_empty() {
            report(InvariantCheck::NonBlankName, id, "name is blank".into());
        }

        if let Some(partner_id) = individual.partner() {
            if partner_id == id {
                report(InvariantCheck::NoSelfReference, id, "partnered with itself".into());
            } else {
                match store.get(partner_id) {
                    None => report(
                        InvariantCheck::NoDanglingReference,
                        id,
                        format!("partner {partner_id} does not exist"),
                    ),
                    Some(partner) if partner.partner() != Some(id) => report(
                        InvariantCheck::PartnerSymmetry,
                        id,
                        format!("partner {partner_id} does not point back"),
                    ),
                    Some(_) => {}
                }
            }
        }

        for parent_id in individual.parents() {
            if parent_id == id {
                report(InvariantCheck::NoSelfReference, id, "listed as own parent".into());
                continue;
            }
            match store.get(parent_id) {
                None => report(
                    InvariantCheck::NoDanglingReference,
                    id,
                    format!("parent {parent_id} does not exist"),
                ),
                Some(parent) if !parent.children().contains(id) => report(
                    InvariantCheck::ParentChildSymmetry,
                    id,
                    format!("parent {parent_id} does not list it as a child"),
                ),
                Some(_) => {}
            }
        }

        for child_id in individual.children() {
            if child_id == id {
                report(InvariantCheck::NoSelfReference, id, "listed as own child".into());
                continue;
            }
            match store.get(child_id) {
                None => report(
                    InvariantCheck::NoDanglingReference,
                    id,
                    format!("child {child_id} does not exist"),
                ),
                Some(child) if !child.parents().contains(id) => report(
                    InvariantCheck::ParentChildSymmetry,
                    id,
                    format!("child {child_id} does not list it as a parent"),
                ),
                Some(_) => {}
            }
        }
    }

    found
}
