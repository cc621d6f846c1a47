//! Plain-text views for terminal output.

use kinship_core::{Connection, ConnectionKind, FamilyTree, Individual, TreeResult};
use std::fmt::Write as _;

/// One line per individual: id, name, gender and a partner marker.
pub(crate) fn list(tree: &FamilyTree) -> String {
    let mut out = String::new();
    for member in tree.all() {
        let marker = if member.partner().is_some() { " \u{2665}" } else { "" };
        let _ = writeln!(out, "{:>6}  {} ({}){marker}", member.id().as_str(), member.name(), member.gender());
    }
    if out.is_empty() {
        out.push_str("(no family members)\n");
    }
    out
}

fn joined_names(members: &[&Individual]) -> String {
    members.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
}

/// Details panel for one individual, with relatives resolved to names.
pub(crate) fn details(tree: &FamilyTree, member: &Individual) -> TreeResult<String> {
    let relatives = tree.relatives(member.id())?;
    let mut out = String::new();
    let _ = writeln!(out, "{}", member.name());
    let _ = writeln!(out, "  Id: {}", member.id());
    let _ = writeln!(out, "  Gender: {}", member.gender());
    if !member.description().is_empty() {
        let _ = writeln!(out, "  Description: {}", member.description());
    }
    if let Some(image) = member.image() {
        let _ = writeln!(out, "  Image: {image}");
    }
    if let Some(partner) = relatives.partner {
        let _ = writeln!(out, "  Partner: {}", partner.name());
    }
    if !relatives.parents.is_empty() {
        let _ = writeln!(out, "  Parents: {}", joined_names(&relatives.parents));
    }
    if !relatives.children.is_empty() {
        let _ = writeln!(out, "  Children: {}", joined_names(&relatives.children));
    }
    let p = member.position();
    let _ = writeln!(out, "  Position: ({}, {})", p.x, p.y);
    Ok(out)
}

pub(crate) fn edges(lines: &[Connection]) -> String {
    let mut out = String::new();
    for line in lines {
        let label = match line.kind {
            ConnectionKind::ParentChild => "parent-child",
            ConnectionKind::Partnership => "partnership",
        };
        let _ = writeln!(
            out,
            "{label:<12}  {:<12}  ({}, {}) -> ({}, {})",
            line.key, line.from.x, line.from.y, line.to.x, line.to.y
        );
    }
    out
}
