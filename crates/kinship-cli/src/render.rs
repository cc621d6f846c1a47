//! SVG rendering of the canvas: connection lines under one card per individual.

use kinship_core::{Connection, ConnectionKind, FamilyTree, Gender, Individual};
use std::fmt::Write as _;

/// Lines attach this far from a card's top-left corner.
const ANCHOR_X: f64 = 75.0;
const ANCHOR_Y: f64 = 50.0;

const CARD_WIDTH: f64 = 128.0;
const CARD_HEIGHT: f64 = 96.0;
const MARGIN: f64 = 40.0;

/// Fill and border colour of a card.
fn card_colors(gender: Gender) -> (&'static str, &'static str) {
    match gender {
        Gender::Male => ("#dbeafe", "#93c5fd"),
        Gender::Female => ("#fce7f3", "#f9a8d4"),
        Gender::Other => ("#f3e8ff", "#d8b4fe"),
    }
}

fn line_style(kind: ConnectionKind) -> &'static str {
    match kind {
        ConnectionKind::Partnership => r##"stroke="#ef4444" stroke-width="3" stroke-dasharray="5,5""##,
        ConnectionKind::ParentChild => r##"stroke="#3b82f6" stroke-width="2""##,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn canvas_size(tree: &FamilyTree) -> (f64, f64) {
    tree.all().fold((0.0_f64, 0.0_f64), |(w, h), m| {
        let p = m.position();
        (w.max(p.x + CARD_WIDTH + MARGIN), h.max(p.y + CARD_HEIGHT + MARGIN))
    })
}

fn write_line(svg: &mut String, line: &Connection) {
    let from = line.from.offset(ANCHOR_X, ANCHOR_Y);
    let to = line.to.offset(ANCHOR_X, ANCHOR_Y);
    let _ = writeln!(
        svg,
        r#"  <line data-key="{}" x1="{}" y1="{}" x2="{}" y2="{}" {}/>"#,
        escape(&line.key),
        from.x,
        from.y,
        to.x,
        to.y,
        line_style(line.kind)
    );
}

fn write_card(svg: &mut String, member: &Individual) {
    let p = member.position();
    let (fill, border) = card_colors(member.gender());
    let _ = writeln!(svg, r#"  <g data-id="{}">"#, escape(member.id().as_str()));
    let _ = writeln!(
        svg,
        r#"    <rect x="{}" y="{}" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" rx="8" fill="{fill}" stroke="{border}" stroke-width="2"/>"#,
        p.x, p.y
    );
    let initial = member.name().chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}" font-size="12" font-weight="bold">{}</text>"#,
        p.x + 8.0,
        p.y + 20.0,
        escape(&initial)
    );
    if member.partner().is_some() {
        let _ = writeln!(
            svg,
            r##"    <text x="{}" y="{}" font-size="12" fill="#ef4444">&#9829;</text>"##,
            p.x + 24.0,
            p.y + 20.0
        );
    }
    let _ = writeln!(
        svg,
        r#"    <text x="{}" y="{}" font-size="12" font-weight="600">{}</text>"#,
        p.x + 8.0,
        p.y + 44.0,
        escape(member.name())
    );
    if !member.description().is_empty() {
        let _ = writeln!(
            svg,
            r##"    <text x="{}" y="{}" font-size="11" fill="#4b5563">{}</text>"##,
            p.x + 8.0,
            p.y + 62.0,
            escape(member.description())
        );
    }
    svg.push_str("  </g>\n");
}

/// The whole canvas as a standalone SVG document.
pub(crate) fn to_svg(tree: &FamilyTree) -> String {
    let (width, height) = canvas_size(tree);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for line in &tree.edges() {
        write_line(&mut svg, line);
    }
    for member in tree.all() {
        write_card(&mut svg, member);
    }
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_core::{IndividualDraft, Position};
    use kinship_test_utils::{alice_bob_carol, seeded_tree};

    #[test]
    fn lines_are_offset_to_card_centres() {
        let (mut tree, family) = alice_bob_carol();
        tree.set_position(&family.alice, Position::new(0.0, 0.0)).unwrap();
        tree.set_position(&family.carol, Position::new(100.0, 200.0)).unwrap();

        let svg = to_svg(&tree);
        let key = format!("{}-{}", family.alice, family.carol);
        let line = svg.lines().find(|l| l.contains(&format!("data-key=\"{key}\""))).unwrap();
        assert!(line.contains(r#"x1="75" y1="50" x2="175" y2="250""#), "{line}");
        assert!(line.contains("#3b82f6"));
    }

    #[test]
    fn partnership_is_dashed_red() {
        let (tree, _) = alice_bob_carol();
        let svg = to_svg(&tree);
        let dashed: Vec<_> = svg.lines().filter(|l| l.contains("stroke-dasharray")).collect();
        assert_eq!(dashed.len(), 1);
        assert!(dashed[0].contains("#ef4444"));
        assert!(dashed[0].contains(r#"stroke-width="3""#));
    }

    #[test]
    fn names_are_escaped() {
        let mut tree = seeded_tree();
        tree.add(IndividualDraft::named("Tom & <Jerry>")).unwrap();
        let svg = to_svg(&tree);
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(!svg.contains("<Jerry>"));
    }

    #[test]
    fn empty_tree_is_valid_svg() {
        let svg = to_svg(&seeded_tree());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
