// src/core/html.rs
// Markup helpers over a parsed document tree.
//
// The tree is flattened into document order once. Stepping `n` places forward
// in that order is the same walk as following "next element" links: into the
// first child when there is one, otherwise on to whatever follows.

use scraper::{ElementRef, Html, Node};

/// One node of the document in pre-order.
#[derive(Clone, Copy)]
pub enum Flat<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
    Other,
}

impl<'a> Flat<'a> {
    /// Visible text: the string itself, or every text node under the element.
    pub fn text(&self) -> String {
        match self {
            Flat::Text(t) => t.to_string(),
            Flat::Element(e) => e.text().collect(),
            Flat::Other => s!(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        match self {
            Flat::Element(e) => e.value().classes().any(|c| c == class),
            _ => false,
        }
    }
}

/// Parsed page plus its nodes in document order.
pub struct Markup {
    html: Html,
}

impl Markup {
    pub fn parse(doc: &str) -> Self {
        Self { html: Html::parse_document(doc) }
    }

    pub fn flatten(&self) -> Vec<Flat<'_>> {
        self.html
            .tree
            .root()
            .descendants()
            .map(|node| match node.value() {
                Node::Text(t) => Flat::Text(&**t),
                Node::Element(_) => ElementRef::wrap(node).map_or(Flat::Other, Flat::Element),
                _ => Flat::Other,
            })
            .collect()
    }
}

/// Index of the first text node exactly equal to `text`.
/// Duplicates are legal markup; the first in document order wins.
pub fn find_text(nodes: &[Flat<'_>], text: &str) -> Option<usize> {
    nodes.iter().position(|n| matches!(n, Flat::Text(t) if *t == text))
}

/// Index of the first element carrying `class`.
pub fn find_class(nodes: &[Flat<'_>], class: &str) -> Option<usize> {
    nodes.iter().position(|n| n.has_class(class))
}

/// Text of the node `hops` places after `from` in document order.
pub fn text_after(nodes: &[Flat<'_>], from: usize, hops: usize) -> Option<String> {
    nodes.get(from.checked_add(hops)?).map(Flat::text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><body><div><span>DATE:</span>\n<span>01/02/2024</span></div>\
        <div class=\"grandtotalline\"><b>GRAND TOTAL</b> $ 10.00</div></body></html>";

    #[test]
    fn steps_follow_document_order() {
        let m = Markup::parse(PAGE);
        let nodes = m.flatten();
        let at = find_text(&nodes, "DATE:").unwrap();
        // "DATE:" → "\n" → <span> holding the value
        assert_eq!(text_after(&nodes, at, 1).as_deref(), Some("\n"));
        assert_eq!(text_after(&nodes, at, 2).as_deref(), Some("01/02/2024"));
    }

    #[test]
    fn class_lookup_and_first_child() {
        let m = Markup::parse(PAGE);
        let nodes = m.flatten();
        let at = find_class(&nodes, "grandtotalline").unwrap();
        assert_eq!(text_after(&nodes, at, 1).as_deref(), Some("GRAND TOTAL"));
        assert_eq!(nodes[at].text(), "GRAND TOTAL $ 10.00");
    }

    #[test]
    fn text_match_is_exact() {
        let m = Markup::parse(PAGE);
        let nodes = m.flatten();
        assert!(find_text(&nodes, "DATE").is_none());
        assert!(find_text(&nodes, "date:").is_none());
        assert!(text_after(&nodes, nodes.len() - 1, 1).is_none());
    }
}
