//! Typed, namespace-qualified view over WordprocessingML body markup.
//!
//! Lookups only match elements in [`WORDML_NS`]; an element with the right
//! local name in another namespace is treated as absent.

use roxmltree::{Document, Node};

/// Main WordprocessingML namespace.
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Elements of the body markup the extractor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordElement {
    Run,
    RunProperties,
    Highlight,
    Text,
}

impl WordElement {
    pub fn local_name(self) -> &'static str {
        match self {
            WordElement::Run => "r",
            WordElement::RunProperties => "rPr",
            WordElement::Highlight => "highlight",
            WordElement::Text => "t",
        }
    }

    fn matches(self, node: &Node<'_, '_>) -> bool {
        node.is_element() && node.has_tag_name((WORDML_NS, self.local_name()))
    }
}

/// First direct child of `node` that is `element`.
pub fn lookup<'a, 'input>(node: Node<'a, 'input>, element: WordElement) -> Option<Node<'a, 'input>> {
    node.children().find(|child| element.matches(child))
}

/// Parsed body part. Borrows the XML it was parsed from.
pub struct MarkupTree<'input> {
    doc: Document<'input>,
}

impl<'input> MarkupTree<'input> {
    pub fn parse(xml: &'input str) -> Result<Self, roxmltree::Error> {
        Ok(Self {
            doc: Document::parse(xml)?,
        })
    }

    /// Every run in document order, at any depth.
    pub fn runs(&self) -> impl Iterator<Item = Run<'_, 'input>> + '_ {
        self.doc
            .root()
            .descendants()
            .filter(|node| WordElement::Run.matches(node))
            .map(|node| Run { node })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Run<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> Run<'a, 'input> {
    pub fn properties(&self) -> Option<RunProperties<'a, 'input>> {
        lookup(self.node, WordElement::RunProperties).map(|node| RunProperties { node })
    }

    /// Content of the run's first text child, untrimmed.
    pub fn text(&self) -> Option<&'a str> {
        lookup(self.node, WordElement::Text).and_then(|node| node.text())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunProperties<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> RunProperties<'a, 'input> {
    /// Value of `w:highlight/@w:val`.
    pub fn highlight(&self) -> Option<&'a str> {
        lookup(self.node, WordElement::Highlight)
            .and_then(|node| node.attribute((WORDML_NS, "val")))
    }
}
