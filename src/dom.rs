//! Read-only view over one fetched page's markup.
//!
//! Wraps a parsed [`scraper::Html`] and exposes the structural queries the
//! extractors consume: tag-set selection, case-insensitive attribute
//! substring matches, class-token matches, and all stripped text strings in
//! document order. Document order is load-bearing: several extractors are
//! first-match-wins over these iterators.

use scraper::{ElementRef, Html, Node, Selector};

pub struct Dom {
    doc: Html,
}

impl Dom {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    /// All matches for a CSS selector group, in document order.
    /// An unparseable selector matches nothing.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(sel) => self.doc.select(&sel).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// First match for a CSS selector group, or none.
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let sel = Selector::parse(css).ok()?;
        self.doc.select(&sel).next()
    }

    /// Every element node in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.doc.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    /// Elements whose `attr` value contains `needle`, case-insensitively.
    pub fn by_attr_contains(&self, attr: &str, needle: &str) -> Vec<ElementRef<'_>> {
        let needle = needle.to_lowercase();
        self.elements()
            .filter(|el| {
                el.value()
                    .attr(attr)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Elements with any class token containing `needle`, case-insensitively.
    /// The class attribute is treated as a whitespace-separated token list.
    pub fn by_class_token_contains(&self, needle: &str) -> Vec<ElementRef<'_>> {
        let needle = needle.to_lowercase();
        self.elements()
            .filter(|el| has_class_token_containing(*el, &needle))
            .collect()
    }

    /// All text nodes in the document, trimmed, empties dropped, document
    /// order preserved.
    pub fn stripped_strings(&self) -> Vec<String> {
        self.doc
            .tree
            .root()
            .descendants()
            .filter_map(|node| match node.value() {
                Node::Text(t) => {
                    let s = t.trim();
                    if s.is_empty() {
                        None
                    } else {
                        Some(s.to_string())
                    }
                }
                _ => None,
            })
            .collect()
    }
}

pub(crate) fn has_class_token_containing(el: ElementRef<'_>, lower_needle: &str) -> bool {
    el.value()
        .attr("class")
        .map(|c| {
            c.split_whitespace()
                .any(|tok| tok.to_lowercase().contains(lower_needle))
        })
        .unwrap_or(false)
}

/// First class token of an element, if it has any.
pub fn first_class_token<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.value().attr("class")?.split_whitespace().next()
}

/// Ordered attribute lookup with fallback: the first listed attribute that is
/// present and non-empty wins.
pub fn attr_chain<'a>(el: ElementRef<'a>, attrs: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .filter_map(|a| el.value().attr(a))
        .find(|v| !v.trim().is_empty())
}

/// Descendant elements of `el`, excluding `el` itself, document order.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Full text of `el` with whitespace collapsed to single spaces.
pub fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stripped text strings within `el`'s subtree, document order.
pub fn stripped_strings_within(el: ElementRef<'_>) -> Vec<String> {
    el.descendants()
        .filter_map(|node| match node.value() {
            Node::Text(t) => {
                let s = t.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            _ => None,
        })
        .collect()
}
