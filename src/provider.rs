//! Extraction strategies per document kind
//!
//! A provider knows which sections a kind of document has and how to turn a
//! section's text into outline nodes. [`provider_for`] selects one per
//! request; there is no shared registry to mutate.

use crate::document::DocumentKind;
use crate::functions::extract_functions;
use crate::locator::find_line;
use crate::outline::ExtractionContext;
use crate::scanner::{scan_elements, scan_names, scan_view_section};
use crate::section::find_section_line;
use crate::types::{ElementKind, OutlineNode};

/// A top-level section shown in the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Label of the section node
    pub label: &'static str,
    /// Tag whose content the section shows
    pub tag: &'static str,
}

impl SectionSpec {
    pub const fn new(label: &'static str, tag: &'static str) -> Self {
        Self { label, tag }
    }
}

/// Extraction strategy for one kind of document
pub trait SitemapProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &'static str;

    /// Root sections, in outline order
    fn sections(&self) -> &'static [SectionSpec];

    /// Turn the (entity-expanded) content of `section` into element nodes
    fn scan(&self, section: &SectionSpec, content: &str, ctx: &ExtractionContext) -> Vec<OutlineNode>;

    /// Navigable line of an element
    fn resolve_line(&self, name: &str, kind: ElementKind, ctx: &ExtractionContext) -> Option<usize> {
        ctx.resolver().resolve_line(name, kind)
    }

    /// Navigable line of the section node: its opening tag in the main document
    fn section_line(&self, section: &SectionSpec, ctx: &ExtractionContext) -> Option<usize> {
        find_section_line(ctx.document().lines(), section.tag)
    }
}

const SCREEN_SECTIONS: [SectionSpec; 6] = [
    SectionSpec::new("fields", "fields"),
    SectionSpec::new("views", "views"),
    SectionSpec::new("commands", "commands"),
    SectionSpec::new("script", "script"),
    SectionSpec::new("response", "response"),
    SectionSpec::new("queries", "queries"),
];

const MESSAGE_SECTIONS: [SectionSpec; 1] = [SectionSpec::new("action", "template")];

/// Screen definitions: fields, views, commands, script, response, queries
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenProvider;

impl SitemapProvider for ScreenProvider {
    fn name(&self) -> &'static str {
        "screen"
    }

    fn sections(&self) -> &'static [SectionSpec] {
        &SCREEN_SECTIONS
    }

    fn scan(&self, section: &SectionSpec, content: &str, ctx: &ExtractionContext) -> Vec<OutlineNode> {
        let resolver = ctx.resolver();

        match section.tag {
            "fields" | "queries" => scan_elements(content, ElementKind::Field, &resolver),
            "views" => scan_view_section(content, &resolver),
            "commands" => scan_elements(content, ElementKind::Command, &resolver),
            "response" => scan_elements(content, ElementKind::Action, &resolver),
            "script" => extract_functions(content, &resolver),
            _ => Vec::new(),
        }
    }
}

/// Message definitions: actions declared inside `<template>`
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageProvider;

impl SitemapProvider for MessageProvider {
    fn name(&self) -> &'static str {
        "message"
    }

    fn sections(&self) -> &'static [SectionSpec] {
        &MESSAGE_SECTIONS
    }

    fn scan(&self, _section: &SectionSpec, content: &str, ctx: &ExtractionContext) -> Vec<OutlineNode> {
        scan_names(content, ElementKind::Action)
            .into_iter()
            .map(|id| {
                OutlineNode::builder(id, ElementKind::Action)
                    .line(self.resolve_line(id, ElementKind::Action, ctx))
                    .build()
            })
            .collect()
    }

    /// Message actions are usually written `id="X"` on their own line;
    /// look for that first, then fall back to the cross-file search.
    fn resolve_line(&self, name: &str, kind: ElementKind, ctx: &ExtractionContext) -> Option<usize> {
        find_line(ctx.document().lines(), &format!("id=\"{}\"", name), None)
            .or_else(|| ctx.resolver().resolve_line(name, kind))
    }
}

static SCREEN: ScreenProvider = ScreenProvider;
static MESSAGE: MessageProvider = MessageProvider;

/// Select the strategy for a document kind
pub fn provider_for(kind: DocumentKind) -> &'static dyn SitemapProvider {
    match kind {
        DocumentKind::Screen => &SCREEN,
        DocumentKind::Message => &MESSAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_for_screen() {
        let provider = provider_for(DocumentKind::Screen);
        assert_eq!(provider.name(), "screen");
        let labels: Vec<&str> = provider.sections().iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["fields", "views", "commands", "script", "response", "queries"]
        );
    }

    #[test]
    fn test_provider_for_message() {
        let provider = provider_for(DocumentKind::Message);
        assert_eq!(provider.name(), "message");
        assert_eq!(
            provider.sections(),
            &[SectionSpec::new("action", "template")]
        );
    }
}
