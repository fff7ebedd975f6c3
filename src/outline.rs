//! Outline assembly
//!
//! Builds the tree consumed by a tree view: sections at the root, elements
//! below them and, for script functions, case labels below those. Every
//! request loads entities and expands the document afresh; nothing is kept
//! between requests.

use crate::document::Document;
use crate::entity::{EntityOptions, EntityTable};
use crate::provider::{provider_for, SitemapProvider};
use crate::resolver::LineResolver;
use crate::section::extract_section;
use crate::types::{NodeKind, OutlineNode};

/// Everything one outline request needs, computed once per request
#[derive(Debug)]
pub struct ExtractionContext<'a> {
    document: &'a Document,
    entities: EntityTable,
    expanded: String,
    max_depth: usize,
}

impl<'a> ExtractionContext<'a> {
    /// Load the document's entities and expand its text
    pub fn new(document: &'a Document, options: &EntityOptions) -> Self {
        let entities = EntityTable::load(document.text(), document.base_dir());
        let expanded = entities.expand(document.text(), options);

        Self {
            document,
            entities,
            expanded,
            max_depth: options.max_passes,
        }
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// Document text with entity references substituted
    pub fn expanded_text(&self) -> &str {
        &self.expanded
    }

    /// Inner text of the first `tag` section of the expanded text
    pub fn section(&self, tag: &str) -> &str {
        extract_section(&self.expanded, tag)
    }

    pub fn resolver(&self) -> LineResolver<'_> {
        LineResolver::new(self.document.lines(), &self.entities).with_max_depth(self.max_depth)
    }
}

/// Build the outline for a document.
///
/// Documents of an unrecognized kind produce an empty outline.
pub fn build_outline(document: &Document, options: &EntityOptions) -> Vec<OutlineNode> {
    let Some(kind) = document.kind() else {
        tracing::debug!(path = %document.path().display(), "not an outline document");
        return Vec::new();
    };

    let ctx = ExtractionContext::new(document, options);
    assemble(provider_for(kind), &ctx)
}

/// Build section nodes using `provider`. Sections whose content is blank
/// are left out.
pub fn assemble(provider: &dyn SitemapProvider, ctx: &ExtractionContext) -> Vec<OutlineNode> {
    provider
        .sections()
        .iter()
        .filter_map(|section| {
            let content = ctx.section(section.tag);
            if content.trim().is_empty() {
                return None;
            }

            let children = provider.scan(section, content, ctx);
            tracing::debug!(
                provider = provider.name(),
                section = section.label,
                elements = children.len(),
                "scanned section"
            );

            Some(
                OutlineNode::builder(section.label, NodeKind::Section)
                    .line(provider.section_line(section, ctx))
                    .children(children)
                    .build(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::UnresolvedPolicy;
    use crate::types::ElementKind;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const SCREEN: &str = r#"<?xml version="1.0"?>
<!DOCTYPE screen [
  <!ENTITY common SYSTEM "common.xml">
]>
<screen>
  <fields>
    <field name="customer"/>
    &common;
  </fields>
  <views>
    <view id="main">
      <field name="customer"/>
    </view>
  </views>
  <commands>
    <command event="save"/>
  </commands>
  <script>
    function on$SaveExecuteCommand(cmd) {
      switch (cmd) {
        case 'save':
          if (ok) { store(); }
          break;
      }
    }
    function helper() { }
  </script>
  <response>
    <action id="refresh"/>
  </response>
</screen>"#;

    fn labels(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label()).collect()
    }

    fn screen_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("common.xml"), "<field name=\"createdBy\"/>").unwrap();
        fs::write(temp.path().join("screen.xml"), SCREEN).unwrap();
        temp
    }

    #[test]
    fn test_screen_sections() {
        let temp = screen_dir();
        let doc = Document::open(&temp.path().join("screen.xml")).unwrap();
        let outline = build_outline(&doc, &EntityOptions::default());

        assert_eq!(
            labels(&outline),
            vec!["fields", "views", "commands", "script", "response"]
        );
        assert_eq!(outline[0].line(), Some(5));
        assert!(outline.iter().all(|n| n.kind() == NodeKind::Section));
    }

    #[test]
    fn test_screen_fields_through_entity() {
        let temp = screen_dir();
        let doc = Document::open(&temp.path().join("screen.xml")).unwrap();
        let outline = build_outline(&doc, &EntityOptions::default());

        let fields = outline[0].children();
        assert_eq!(labels(fields), vec!["customer", "createdBy"]);
        assert_eq!(fields[0].line(), Some(6));
        assert_eq!(fields[1].line(), Some(7));
    }

    #[test]
    fn test_screen_views_and_script() {
        let temp = screen_dir();
        let doc = Document::open(&temp.path().join("screen.xml")).unwrap();
        let outline = build_outline(&doc, &EntityOptions::default());

        let view = &outline[1].children()[0];
        assert_eq!(view.kind(), NodeKind::Element(ElementKind::View));
        assert_eq!(view.line(), Some(10));
        assert_eq!(labels(view.children()), vec!["customer"]);

        let functions = outline[3].children();
        assert_eq!(labels(functions), vec!["on$SaveExecuteCommand", "helper"]);
        assert!(functions[0].is_entry_point());
        assert!(!functions[1].is_entry_point());
        assert_eq!(functions[0].line(), Some(18));
        assert_eq!(labels(functions[0].children()), vec!["case 'save'"]);
        assert_eq!(functions[0].children()[0].line(), Some(20));
    }

    #[test]
    fn test_outline_is_idempotent() {
        let temp = screen_dir();
        let doc = Document::open(&temp.path().join("screen.xml")).unwrap();
        let first = build_outline(&doc, &EntityOptions::default());
        let second = build_outline(&doc, &EntityOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_entity_file_degrades() {
        let temp = TempDir::new().unwrap();
        let text = "<!ENTITY ref SYSTEM \"missing.xml\">\n<screen>\n<fields>&ref;</fields>\n<commands><command event=\"go\"/></commands>\n</screen>";
        let doc = Document::new(temp.path().join("screen.xml"), text);

        let marked = build_outline(&doc, &EntityOptions::default());
        assert_eq!(labels(&marked), vec!["fields", "commands"]);
        assert!(marked[0].children().is_empty());

        let blank = EntityOptions {
            unresolved: UnresolvedPolicy::Blank,
            ..EntityOptions::default()
        };
        let blanked = build_outline(&doc, &blank);
        assert_eq!(labels(&blanked), vec!["commands"]);
    }

    #[test]
    fn test_not_applicable_document() {
        let doc = Document::new("/work/readme.md", "<fields><field name=\"a\"/></fields>");
        assert!(build_outline(&doc, &EntityOptions::default()).is_empty());
    }

    #[test]
    fn test_message_document() {
        let text = "<message>\n  <template>\n    <action id=\"notify\">\n    </action>\n    <action id=\"close\"/>\n  </template>\n</message>";
        let doc = Document::new("/work/message.xml", text);
        let outline = build_outline(&doc, &EntityOptions::default());

        assert_eq!(labels(&outline), vec!["action"]);
        assert_eq!(outline[0].line(), Some(1));
        let actions = outline[0].children();
        assert_eq!(labels(actions), vec!["notify", "close"]);
        assert_eq!(actions[0].line(), Some(2));
        assert_eq!(actions[1].line(), Some(4));
    }

    #[test]
    fn test_context_exposes_expanded_text() {
        let temp = screen_dir();
        let doc = Document::open(&temp.path().join("screen.xml")).unwrap();
        let ctx = ExtractionContext::new(&doc, &EntityOptions::default());

        assert!(ctx.expanded_text().contains("<field name=\"createdBy\"/>"));
        assert!(!ctx.expanded_text().contains("&common;"));
        assert_eq!(ctx.entities().entries().len(), 1);
        assert!(ctx.section("fields").contains("createdBy"));
    }
}
