//! # xml-sitemap
//!
//! Navigable outline ("sitemap") extraction for screen-definition XML files.
//!
//! Locates named sections (fields, views, commands, script, response,
//! queries), expands `<!ENTITY name SYSTEM "path">` external entities,
//! extracts typed elements from each section and maps every element back to
//! a line of the open document, even when its text lives in an entity file.
//!
//! This is a best-effort structural scanner for one XML dialect, not a
//! general XML parser. Malformed input degrades to fewer or less-navigable
//! nodes rather than errors.
//!
//! ## Features
//!
//! - External entity expansion with nested entities (bounded passes)
//! - Fields, views (with their fields), commands, response actions
//! - Script functions with their `case 'label':` branches
//! - Entry-point highlighting for `...ExecuteCommand` / `...ResponseComplete`
//! - Cross-file line resolution through entity references
//! - Separate strategy for `message.xml` documents
//!
//! ## Example
//!
//! ```
//! use xml_sitemap::{build_outline, Document, EntityOptions};
//!
//! let doc = Document::new(
//!     "screen.xml",
//!     r#"<screen><fields><field name="customer"/></fields></screen>"#,
//! );
//! let outline = build_outline(&doc, &EntityOptions::default());
//!
//! assert_eq!(outline[0].label(), "fields");
//! assert_eq!(outline[0].children()[0].label(), "customer");
//! assert_eq!(outline[0].children()[0].line(), Some(0));
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! # Outline (text)
//! xml-sitemap screen.xml
//!
//! # JSON for a tree view
//! xml-sitemap screen.xml --format json
//!
//! # Search elements
//! xml-sitemap screen.xml --query save
//!
//! # Show the entity-expanded document
//! xml-sitemap screen.xml --expand
//! ```

pub mod config;
mod document;
mod entity;
mod error;
mod functions;
mod locator;
mod outline;
mod provider;
mod resolver;
mod scanner;
mod section;
mod types;

pub use config::SitemapConfig;
pub use document::{is_refresh_relevant, Document, DocumentKind};
pub use entity::{
    parse_declarations, resolve_entities, EntityDeclaration, EntityOptions, EntityTable,
    LoadedEntity, UnresolvedPolicy, DEFAULT_MAX_PASSES,
};
pub use error::{EntityError, SitemapError};
pub use functions::{case_labels, extract_functions, find_functions, matching_brace, ScriptFunction};
pub use locator::{find_line, find_line_from};
pub use outline::{assemble, build_outline, ExtractionContext};
pub use provider::{provider_for, MessageProvider, ScreenProvider, SectionSpec, SitemapProvider};
pub use resolver::LineResolver;
pub use scanner::{
    definition_pattern, is_entry_point, scan_elements, scan_names, scan_view_section, scan_views,
    ViewBlock, ENTRY_POINT_MARKERS,
};
pub use section::{bare_tag, extract_section, find_section_line};
pub use types::{filter_nodes, flatten_nodes, ElementKind, NodeKind, OutlineNode, OutlineNodeBuilder};
