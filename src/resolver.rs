//! Cross-file line resolution
//!
//! Maps an element name to a line of the main document. Elements defined
//! inline resolve to their own line. Elements that live in an entity file
//! resolve to the line where that entity is referenced (`&name;`), since
//! that is the only place in the open document a user can be taken to.

use crate::entity::{EntityTable, DEFAULT_MAX_PASSES};
use crate::scanner::definition_pattern;
use crate::types::ElementKind;
use regex::Regex;

/// Resolves element names to navigable lines of the main document
#[derive(Debug, Clone, Copy)]
pub struct LineResolver<'a> {
    lines: &'a [String],
    entities: &'a EntityTable,
    /// How many entity-inside-entity hops to follow back to the main document
    max_depth: usize,
}

impl<'a> LineResolver<'a> {
    pub fn new(lines: &'a [String], entities: &'a EntityTable) -> Self {
        Self {
            lines,
            entities,
            max_depth: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Main document lines
    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    /// Resolve using the fixed pattern table for `kind`
    pub fn resolve_line(&self, name: &str, kind: ElementKind) -> Option<usize> {
        self.resolve_with_template(name, kind.tag(), kind.definition_template())
    }

    /// Resolve `name` using an explicit element tag and definition template.
    ///
    /// Inline definitions always win over entity files. Entity files are
    /// tried in declaration order; unreadable ones are skipped.
    pub fn resolve_with_template(&self, name: &str, element_tag: &str, template: &str) -> Option<usize> {
        let pattern = definition_pattern(template, name)?;

        self.inline_line(&pattern, element_tag, 0)
            .or_else(|| self.entity_line(name, &pattern))
    }

    /// Line of an inline definition in the main document, ignoring entities
    pub fn resolve_inline(&self, name: &str, kind: ElementKind) -> Option<usize> {
        let pattern = definition_pattern(kind.definition_template(), name)?;
        self.inline_line(&pattern, kind.tag(), 0)
    }

    /// Resolve preferring an inline definition at or after line `start`.
    ///
    /// Used for elements nested in a container, so that a name repeated
    /// elsewhere in the document does not win over the container's own copy.
    /// Falls back to entity files, then to inline definitions before `start`.
    pub fn resolve_line_from(&self, name: &str, kind: ElementKind, start: usize) -> Option<usize> {
        let pattern = definition_pattern(kind.definition_template(), name)?;

        self.inline_line(&pattern, kind.tag(), start)
            .or_else(|| self.entity_line(name, &pattern))
            .or_else(|| self.inline_line(&pattern, kind.tag(), 0))
    }

    fn inline_line(&self, pattern: &Regex, element_tag: &str, start: usize) -> Option<usize> {
        let line = self
            .lines
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, line)| line.contains(element_tag) && pattern.is_match(line))
            .map(|(idx, _)| idx)?;

        tracing::trace!(pattern = pattern.as_str(), line, "resolved inline");
        Some(line)
    }

    fn entity_line(&self, name: &str, pattern: &Regex) -> Option<usize> {
        for entity in self.entities.entries() {
            let Some(content) = entity.content() else {
                continue;
            };
            if !pattern.is_match(content) {
                continue;
            }
            if let Some(line) = self.reference_line(entity.name(), self.max_depth) {
                tracing::trace!(name, entity = entity.name(), line, "resolved through entity");
                return Some(line);
            }
        }

        tracing::trace!(name, "line unresolved");
        None
    }

    /// Line where `&entity;` is referenced in the main document, following
    /// references made from other entity files up to `depth` hops.
    pub fn reference_line(&self, entity: &str, depth: usize) -> Option<usize> {
        let token = format!("&{};", entity);

        if let Some(line) = self.lines.iter().position(|line| line.contains(&token)) {
            return Some(line);
        }
        if depth == 0 {
            return None;
        }

        self.entities
            .entries()
            .iter()
            .filter(|outer| outer.name() != entity)
            .filter(|outer| outer.content().is_some_and(|c| c.contains(&token)))
            .find_map(|outer| self.reference_line(outer.name(), depth - 1))
    }
}
