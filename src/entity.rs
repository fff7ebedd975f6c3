//! External entity resolution
//!
//! Reads `<!ENTITY name SYSTEM "path">` declarations, loads the referenced
//! files relative to the document's directory and substitutes `&name;`
//! references with their content. Substitution is repeated so that entity
//! files referencing other entities are expanded too, up to a fixed number
//! of passes. Cycles are not detected; they simply stop expanding when the
//! pass limit is reached.

use crate::error::EntityError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+(\w+)\s+SYSTEM\s+"([^"]+)"\s*>"#).expect("valid declaration regex")
});

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(\w+);").expect("valid reference regex"));

/// XML's built-in entities, never resolved from files
const PREDEFINED_ENTITIES: [&str; 5] = ["lt", "gt", "amp", "quot", "apos"];

/// Default bound on substitution passes
pub const DEFAULT_MAX_PASSES: usize = 5;

/// What to substitute for a reference that cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Insert a visible XML comment naming the entity
    #[default]
    Marker,
    /// Remove the reference
    Blank,
}

/// Entity expansion options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityOptions {
    /// Placeholder policy for unreadable files and undeclared names
    pub unresolved: UnresolvedPolicy,
    /// Maximum number of substitution passes
    pub max_passes: usize,
}

impl Default for EntityOptions {
    fn default() -> Self {
        Self {
            unresolved: UnresolvedPolicy::Marker,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// A `<!ENTITY name SYSTEM "path">` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDeclaration {
    pub name: String,
    pub relative_path: String,
}

/// Parse all external entity declarations, in order of appearance
pub fn parse_declarations(text: &str) -> Vec<EntityDeclaration> {
    DECLARATION_RE
        .captures_iter(text)
        .map(|caps| EntityDeclaration {
            name: caps[1].to_string(),
            relative_path: caps[2].to_string(),
        })
        .collect()
}

/// A declaration together with the outcome of reading its file
#[derive(Debug)]
pub struct LoadedEntity {
    pub declaration: EntityDeclaration,
    /// Absolute (or base-relative) path the file was read from
    pub path: PathBuf,
    content: Result<String, EntityError>,
}

impl LoadedEntity {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// File content, `None` if the file could not be read
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().ok()
    }

    pub fn error(&self) -> Option<&EntityError> {
        self.content.as_ref().err()
    }
}

/// Entity contents for one extraction pass.
///
/// Built fresh for every outline request; never cached across requests
/// since both the document and the referenced files may change.
#[derive(Debug, Default)]
pub struct EntityTable {
    entries: Vec<LoadedEntity>,
    /// Name to entry index; a repeated name resolves to its last declaration
    by_name: HashMap<String, usize>,
}

impl EntityTable {
    /// Read every entity declared in `text`, relative to `base_dir`.
    ///
    /// A file that cannot be read is recorded as a failure and does not
    /// prevent the remaining entities from loading.
    pub fn load(text: &str, base_dir: &Path) -> Self {
        let mut table = Self::default();

        for declaration in parse_declarations(text) {
            let path = base_dir.join(&declaration.relative_path);
            let content = std::fs::read_to_string(&path).map_err(|source| EntityError {
                name: declaration.name.clone(),
                path: path.clone(),
                source,
            });

            match &content {
                Ok(body) => tracing::debug!(
                    entity = %declaration.name,
                    path = %path.display(),
                    bytes = body.len(),
                    "loaded entity"
                ),
                Err(err) => tracing::warn!("{}", err),
            }

            table
                .by_name
                .insert(declaration.name.clone(), table.entries.len());
            table.entries.push(LoadedEntity {
                declaration,
                path,
                content,
            });
        }

        table
    }

    /// All declarations in order of appearance, duplicates included
    pub fn entries(&self) -> &[LoadedEntity] {
        &self.entries
    }

    /// Entry used for substitution of `&name;`
    pub fn get(&self, name: &str) -> Option<&LoadedEntity> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Entities whose files could not be read
    pub fn failures(&self) -> impl Iterator<Item = &EntityError> {
        self.entries.iter().filter_map(LoadedEntity::error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute entity references in `text` until no pass changes it or
    /// `max_passes` is reached. References left after the last pass stay
    /// in the text as written.
    pub fn expand(&self, text: &str, options: &EntityOptions) -> String {
        let mut current = text.to_string();

        for pass in 0..options.max_passes {
            let next = REFERENCE_RE
                .replace_all(&current, |caps: &Captures| {
                    self.substitute(&caps[1], &caps[0], options.unresolved)
                })
                .into_owned();

            if next == current {
                tracing::debug!(passes = pass, "entity expansion reached a fixed point");
                return current;
            }
            current = next;
        }

        tracing::debug!(
            passes = options.max_passes,
            "entity expansion stopped at pass limit"
        );
        current
    }

    fn substitute(&self, name: &str, token: &str, policy: UnresolvedPolicy) -> String {
        if PREDEFINED_ENTITIES.contains(&name) {
            return token.to_string();
        }

        match self.get(name) {
            Some(entity) => match entity.content() {
                Some(content) => content.to_string(),
                None => placeholder(policy, || format!("<!-- failed to read entity {} -->", name)),
            },
            None => {
                tracing::warn!(entity = %name, "reference to undeclared entity");
                placeholder(policy, || format!("<!-- entity {} is not declared -->", name))
            }
        }
    }
}

fn placeholder(policy: UnresolvedPolicy, marker: impl FnOnce() -> String) -> String {
    match policy {
        UnresolvedPolicy::Marker => marker(),
        UnresolvedPolicy::Blank => String::new(),
    }
}

/// Load the entities declared in `text` and return the expanded text
pub fn resolve_entities(text: &str, base_dir: &Path, options: &EntityOptions) -> String {
    EntityTable::load(text, base_dir).expand(text, options)
}
