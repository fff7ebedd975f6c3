//! Types for outline nodes

use serde::Serialize;

/// Element kinds produced by section scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// `<field name="X">`
    Field,
    /// `<view id="X">` (container of fields)
    View,
    /// `<command event="X">`
    Command,
    /// `<action id="X">`
    Action,
    /// `function X(...) { ... }` inside a script section
    Function,
}

impl ElementKind {
    /// Get display name for the element kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ElementKind::Field => "Field",
            ElementKind::View => "View",
            ElementKind::Command => "Command",
            ElementKind::Action => "Action",
            ElementKind::Function => "Function",
        }
    }
}

/// Kind of an outline node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A named top-level region such as `fields` or `script`
    Section,
    /// An element extracted from a section
    Element(ElementKind),
    /// A `case 'x':` label inside a script function
    CaseLabel,
}

impl NodeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Section => "Section",
            NodeKind::Element(kind) => kind.display_name(),
            NodeKind::CaseLabel => "Case",
        }
    }
}

impl From<ElementKind> for NodeKind {
    fn from(kind: ElementKind) -> Self {
        NodeKind::Element(kind)
    }
}

/// One row of the navigable outline.
///
/// Nodes are immutable once built; use [`OutlineNode::builder`] to
/// accumulate children before finalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    label: String,
    kind: NodeKind,
    /// Zero-based navigation target in the main document
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    entry_point: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Start building a node
    pub fn builder(label: impl Into<String>, kind: impl Into<NodeKind>) -> OutlineNodeBuilder {
        OutlineNodeBuilder {
            label: label.into(),
            kind: kind.into(),
            line: None,
            entry_point: false,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Navigation target, `None` when the defining line could not be located
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Whether this is a script function following the command-dispatch naming convention
    pub fn is_entry_point(&self) -> bool {
        self.entry_point
    }

    pub fn children(&self) -> &[OutlineNode] {
        &self.children
    }

    /// Sections and nodes with children can be expanded in a tree view
    pub fn is_collapsible(&self) -> bool {
        self.kind == NodeKind::Section || !self.children.is_empty()
    }

    /// Format for text output (line numbers shown 1-based)
    pub fn format_text(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let line_str = self
            .line
            .map(|l| format!("[{}]", l + 1))
            .unwrap_or_else(|| "[?]".to_string());
        let marker = if self.entry_point { " *" } else { "" };

        let mut result = format!(
            "{}{}: {}{} {}\n",
            prefix,
            self.kind.display_name(),
            self.label,
            marker,
            line_str
        );

        for child in &self.children {
            result.push_str(&child.format_text(indent + 1));
        }

        result
    }

    /// Flatten node tree to list (pre-order)
    pub fn flatten(&self) -> Vec<&OutlineNode> {
        let mut result = vec![self];
        for child in &self.children {
            result.extend(child.flatten());
        }
        result
    }
}

/// Accumulates the parts of an [`OutlineNode`]
#[derive(Debug, Clone)]
pub struct OutlineNodeBuilder {
    label: String,
    kind: NodeKind,
    line: Option<usize>,
    entry_point: bool,
    children: Vec<OutlineNode>,
}

impl OutlineNodeBuilder {
    pub fn line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    pub fn entry_point(mut self, entry_point: bool) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn child(mut self, child: OutlineNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = OutlineNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> OutlineNode {
        OutlineNode {
            label: self.label,
            kind: self.kind,
            line: self.line,
            entry_point: self.entry_point,
            children: self.children,
        }
    }
}

/// Flatten all nodes to a list
pub fn flatten_nodes(nodes: &[OutlineNode]) -> Vec<&OutlineNode> {
    let mut result = Vec::new();
    for node in nodes {
        result.extend(node.flatten());
    }
    result
}

/// Filter nodes by a case-insensitive label query, at every depth
pub fn filter_nodes<'a>(nodes: &'a [OutlineNode], query: &str) -> Vec<&'a OutlineNode> {
    let query_lower = query.to_lowercase();
    flatten_nodes(nodes)
        .into_iter()
        .filter(|node| node.label.to_lowercase().contains(&query_lower))
        .collect()
}
