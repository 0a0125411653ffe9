//! Category trie nodes.
//!
//! The outline is stored as a trie whose upper levels are class letters and
//! whose lower levels are numeric spans:
//!
//! ```text
//!              Q
//!             /
//!            QH
//!          /    \
//!      1-278.5  301-705.5
//!     /      \
//!  1-199.5 201-278.5
//! ```
//!
//! Letter steps behave like an ordinary trie. Range steps do not consume the
//! query: the whole span is carried down and compared for containment at each
//! level, so `QH360` lands in `QH359-425` even though no outline entry spells
//! it out.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::label::{letter_prefix, CategoryLabel, Step};
use super::range::Range;
use crate::error::{LabelError, LabelResult};

/// What to return when a containing range child is found but nothing below it
/// resolves the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Degrade to the matched child (the coarsest enclosing node).
    #[default]
    Enclosing,
    /// Report a miss.
    Strict,
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enclosing => f.write_str("enclosing"),
            Self::Strict => f.write_str("strict"),
        }
    }
}

/// How a child is reached from its parent.
#[derive(Debug, Clone, Copy)]
pub enum ChildKey {
    Letter(char),
    Numeric(Range),
}

impl ChildKey {
    /// Sibling order: letters first (alphabetical), then spans by `(min, max)`.
    pub fn structural_cmp(&self, other: &ChildKey) -> Ordering {
        match (self, other) {
            (Self::Letter(a), Self::Letter(b)) => a.cmp(b),
            (Self::Letter(_), Self::Numeric(_)) => Ordering::Less,
            (Self::Numeric(_), Self::Letter(_)) => Ordering::Greater,
            (Self::Numeric(a), Self::Numeric(b)) => a.structural_cmp(b),
        }
    }

    pub fn range(&self) -> Option<Range> {
        match self {
            Self::Numeric(range) => Some(*range),
            Self::Letter(_) => None,
        }
    }

    fn is_letter(&self, c: char) -> bool {
        matches!(self, Self::Letter(k) if *k == c)
    }
}

#[derive(Debug)]
pub(super) struct Child {
    pub(super) key: ChildKey,
    pub(super) node: CategoryNode,
}

/// A node in the category trie.
///
/// A node exclusively owns its children and its volume ids. Structure is only
/// created while the outline is built; ids are attached afterwards.
#[derive(Debug, Default)]
pub struct CategoryNode {
    label: Option<String>,
    /// Leading uppercase run of the label. `None` only for the root.
    prefix: Option<String>,
    range: Option<Range>,
    pub(super) children: Vec<Child>,
    pub(super) ids: Vec<String>,
}

impl CategoryNode {
    /// An unlabelled root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a detached node for a full category label such as `QH1-278.5`.
    pub fn new(label: &str) -> LabelResult<Self> {
        let prefix = letter_prefix(label);
        let suffix = &label[prefix.len()..];
        let range = if suffix.is_empty() {
            None
        } else {
            Some(Range::parse(suffix).ok_or_else(|| LabelError::RangeParse {
                text: suffix.to_string(),
            })?)
        };
        Ok(Self {
            label: Some(label.to_string()),
            prefix: Some(prefix.to_string()),
            range,
            children: Vec::new(),
            ids: Vec::new(),
        })
    }

    /// The full category string, `None` for the root.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The accumulated letter prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The span this node declares, if its label has a numeric part.
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> impl Iterator<Item = &CategoryNode> {
        self.children.iter().map(|c| &c.node)
    }

    /// Ids attached directly to this node (not to descendants).
    pub fn own_ids(&self) -> &[String] {
        &self.ids
    }

    /// Total number of ids in this subtree. Recomputed on every call.
    pub fn id_count(&self) -> usize {
        self.ids.len() + self.children.iter().map(|c| c.node.id_count()).sum::<usize>()
    }

    /// Attach a volume id. Duplicates are kept.
    pub fn attach_id(&mut self, volume_id: impl Into<String>) {
        self.ids.push(volume_id.into());
    }

    /// Create a child for `raw`, keyed by the step `raw` takes below this node.
    pub fn add_child(&mut self, raw: &str) -> LabelResult<&mut CategoryNode> {
        let label = CategoryLabel::parse(raw, self.prefix())?;
        let key = match label.step {
            Step::Letter(c) => ChildKey::Letter(c),
            Step::Range(range) => ChildKey::Numeric(range),
        };
        let pos = self.push_child(key, CategoryNode::new(raw)?);
        Ok(&mut self.children[pos].node)
    }

    fn push_child(&mut self, key: ChildKey, node: CategoryNode) -> usize {
        let pos = self
            .children
            .partition_point(|c| c.key.structural_cmp(&key) != Ordering::Greater);
        self.children.insert(pos, Child { key, node });
        pos
    }

    /// Place an outline entry below this node, creating intermediate letter
    /// nodes as needed.
    ///
    /// A span is placed under the sibling span that strictly encloses it.
    /// Sibling spans that the new span strictly encloses are moved under it,
    /// so the outline does not have to list parents before children.
    /// Re-inserting an existing span returns the existing node.
    pub fn insert(&mut self, raw: &str) -> LabelResult<&mut CategoryNode> {
        let label = CategoryLabel::parse(raw, self.prefix())?;
        match label.step {
            Step::Letter(c) => {
                let mut accumulated = self.prefix().unwrap_or_default().to_string();
                accumulated.push(c);

                let existing = self.children.iter().position(|child| {
                    child.key.is_letter(c) && child.node.label() == Some(accumulated.as_str())
                });
                let pos = match existing {
                    Some(pos) => pos,
                    None => {
                        let node = CategoryNode::new(&accumulated)?;
                        self.push_child(ChildKey::Letter(c), node)
                    }
                };

                if accumulated == raw {
                    Ok(&mut self.children[pos].node)
                } else {
                    self.children[pos].node.insert(raw)
                }
            }
            Step::Range(range) => {
                let enclosing = self.children.iter().position(|child| {
                    child
                        .key
                        .range()
                        .is_some_and(|r| range.within(&r) && !range.same_bounds(&r))
                });
                if let Some(pos) = enclosing {
                    return self.children[pos].node.insert(raw);
                }

                let same = self.children.iter().position(|child| {
                    child.key.range().is_some_and(|r| r.same_bounds(&range))
                });
                if let Some(pos) = same {
                    return Ok(&mut self.children[pos].node);
                }

                let mut node = CategoryNode::new(raw)?;
                let (enclosed, kept): (Vec<Child>, Vec<Child>) = std::mem::take(&mut self.children)
                    .into_iter()
                    .partition(|child| child.key.range().is_some_and(|r| r.within(&range)));
                self.children = kept;
                for child in enclosed {
                    node.push_child(child.key, child.node);
                }

                let pos = self.push_child(ChildKey::Numeric(range), node);
                Ok(&mut self.children[pos].node)
            }
        }
    }

    /// Resolve `query` to the most specific node, degrading to the enclosing
    /// node when nothing finer matches.
    pub fn find(&self, query: &str) -> Option<&CategoryNode> {
        self.find_with(query, FallbackPolicy::default())
    }

    pub fn find_with(&self, query: &str, policy: FallbackPolicy) -> Option<&CategoryNode> {
        let mut path = Vec::new();
        if self.locate(query, policy, &mut path) {
            self.node_at(&path)
        } else {
            None
        }
    }

    pub fn find_mut(&mut self, query: &str, policy: FallbackPolicy) -> Option<&mut CategoryNode> {
        let mut path = Vec::new();
        if self.locate(query, policy, &mut path) {
            self.node_at_mut(&path)
        } else {
            None
        }
    }

    fn node_at(&self, path: &[usize]) -> Option<&CategoryNode> {
        path.iter()
            .try_fold(self, |node, &pos| node.children.get(pos).map(|c| &c.node))
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut CategoryNode> {
        let mut node = self;
        for &pos in path {
            node = &mut node.children.get_mut(pos)?.node;
        }
        Some(node)
    }

    /// Push the child positions leading to the match for `query` onto `path`.
    ///
    /// On `false` the path is left as it was found.
    fn locate(&self, query: &str, policy: FallbackPolicy, path: &mut Vec<usize>) -> bool {
        let label = match CategoryLabel::parse(query, self.prefix()) {
            Ok(label) => label,
            Err(e) => {
                tracing::debug!(query, node = %self, error = %e, "category step does not resolve");
                return false;
            }
        };

        match label.step {
            Step::Letter(c) => {
                // The same letter can key several children; try each in turn.
                for (pos, child) in self.children.iter().enumerate() {
                    if !child.key.is_letter(c) {
                        continue;
                    }
                    if child.node.label() == Some(query) {
                        path.push(pos);
                        return true;
                    }
                    if child.node.prefix().is_some_and(|p| query.starts_with(p)) {
                        path.push(pos);
                        if child.node.locate(query, policy, path) {
                            return true;
                        }
                        path.pop();
                    }
                }
                false
            }
            Step::Range(range) => {
                if let Some(pos) = self.range_child(&range) {
                    let child = &self.children[pos].node;
                    path.push(pos);
                    if child.children.is_empty() || child.label() == Some(query) {
                        return true;
                    }
                    if child.locate(query, policy, path) {
                        return true;
                    }
                    return match policy {
                        FallbackPolicy::Enclosing => true,
                        FallbackPolicy::Strict => {
                            path.pop();
                            false
                        }
                    };
                }
                self.range.is_some_and(|own| own.containment_eq(&range))
            }
        }
    }

    /// The range child containment-equal to `query`. Children that contain
    /// the query win over children the query contains; otherwise sibling
    /// order decides.
    fn range_child(&self, query: &Range) -> Option<usize> {
        let spans = || {
            self.children
                .iter()
                .enumerate()
                .filter_map(|(pos, c)| c.key.range().map(|r| (pos, r)))
        };
        spans()
            .find(|(_, r)| query.within(r))
            .or_else(|| spans().find(|(_, r)| r.containment_cmp(query) == Ordering::Equal))
            .map(|(pos, _)| pos)
    }
}

impl std::fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label().unwrap_or("<root>"))
    }
}
