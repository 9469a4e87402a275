use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, Result};

/// Stable handle to a node in a [`Tree`].
///
/// Handles are only valid for the tree that issued them; `refresh_root`
/// invalidates every handle except the root's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the filesystem tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_expanded: bool,
    /// `None` until the directory has been listed once.
    children: Option<Vec<NodeId>>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(path: PathBuf, parent: Option<NodeId>) -> Self {
        // `fs::metadata` follows symlinks, so a link to a directory browses
        // like the directory itself.
        let is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self {
            name,
            path,
            is_dir,
            is_expanded: false,
            children: None,
            parent,
        }
    }

    /// Children loaded so far, empty if the node was never expanded.
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Whether the directory has been listed.
    pub fn is_loaded(&self) -> bool {
        self.children.is_some()
    }
}

/// One row of the flattened tree: a node and its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleEntry {
    pub id: NodeId,
    pub depth: usize,
}

/// A lazily materialized filesystem tree.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so the
/// parent link never owns anything.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

const ROOT: NodeId = NodeId(0);

impl Tree {
    /// Open a tree rooted at `path` with the root already expanded.
    ///
    /// Fails if `path` is not a directory that can be listed.
    pub fn open(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|_| AppError::invalid_path(path))?;
        if !path.is_dir() || fs::read_dir(&path).is_err() {
            return Err(AppError::invalid_path(&path));
        }
        let mut tree = Self {
            nodes: vec![Node::new(path, None)],
        };
        tree.expand(ROOT);
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn root_path(&self) -> &Path {
        &self.nodes[ROOT.0].path
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children().first().copied()
    }

    /// Expand a directory, listing it the first time.
    ///
    /// Listing failures leave the directory expanded with no children.
    pub fn expand(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if !node.is_dir || (node.is_expanded && node.is_loaded()) {
            return;
        }
        if !node.is_loaded() {
            let children = self.load_children(id);
            self.nodes[id.0].children = Some(children);
        }
        self.nodes[id.0].is_expanded = true;
    }

    /// Collapse a directory. Loaded children are kept.
    pub fn collapse(&mut self, id: NodeId) {
        self.nodes[id.0].is_expanded = false;
    }

    pub fn toggle(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if !node.is_dir {
            return;
        }
        if node.is_expanded {
            self.collapse(id);
        } else {
            self.expand(id);
        }
    }

    /// Throw away everything below the root and list it again.
    pub fn refresh_root(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT.0];
        root.children = None;
        root.is_expanded = false;
        self.expand(ROOT);
    }

    /// List a directory and push its entries into the arena, sorted
    /// directories first and then by name.
    fn load_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let dir = self.nodes[id.0].path.clone();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "cannot list directory");
                return Vec::new();
            }
        };

        let mut children: Vec<Node> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| Node::new(entry.path(), Some(id)))
            .collect();
        sort_children(&mut children);

        let first = self.nodes.len();
        self.nodes.extend(children);
        (first..self.nodes.len()).map(NodeId).collect()
    }

    /// Pre-order walk of the tree, descending only into expanded
    /// directories. The root is the first entry at depth 0.
    pub fn flatten(&self) -> Vec<VisibleEntry> {
        let mut out = Vec::new();
        self.flatten_node(self.root(), 0, &mut out);
        out
    }

    fn flatten_node(&self, id: NodeId, depth: usize, out: &mut Vec<VisibleEntry>) {
        out.push(VisibleEntry { id, depth });
        let node = &self.nodes[id.0];
        if node.is_dir && node.is_expanded {
            for &child in node.children() {
                self.flatten_node(child, depth + 1, out);
            }
        }
    }
}

fn sort_children(children: &mut [Node]) {
    children.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
}
