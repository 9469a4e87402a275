use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::fs::search::Match;
use crate::fs::tree::{NodeId, Tree, VisibleEntry};
use crate::list::ListState;

/// State of the match picker opened by a content search.
#[derive(Debug, Clone)]
pub struct Picker {
    pub query: String,
    /// Directory the search ran in; match paths are shown relative to it.
    pub base: PathBuf,
    pub matches: Vec<Match>,
    pub list: ListState,
    pub preview_width: usize,
}

impl Picker {
    pub fn selected(&self) -> Option<&Match> {
        self.matches.get(self.list.selected)
    }
}

/// Application mode.
#[derive(Debug, Default, Clone)]
pub enum Mode {
    #[default]
    Browsing,
    /// Reading a search query on the bottom row.
    Prompting,
    /// The screen is handed to an external editor.
    Paused,
    Picking(Picker),
}

/// Work the main loop has to do on the application's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Ask for a query and run a content search.
    Search,
    OpenEditor { path: PathBuf, line: Option<usize> },
    /// The tree was re-rooted; the process working directory should follow.
    ChangeDir(PathBuf),
}

/// Main application state.
pub struct App {
    pub tree: Tree,
    /// Flattened tree, rebuilt after every structural change.
    pub visible: Vec<VisibleEntry>,
    pub list: ListState,
    pub mode: Mode,
    /// One-shot message shown in the header until the next key.
    pub notice: Option<String>,
    full_redraw: bool,
}

impl App {
    /// Create a new App rooted at the given directory.
    pub fn new(path: &Path) -> Result<Self> {
        let tree = Tree::open(path)?;
        let mut app = Self {
            tree,
            visible: Vec::new(),
            list: ListState::default(),
            mode: Mode::Browsing,
            notice: None,
            full_redraw: true,
        };
        app.refresh_visible();
        Ok(app)
    }

    /// Rebuild the visible rows from the tree and clamp the selection.
    pub fn refresh_visible(&mut self) {
        self.visible = self.tree.flatten();
        self.list.clamp(self.visible.len());
    }

    /// Returns `true` once after anything that invalidates the whole screen.
    pub fn take_full_redraw(&mut self) -> bool {
        std::mem::take(&mut self.full_redraw)
    }

    fn selected_id(&self) -> Option<NodeId> {
        self.visible.get(self.list.selected).map(|e| e.id)
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.visible.iter().position(|e| e.id == id)
    }

    // ── Selection ──────────────────────────────────────────────────────────

    pub fn select_next(&mut self) {
        self.list.select_next(self.visible.len());
    }

    pub fn select_previous(&mut self) {
        self.list.select_previous();
    }

    pub fn select_first(&mut self) {
        self.list.select_first();
    }

    pub fn select_last(&mut self) {
        self.list.select_last(self.visible.len());
    }

    // ── Tree operations ────────────────────────────────────────────────────

    /// Expand the selected directory, or step into its first child if it is
    /// already open.
    pub fn expand_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let node = self.tree.node(id);
        if !node.is_dir {
            return;
        }
        if !node.is_expanded {
            self.tree.expand(id);
            self.refresh_visible();
        } else if let Some(child) = self.tree.first_child(id) {
            if let Some(idx) = self.index_of(child) {
                self.list.selected = idx;
            }
        }
    }

    /// Collapse the selected directory, or jump to its parent if it is a
    /// file or already collapsed.
    pub fn collapse_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let node = self.tree.node(id);
        if node.is_dir && node.is_expanded {
            self.tree.collapse(id);
            self.refresh_visible();
        } else if let Some(idx) = self.tree.parent(id).and_then(|p| self.index_of(p)) {
            self.list.selected = idx;
        }
    }

    /// Enter on a row: directories toggle, files open in the editor.
    pub fn activate_selected(&mut self) -> Action {
        let Some(id) = self.selected_id() else {
            return Action::None;
        };
        let node = self.tree.node(id);
        if node.is_dir {
            self.tree.toggle(id);
            self.refresh_visible();
            Action::None
        } else {
            Action::OpenEditor {
                path: node.path.clone(),
                line: None,
            }
        }
    }

    /// Re-root the tree at the selected directory.
    pub fn enter_selected_dir(&mut self) -> Action {
        let Some(id) = self.selected_id() else {
            return Action::None;
        };
        let node = self.tree.node(id);
        if !node.is_dir {
            return Action::None;
        }
        let path = node.path.clone();
        self.change_root(&path)
    }

    /// Re-root the tree at the parent of the current root.
    pub fn enter_parent_dir(&mut self) -> Action {
        let Some(parent) = self.tree.root_path().parent().map(Path::to_path_buf) else {
            return Action::None;
        };
        self.change_root(&parent)
    }

    /// Replace the tree with one rooted at `path`. On failure the current
    /// tree stays as it is.
    pub fn change_root(&mut self, path: &Path) -> Action {
        match Tree::open(path) {
            Ok(tree) => {
                info!(root = %tree.root_path().display(), "changed root");
                self.tree = tree;
                self.list.reset();
                self.refresh_visible();
                self.full_redraw = true;
                Action::ChangeDir(self.tree.root_path().to_path_buf())
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot change root");
                Action::None
            }
        }
    }

    /// Drop every cached listing and read the root again.
    pub fn refresh(&mut self) {
        self.tree.refresh_root();
        self.refresh_visible();
        self.full_redraw = true;
    }

    // ── Modes ──────────────────────────────────────────────────────────────

    /// Back to browsing after a prompt or the editor, repainting everything.
    pub fn resume(&mut self) {
        self.mode = Mode::Browsing;
        self.full_redraw = true;
    }

    /// Switch to the picker, or report that nothing matched.
    pub fn show_matches(
        &mut self,
        query: String,
        base: PathBuf,
        matches: Vec<Match>,
        preview_width: usize,
    ) {
        self.full_redraw = true;
        if matches.is_empty() {
            self.notice = Some(format!("No matches for \"{query}\""));
            self.mode = Mode::Browsing;
            return;
        }
        self.mode = Mode::Picking(Picker {
            query,
            base,
            matches,
            list: ListState::default(),
            preview_width,
        });
    }

    pub fn picker_mut(&mut self) -> Option<&mut Picker> {
        match &mut self.mode {
            Mode::Picking(picker) => Some(picker),
            _ => None,
        }
    }

    /// Leave the picker, opening the selected match.
    pub fn open_picked(&mut self) -> Action {
        let action = match &self.mode {
            Mode::Picking(picker) => match picker.selected() {
                Some(m) => Action::OpenEditor {
                    path: m.path.clone(),
                    line: Some(m.line),
                },
                None => Action::None,
            },
            _ => return Action::None,
        };
        self.close_picker();
        action
    }

    /// Leave the picker without opening anything.
    pub fn close_picker(&mut self) {
        self.mode = Mode::Browsing;
        self.full_redraw = true;
    }
}
