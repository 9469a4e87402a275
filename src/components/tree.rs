use ratatui::style::{Color, Modifier, Style};

use crate::app::App;
use crate::fs::tree::{Node, VisibleEntry};
use crate::render::Frame;

pub const HELP_LINE: &str = "↑/↓ move  ← collapse  → expand  Enter open  Tab cd  Backspace up  \
                             [f] find  [r] refresh  [g] top  [G] bottom  [q] quit";

/// Directory tree view: header plus one row per visible entry.
pub struct TreeView<'a> {
    app: &'a App,
}

impl<'a> TreeView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    /// Append the header and the rows inside the scroll window to `frame`.
    pub fn render(&self, frame: &mut Frame, window: usize) {
        let app = self.app;
        frame.push(HELP_LINE, Style::default().fg(Color::Cyan));
        frame.push(
            &format!(
                "cwd: {} | items: {}",
                app.tree.root_path().display(),
                app.visible.len()
            ),
            Style::default().fg(Color::Blue),
        );
        match &app.notice {
            Some(notice) => frame.push(notice, Style::default().fg(Color::Yellow)),
            None => frame.push("", Style::default()),
        }

        let start = app.list.scroll.min(app.visible.len());
        let end = (start + window).min(app.visible.len());
        for (i, entry) in app.visible[start..end].iter().enumerate() {
            let node = app.tree.node(entry.id);
            let style = if start + i == app.list.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if node.is_dir {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            frame.push(&row_text(entry, node), style);
        }
    }
}

fn marker(node: &Node) -> &'static str {
    match (node.is_dir, node.is_expanded) {
        (true, true) => "[-]",
        (true, false) => "[+]",
        (false, _) => "   ",
    }
}

fn row_text(entry: &VisibleEntry, node: &Node) -> String {
    format!("{}{} {}", "  ".repeat(entry.depth), marker(node), node.name)
}
