use ratatui::style::{Color, Modifier, Style};

use crate::app::Picker;
use crate::fs::search::Match;
use crate::render::Frame;

pub const HELP_LINE: &str = "Enter open  q/Esc back  ↑/↓ move  g/G top/bottom";

/// Search results: one row per matching file.
pub struct MatchList<'a> {
    picker: &'a Picker,
}

impl<'a> MatchList<'a> {
    pub fn new(picker: &'a Picker) -> Self {
        Self { picker }
    }

    pub fn render(&self, frame: &mut Frame, window: usize) {
        let picker = self.picker;
        frame.push(HELP_LINE, Style::default().fg(Color::Cyan));
        frame.push(
            &format!(
                "Matches for \"{}\" ({})",
                picker.query,
                picker.matches.len()
            ),
            Style::default().fg(Color::Blue),
        );
        frame.push("", Style::default());

        let start = picker.list.scroll.min(picker.matches.len());
        let end = (start + window).min(picker.matches.len());
        for (i, m) in picker.matches[start..end].iter().enumerate() {
            let style = if start + i == picker.list.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            frame.push(&self.row_text(m), style);
        }
    }

    fn row_text(&self, m: &Match) -> String {
        let path = m.path.strip_prefix(&self.picker.base).unwrap_or(&m.path);
        let preview: String = m.preview.chars().take(self.picker.preview_width).collect();
        format!("{}:{} — {}", path.display(), m.line, preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListState;
    use std::path::PathBuf;

    fn picker(count: usize) -> Picker {
        let base = PathBuf::from("/work");
        Picker {
            query: "needle".into(),
            matches: (0..count)
                .map(|i| Match {
                    path: base.join("src").join(format!("f{i}.rs")),
                    line: i + 1,
                    preview: format!("let needle{i} = 1;"),
                })
                .collect(),
            base,
            list: ListState::default(),
            preview_width: 120,
        }
    }

    fn render(picker: &Picker, height: u16) -> Frame {
        let mut frame = Frame::new(200, height);
        MatchList::new(picker).render(&mut frame, height.saturating_sub(3) as usize);
        frame
    }

    #[test]
    fn header_and_relative_rows() {
        let picker = picker(2);
        let frame = render(&picker, 10);
        assert_eq!(frame.row_text(0), HELP_LINE);
        assert_eq!(frame.row_text(1), "Matches for \"needle\" (2)");
        assert_eq!(frame.row_text(2), "");
        assert_eq!(frame.row_text(3), "src/f0.rs:1 — let needle0 = 1;");
        assert_eq!(frame.row_text(4), "src/f1.rs:2 — let needle1 = 1;");
    }

    #[test]
    fn control_chars_become_spaces_and_preview_is_capped() {
        let mut picker = picker(1);
        picker.matches[0].preview = "a\tb\u{1b}c".repeat(3);
        picker.preview_width = 5;
        let frame = render(&picker, 5);
        assert_eq!(frame.row_text(3), "src/f0.rs:1 — a b c");
    }

    #[test]
    fn control_chars_in_paths_become_spaces() {
        let mut picker = picker(1);
        picker.matches[0].path = picker.base.join("odd\u{1b}[31m\nname.txt");
        let frame = render(&picker, 5);
        assert_eq!(frame.row_text(3), "odd [31m name.txt:1 — let needle0 = 1;");
    }

    #[test]
    fn scrolled_window_shows_selected_row() {
        let mut picker = picker(10);
        picker.list.selected = 7;
        picker.list.fit(10, 2);
        let frame = render(&picker, 5);
        assert_eq!(frame.row_text(3), "src/f6.rs:7 — let needle6 = 1;");
        assert_eq!(frame.row_text(4), "src/f7.rs:8 — let needle7 = 1;");
        let line = &frame.rows[4];
        let style = line.spans.iter().fold(line.style, |s, span| s.patch(span.style));
        assert!(style.add_modifier.contains(Modifier::REVERSED));
    }
}
