//! Differential renderer: frames are compared row by row against the
//! previous one and only the rows that changed are written to the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Color as CColor, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};
use ratatui::{
    style::{Modifier, Style},
    text::Line,
};
use unicode_width::UnicodeWidthChar;

/// One complete screen image: a line per terminal row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub rows: Vec<Line<'static>>,
}

impl Frame {
    /// Start an empty frame for a terminal of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: Vec::with_capacity(height as usize),
        }
    }

    /// Append a row, clipped to the frame width, with control characters
    /// shown as spaces. Rows past the terminal height are dropped.
    pub fn push(&mut self, text: &str, style: Style) {
        if self.rows.len() < self.height as usize {
            let text = truncate_to_width(&printable(text), self.width as usize);
            self.rows.push(Line::styled(text, style));
        }
    }

    /// Pad with blank rows up to the terminal height.
    pub fn fill(&mut self) {
        while self.rows.len() < self.height as usize {
            self.rows.push(Line::default());
        }
    }

    /// Indices of rows that differ from `previous`. Rows that `previous`
    /// never had count as changed.
    pub fn changed_rows(&self, previous: &Frame) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, row)| previous.rows.get(*i) != Some(*row))
            .map(|(i, _)| i)
            .collect()
    }

    /// Plain text of a row, without styling.
    pub fn row_text(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .unwrap_or_default()
    }
}

/// Replace control characters, which would move the cursor or start an
/// escape sequence, with spaces.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Cut `text` so its display width does not exceed `max` columns.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let mut used = 0;
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Destination for rendered rows.
pub trait RowSink {
    /// Replace terminal row `row` (0-based) with `line`.
    fn write_row(&mut self, row: u16, line: &Line<'_>) -> io::Result<()>;

    /// Blank the whole screen.
    fn clear(&mut self) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Keeps the last drawn frame and repaints only what changed.
#[derive(Debug, Default)]
pub struct Renderer {
    previous: Frame,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame so the next draw repaints every row.
    pub fn invalidate(&mut self) {
        self.previous = Frame::default();
    }

    /// Draw `frame`, writing only changed rows. Returns the number of rows
    /// written.
    pub fn draw<S: RowSink>(&mut self, frame: Frame, sink: &mut S) -> io::Result<usize> {
        let resized = (frame.width, frame.height) != (self.previous.width, self.previous.height);
        if resized {
            self.invalidate();
            sink.clear()?;
        }

        let changed = frame.changed_rows(&self.previous);
        for &row in &changed {
            sink.write_row(row as u16, &frame.rows[row])?;
        }
        sink.flush()?;

        self.previous = frame;
        Ok(changed.len())
    }
}

/// [`RowSink`] that emits crossterm escape sequences to any writer.
pub struct CrosstermSink<W: Write> {
    out: W,
}

impl<W: Write> CrosstermSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn apply_style(&mut self, style: Style) -> io::Result<()> {
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(CColor::from(fg)))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.out, SetBackgroundColor(CColor::from(bg)))?;
        }
        let modifiers = [
            (Modifier::BOLD, Attribute::Bold),
            (Modifier::DIM, Attribute::Dim),
            (Modifier::ITALIC, Attribute::Italic),
            (Modifier::UNDERLINED, Attribute::Underlined),
            (Modifier::REVERSED, Attribute::Reverse),
        ];
        for (modifier, attribute) in modifiers {
            if style.add_modifier.contains(modifier) {
                queue!(self.out, SetAttribute(attribute))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> RowSink for CrosstermSink<W> {
    fn write_row(&mut self, row: u16, line: &Line<'_>) -> io::Result<()> {
        queue!(self.out, MoveTo(0, row))?;
        for span in &line.spans {
            self.apply_style(line.style.patch(span.style))?;
            queue!(self.out, Print(span.content.as_ref()), SetAttribute(Attribute::Reset))?;
        }
        queue!(self.out, Clear(ClearType::UntilNewLine))
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
