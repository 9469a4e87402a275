use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::{AppError, Result};
use crate::event::{read_key, Key};
use crate::render::CrosstermSink;

/// Row count used when the terminal cannot report its size.
pub const DEFAULT_ROWS: u16 = 24;
/// Column count used when the terminal cannot report its size.
pub const DEFAULT_COLS: u16 = 80;

/// Current terminal size as `(cols, rows)`, falling back to 80x24.
pub fn terminal_size() -> (u16, u16) {
    match terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
        _ => (DEFAULT_COLS, DEFAULT_ROWS),
    }
}

/// Terminal wrapper that owns raw mode and the alternate screen.
///
/// The normal screen and a visible cursor come back when the value is
/// dropped, whichever way the program leaves the main loop.
pub struct Tui {
    out: Stdout,
    active: bool,
}

impl Tui {
    /// Enter raw mode and the alternate screen with the cursor hidden.
    pub fn new() -> Result<Self> {
        let mut out = io::stdout();
        if !out.is_terminal() {
            return Err(AppError::Terminal("stdout is not a terminal".into()));
        }
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out, active: true })
    }

    /// Restore the terminal to its original state.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0), Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Row sink writing to this terminal.
    pub fn sink(&mut self) -> CrosstermSink<&mut Stdout> {
        CrosstermSink::new(&mut self.out)
    }

    /// Show a one-line message on the bottom row.
    pub fn notice(&mut self, text: &str) -> Result<()> {
        let (_, rows) = terminal_size();
        queue!(
            self.out,
            MoveTo(0, rows - 1),
            Clear(ClearType::CurrentLine),
            Print(text)
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Read one line of free text on the bottom row, echoed as it is typed.
    ///
    /// Input stays in raw mode, so Ctrl-C and Esc arrive as keys and cancel
    /// the prompt with `None`.
    pub fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        let _cursor = VisibleCursor::show()?;
        let mut input = LineInput::default();
        loop {
            self.draw_prompt(label, input.text())?;
            match input.feed(read_key()?) {
                PromptStep::Editing => {}
                PromptStep::Submit(line) => return Ok(Some(line)),
                PromptStep::Cancel => return Ok(None),
            }
        }
    }

    fn draw_prompt(&mut self, label: &str, text: &str) -> Result<()> {
        let (cols, rows) = terminal_size();
        let room = (cols as usize).saturating_sub(label.width());
        // Keep the tail of a long query in view.
        let skip = text.width().saturating_sub(room);
        let mut shown = 0;
        let tail: String = text
            .chars()
            .skip_while(|c| {
                let skipping = shown < skip;
                shown += c.width().unwrap_or(0);
                skipping
            })
            .collect();
        queue!(
            self.out,
            MoveTo(0, rows - 1),
            Clear(ClearType::CurrentLine),
            PrintStyledContent(label.cyan()),
            Print(tail)
        )?;
        self.out.flush()?;
        Ok(())
    }

    /// Hand the terminal to another program until the guard is dropped.
    pub fn suspend(&mut self) -> Result<Suspended<'_>> {
        leave_screen(&mut self.out, terminal::disable_raw_mode)?;
        Ok(Suspended { tui: self })
    }
}

/// Leave the alternate screen and raw mode. If raw mode cannot be left, the
/// alternate screen is entered again so the caller keeps a usable UI.
fn leave_screen<W: Write>(
    out: &mut W,
    disable_raw_mode: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)?;
    if let Err(e) = disable_raw_mode() {
        let _ = execute!(out, EnterAlternateScreen, Hide);
        return Err(e);
    }
    Ok(())
}

/// Outcome of feeding one key to a [`LineInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptStep {
    Editing,
    Submit(String),
    Cancel,
}

/// Text typed at the prompt so far.
#[derive(Debug, Default)]
pub struct LineInput {
    text: String,
}

impl LineInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn feed(&mut self, key: Key) -> PromptStep {
        match key {
            Key::Enter => PromptStep::Submit(std::mem::take(&mut self.text)),
            Key::Esc | Key::Interrupt => PromptStep::Cancel,
            Key::Backspace => {
                self.text.pop();
                PromptStep::Editing
            }
            Key::Char(c) if !c.is_control() => {
                self.text.push(c);
                PromptStep::Editing
            }
            _ => PromptStep::Editing,
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Shows the cursor for the lifetime of the guard.
struct VisibleCursor;

impl VisibleCursor {
    fn show() -> Result<Self> {
        execute!(io::stdout(), Show)?;
        Ok(Self)
    }
}

impl Drop for VisibleCursor {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Hide);
    }
}

/// The terminal as it is while an external program runs in the foreground.
/// Dropping it brings back the alternate screen, blank, with raw input.
pub struct Suspended<'a> {
    tui: &'a mut Tui,
}

impl Drop for Suspended<'_> {
    fn drop(&mut self) {
        let _ = terminal::enable_raw_mode();
        let _ = execute!(
            self.tui.out,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All)
        );
    }
}

/// Install a panic hook that restores the terminal before printing panic info.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
