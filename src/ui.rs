use crate::app::{App, Mode};
use crate::components::matches::MatchList;
use crate::components::tree::TreeView;
use crate::render::Frame;

/// Rows above the list: help, status, separator.
pub const HEADER_ROWS: u16 = 3;

/// Number of list rows that fit below the header; never less than one.
pub fn window_rows(height: u16) -> usize {
    height.saturating_sub(HEADER_ROWS).max(1) as usize
}

/// Build the frame for the current mode, scrolling the active list so the
/// selection stays inside the window.
pub fn render(app: &mut App, width: u16, height: u16) -> Frame {
    let mut frame = Frame::new(width, height);
    let window = window_rows(height);

    if let Mode::Picking(picker) = &mut app.mode {
        picker.list.fit(picker.matches.len(), window);
        MatchList::new(picker).render(&mut frame, window);
    } else {
        app.list.fit(app.visible.len(), window);
        TreeView::new(app).render(&mut frame, window);
    }

    frame.fill();
    frame
}
