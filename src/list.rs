//! Selection and scroll state shared by the tree view and the match picker.

/// Cursor into a list of rows plus the first row shown in the window.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListState {
    pub selected: usize,
    pub scroll: usize,
}

impl ListState {
    /// Move selection down by one item.
    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the selection inside `[0, len - 1]`.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Clamp the selection and scroll the least amount needed so that
    /// `scroll <= selected < scroll + window`.
    pub fn fit(&mut self, len: usize, window: usize) {
        let window = window.max(1);
        self.clamp(len);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + window {
            self.scroll = self.selected + 1 - window;
        }
        self.scroll = self.scroll.min(len.saturating_sub(window));
    }

    /// Reset to the top of a fresh list.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_window(state: &ListState, len: usize, window: usize) {
        assert!(state.selected < len);
        assert!(state.scroll <= state.selected);
        assert!(state.selected < state.scroll + window);
    }

    #[test]
    fn select_next_clamps_at_end() {
        let mut state = ListState::default();
        for _ in 0..10 {
            state.select_next(3);
        }
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn select_previous_clamps_at_start() {
        let mut state = ListState::default();
        state.select_previous();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn empty_list_never_panics() {
        let mut state = ListState::default();
        state.select_next(0);
        state.select_previous();
        state.select_last(0);
        state.fit(0, 10);
        assert_eq!(state, ListState::default());
    }

    #[test]
    fn scrolling_down_moves_window_minimally() {
        let mut state = ListState::default();
        for _ in 0..7 {
            state.select_next(20);
            state.fit(20, 5);
            assert_in_window(&state, 20, 5);
        }
        assert_eq!(state.selected, 7);
        assert_eq!(state.scroll, 3);
    }

    #[test]
    fn scrolling_up_moves_window_minimally() {
        let mut state = ListState {
            selected: 10,
            scroll: 8,
        };
        state.select_previous();
        state.select_previous();
        state.select_previous();
        state.fit(20, 5);
        assert_eq!(state.selected, 7);
        assert_eq!(state.scroll, 7);
    }

    #[test]
    fn jump_to_last_then_first() {
        let mut state = ListState::default();
        state.select_last(50);
        state.fit(50, 10);
        assert_eq!(state.scroll, 40);
        assert_in_window(&state, 50, 10);
        state.select_first();
        state.fit(50, 10);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn shrinking_list_reclamps_selection_and_scroll() {
        let mut state = ListState {
            selected: 30,
            scroll: 25,
        };
        state.fit(12, 10);
        assert_eq!(state.selected, 11);
        assert_eq!(state.scroll, 2);
        assert_in_window(&state, 12, 10);
    }

    #[test]
    fn growing_window_pulls_scroll_back() {
        let mut state = ListState {
            selected: 9,
            scroll: 5,
        };
        state.fit(10, 20);
        assert_eq!(state.scroll, 0);
        assert_in_window(&state, 10, 20);
    }

    #[test]
    fn zero_window_treated_as_one_row() {
        let mut state = ListState {
            selected: 4,
            scroll: 0,
        };
        state.fit(10, 0);
        assert_eq!(state.scroll, 4);
    }
}
