// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Cursor arithmetic shared by list screens and paging viewers.
//!
//! List screens wrap: the cursor is reduced modulo the list length and an
//! empty list is treated as length one. Viewers clamp: the offset stays in
//! `0..=max_scroll(body_len, window)`.

use crate::Key;

/// Row the cursor selects in a list of `len` items.
pub fn selected(index: usize, len: usize) -> usize {
    index % len.max(1)
}

/// Moves a list cursor one row for UP/DOWN, wrapping at both ends. Other
/// keys and empty lists leave it unchanged.
pub fn step_wrapping(index: usize, key: Key, len: usize) -> usize {
    if len == 0 {
        return index;
    }
    let current = index % len;
    match key {
        Key::Down => (current + 1) % len,
        Key::Up => (current + len - 1) % len,
        _ => index,
    }
}

pub fn max_scroll(body_len: usize, window: usize) -> usize {
    body_len.saturating_sub(window)
}

/// Moves a viewer offset one row for UP/DOWN without wrapping.
pub fn scroll_clamped(offset: usize, key: Key, body_len: usize, window: usize) -> usize {
    let limit = max_scroll(body_len, window);
    match key {
        Key::Down => offset.saturating_add(1).min(limit),
        Key::Up => offset.saturating_sub(1).min(limit),
        _ => offset.min(limit),
    }
}

/// First visible row of a `window`-row list that keeps `selected` on screen.
pub fn window_start(selected: usize, len: usize, window: usize) -> usize {
    if window == 0 || selected < window {
        return 0;
    }
    (selected + 1 - window).min(len.saturating_sub(window))
}

#[cfg(test)]
mod tests {
    use super::{max_scroll, scroll_clamped, selected, step_wrapping, window_start};
    use crate::Key;
    use proptest::prelude::*;

    #[test]
    fn empty_lists_never_divide_by_zero() {
        assert_eq!(selected(7, 0), 0);
        assert_eq!(step_wrapping(7, Key::Down, 0), 7);
        assert_eq!(step_wrapping(7, Key::Up, 0), 7);
    }

    #[test]
    fn up_from_first_row_wraps_to_last() {
        assert_eq!(step_wrapping(0, Key::Up, 3), 2);
        assert_eq!(step_wrapping(2, Key::Down, 3), 0);
        assert_eq!(step_wrapping(1, Key::Do, 3), 1);
    }

    #[test]
    fn scroll_stops_at_both_ends() {
        assert_eq!(max_scroll(3, 5), 0);
        assert_eq!(max_scroll(12, 5), 7);
        assert_eq!(scroll_clamped(0, Key::Up, 12, 5), 0);
        assert_eq!(scroll_clamped(7, Key::Down, 12, 5), 7);
        assert_eq!(scroll_clamped(3, Key::Down, 12, 5), 4);
        assert_eq!(scroll_clamped(9, Key::Up, 12, 5), 7);
    }

    #[test]
    fn window_follows_selection() {
        assert_eq!(window_start(0, 10, 4), 0);
        assert_eq!(window_start(3, 10, 4), 0);
        assert_eq!(window_start(4, 10, 4), 1);
        assert_eq!(window_start(9, 10, 4), 6);
        assert_eq!(window_start(2, 2, 4), 0);
    }

    proptest! {
        #[test]
        fn down_len_times_returns_to_start(start in 0usize..10_000, len in 1usize..64) {
            let mut index = start;
            for _ in 0..len {
                index = step_wrapping(index, Key::Down, len);
            }
            prop_assert_eq!(selected(index, len), selected(start, len));
        }

        #[test]
        fn up_then_down_is_identity(start in 0usize..10_000, len in 1usize..64) {
            let up = step_wrapping(start, Key::Up, len);
            prop_assert!(up < len);
            prop_assert_eq!(step_wrapping(up, Key::Down, len), selected(start, len));
        }

        #[test]
        fn scroll_offset_stays_clamped(
            body_len in 0usize..40,
            moves in proptest::collection::vec(any::<bool>(), 0..80),
        ) {
            let mut offset = 0;
            for down in moves {
                let key = if down { Key::Down } else { Key::Up };
                offset = scroll_clamped(offset, key, body_len, 5);
                prop_assert!(offset <= max_scroll(body_len, 5));
            }
        }

        #[test]
        fn window_contains_selection(len in 1usize..50, window in 1usize..8, pick in 0usize..50) {
            let selection = pick % len;
            let start = window_start(selection, len, window);
            prop_assert!(start <= selection);
            prop_assert!(selection < start + window);
        }
    }
}
