/// Screen geometry for the menu view
/// This module contains pure functions that can be tested without hardware
use crate::menu::{MealCategory, MenuOfDay};
use crate::touch::TouchEvent;

pub const SCREEN_WIDTH: i32 = 320;
pub const SCREEN_HEIGHT: i32 = 240;

/// Glyph cell of the mono font used for every string on screen.
pub const CHAR_WIDTH: i32 = 8;
pub const CHAR_HEIGHT: i32 = 13;
pub const LINE_HEIGHT: i32 = 15;

pub const TITLE_Y: i32 = 10;
pub const CLOCK_RIGHT_MARGIN: i32 = 5;
pub const ROWS_TOP: i32 = 40;
pub const ROW_GUTTER: i32 = 20;
pub const LABEL_X: i32 = 5;
pub const MEAL_X: i32 = 110;
pub const MEAL_GAP: i32 = 8;
pub const BUTTON_X: i32 = 250;
pub const BUTTON_WIDTH: i32 = 60;
pub const BUTTON_HEIGHT: i32 = 25;
pub const BUTTON_LABEL: &str = "Change";
/// Offset from a row's top to its first text line, centring one line on the button.
pub const ROW_TEXT_INSET: i32 = (BUTTON_HEIGHT - CHAR_HEIGHT) / 2;
pub const MAX_MEAL_LINES: usize = 2;

/// Bottom strip used for transient messages.
pub const MESSAGE_HEIGHT: i32 = 20;
pub const MESSAGE_Y: i32 = SCREEN_HEIGHT - MESSAGE_HEIGHT;

/// Rectangle structure for display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Characters that fit in `width` pixels.
pub fn chars_for_width(width: i32) -> usize {
    (width / CHAR_WIDTH).max(1) as usize
}

/// Pixel width of `text` in the screen font.
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * CHAR_WIDTH
}

/// Greedy word wrap. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if word.is_empty() {
            continue;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Keep at most `max_lines`, marking the cut with "..." on the last line.
pub fn clip_lines(mut lines: Vec<String>, max_lines: usize, max_chars: usize) -> Vec<String> {
    if lines.len() <= max_lines || max_lines == 0 {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let keep = max_chars.saturating_sub(3);
        let clipped: String = last.chars().take(keep).collect();
        *last = format!("{}...", clipped.trim_end());
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    pub category: MealCategory,
    pub top: i32,
    pub height: i32,
    pub meal_lines: Vec<String>,
    pub button: Rect,
}

impl RowLayout {
    /// Top of the first text line (label, meal name and button caption).
    pub fn text_y(&self) -> i32 {
        self.top + ROW_TEXT_INSET
    }
}

/// Height of a row whose meal name wraps to `lines` lines: from the row top
/// to the bottom of the last glyph, never shorter than the button.
pub fn row_height(lines: usize) -> i32 {
    let lines = lines.max(1) as i32;
    (ROW_TEXT_INSET + (lines - 1) * LINE_HEIGHT + CHAR_HEIGHT).max(BUTTON_HEIGHT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLayout {
    pub rows: Vec<RowLayout>,
}

impl MenuLayout {
    /// Stack the three rows top to bottom. Each row is as tall as its drawn
    /// meal name (at least a button tall), followed by the gutter.
    pub fn compute(menu: &MenuOfDay) -> Self {
        let meal_chars = chars_for_width(BUTTON_X - MEAL_GAP - MEAL_X);
        let mut top = ROWS_TOP;
        let mut rows = Vec::with_capacity(MealCategory::ALL.len());

        for category in MealCategory::ALL {
            let lines = clip_lines(
                wrap_text(menu.meal(category), meal_chars),
                MAX_MEAL_LINES,
                meal_chars,
            );
            let height = row_height(lines.len());

            rows.push(RowLayout {
                category,
                top,
                height,
                meal_lines: lines,
                button: Rect::new(BUTTON_X, top, BUTTON_WIDTH, BUTTON_HEIGHT),
            });
            top += height + ROW_GUTTER;
        }

        Self { rows }
    }

    /// Category whose "Change" control contains the touch, if any.
    pub fn hit_test(&self, event: TouchEvent) -> Option<MealCategory> {
        self.rows
            .iter()
            .find(|row| row.button.contains(event.x, event.y))
            .map(|row| row.category)
    }

    pub fn row(&self, category: MealCategory) -> Option<&RowLayout> {
        self.rows.iter().find(|row| row.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn menu(breakfast: &str, lunch: &str, dinner: &str) -> MenuOfDay {
        MenuOfDay {
            date: "2024-06-01".to_string(),
            breakfast: breakfast.to_string(),
            lunch: lunch.to_string(),
            dinner: dinner.to_string(),
        }
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(250, 40, 60, 25);
        assert!(r.contains(250, 40));
        assert!(r.contains(309, 64));
        assert!(!r.contains(310, 50));
        assert!(!r.contains(260, 65));
        assert_eq!(r.bottom(), 65);
    }

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Oatmeal", 16), vec!["Oatmeal"]);
        assert_eq!(wrap_text("", 16), vec![""]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("Grilled chicken with rice", 16),
            vec!["Grilled chicken", "with rice"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij xy", 4), vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_clip_lines() {
        let lines = vec!["one two".to_string(), "three four".to_string(), "five".to_string()];
        assert_eq!(clip_lines(lines, 2, 10), vec!["one two", "three f..."]);
    }

    #[test]
    fn test_single_line_rows_are_evenly_spaced() {
        let layout = MenuLayout::compute(&menu("Oatmeal", "Salad", "N/A"));
        let tops: Vec<i32> = layout.rows.iter().map(|r| r.top).collect();
        assert_eq!(tops, vec![40, 85, 130]);
        assert!(layout.rows.iter().all(|r| r.height == BUTTON_HEIGHT));
    }

    #[test]
    fn test_wrapped_row_pushes_following_rows() {
        let layout = MenuLayout::compute(&menu("Oatmeal", "Grilled chicken with rice", "Soup"));
        let lunch = layout.row(MealCategory::Lunch).unwrap();
        assert_eq!(lunch.meal_lines.len(), 2);

        let text_bottom = lunch.text_y() + LINE_HEIGHT + CHAR_HEIGHT;
        assert_eq!(lunch.top + lunch.height, text_bottom);
        let dinner = layout.row(MealCategory::Dinner).unwrap();
        assert_eq!(dinner.top, text_bottom + ROW_GUTTER);
    }

    #[test]
    fn test_row_height() {
        assert_eq!(row_height(1), BUTTON_HEIGHT);
        assert_eq!(row_height(2), ROW_TEXT_INSET + LINE_HEIGHT + CHAR_HEIGHT);
        assert_eq!(row_height(0), BUTTON_HEIGHT);
    }

    #[test]
    fn test_hit_test() {
        let layout = MenuLayout::compute(&menu("Oatmeal", "Salad", "N/A"));
        assert_eq!(layout.hit_test(TouchEvent { x: 280, y: 50 }), Some(MealCategory::Breakfast));
        assert_eq!(layout.hit_test(TouchEvent { x: 280, y: 95 }), Some(MealCategory::Lunch));
        assert_eq!(layout.hit_test(TouchEvent { x: 280, y: 140 }), Some(MealCategory::Dinner));
        assert_eq!(layout.hit_test(TouchEvent { x: 100, y: 50 }), None);
        assert_eq!(layout.hit_test(TouchEvent { x: 280, y: 70 }), None);
    }

    #[test]
    fn test_rows_fit_above_message_strip() {
        let long = "a very long meal name that keeps going and going forever";
        let layout = MenuLayout::compute(&menu(long, long, long));
        let last = layout.rows.last().unwrap();
        assert!(last.top + last.height <= MESSAGE_Y);
    }

    proptest! {
        #[test]
        fn prop_wrapped_lines_fit(text in "[a-zA-Z ]{0,80}", width in 1usize..30) {
            for line in wrap_text(&text, width) {
                prop_assert!(line.chars().count() <= width);
            }
        }

        #[test]
        fn prop_wrap_keeps_all_letters(text in "[a-z ]{0,60}") {
            let joined: String = wrap_text(&text, 16)
                .concat()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let original: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            prop_assert_eq!(joined, original);
        }
    }
}
