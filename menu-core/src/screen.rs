use log::{debug, warn};

use crate::layout::{
    text_width, MenuLayout, Rect, BUTTON_LABEL, BUTTON_WIDTH, CHAR_HEIGHT, CHAR_WIDTH,
    CLOCK_RIGHT_MARGIN, LABEL_X, LINE_HEIGHT, MEAL_X, MESSAGE_HEIGHT, MESSAGE_Y, SCREEN_WIDTH,
    TITLE_Y,
};
use crate::menu::{MealCategory, MenuOfDay};
use crate::surface::{Surface, SurfaceError};
use crate::theme::colors;
use crate::touch::TouchEvent;

const STATUS_X: i32 = 5;
const STATUS_Y: i32 = 10;
const CLOCK_WIDTH: i32 = 5 * CHAR_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenMode {
    Blank,
    Status(String),
    Menu,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Dispatching(MealCategory),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub color: u16,
    /// `None` stays until replaced.
    pub expires_at: Option<u64>,
}

/// Handler bound to a meal slot's "Change" control.
pub type ChangeHandler<C, R> = fn(&mut C, MealCategory, u64) -> R;

/// Maps each meal slot to its handler. Built once with the screen.
pub struct DispatchTable<C, R> {
    entries: Vec<(MealCategory, ChangeHandler<C, R>)>,
}

impl<C, R> DispatchTable<C, R> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(mut self, category: MealCategory, handler: ChangeHandler<C, R>) -> Self {
        self.entries.retain(|(c, _)| *c != category);
        self.entries.push((category, handler));
        self
    }

    pub fn lookup(&self, category: MealCategory) -> Option<ChangeHandler<C, R>> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, handler)| *handler)
    }
}

impl<C, R> Default for DispatchTable<C, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Menu view state: what is on screen, the laid-out rows, the in-flight
/// change latch and the bottom message strip.
pub struct MenuScreen {
    mode: ScreenMode,
    layout: Option<MenuLayout>,
    dispatch: DispatchState,
    notice: Option<Notice>,
    dwell_ms: u64,
}

impl MenuScreen {
    pub fn new(dwell_ms: u64) -> Self {
        Self {
            mode: ScreenMode::Blank,
            layout: None,
            dispatch: DispatchState::Idle,
            notice: None,
            dwell_ms,
        }
    }

    pub fn mode(&self) -> &ScreenMode {
        &self.mode
    }

    pub fn layout(&self) -> Option<&MenuLayout> {
        self.layout.as_ref()
    }

    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatch
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_showing_menu(&self) -> bool {
        self.mode == ScreenMode::Menu
    }

    pub fn is_showing_error(&self) -> bool {
        matches!(self.mode, ScreenMode::Error(_))
    }

    /// Latch `Dispatching`. Returns false if a change is already in flight.
    pub fn begin_dispatch(&mut self, category: MealCategory) -> bool {
        match self.dispatch {
            DispatchState::Idle => {
                self.dispatch = DispatchState::Dispatching(category);
                true
            }
            DispatchState::Dispatching(active) => {
                warn!("Change for {} rejected, {} still in flight", category, active);
                false
            }
        }
    }

    pub fn finish_dispatch(&mut self) {
        self.dispatch = DispatchState::Idle;
    }

    pub fn hit_test(&self, event: TouchEvent) -> Option<MealCategory> {
        if !self.is_showing_menu() {
            return None;
        }
        self.layout.as_ref().and_then(|layout| layout.hit_test(event))
    }

    /// Single status line on a cleared screen (connection progress).
    pub fn show_status<S: Surface>(
        &mut self,
        surface: &mut S,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.mode = ScreenMode::Status(text.to_string());
        self.notice = None;
        surface.clear(colors::BACKGROUND)?;
        surface.draw_text(STATUS_X, STATUS_Y, text, colors::TEXT_PRIMARY)
    }

    /// Full-screen error replacing the menu.
    pub fn show_error<S: Surface>(
        &mut self,
        surface: &mut S,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.mode = ScreenMode::Error(text.to_string());
        self.notice = None;
        surface.clear(colors::BACKGROUND)?;
        surface.draw_text(STATUS_X, STATUS_Y, text, colors::MESSAGE_ERROR)?;
        surface.draw_text(
            STATUS_X,
            STATUS_Y + 2 * LINE_HEIGHT,
            "Tap to retry",
            colors::TEXT_SECONDARY,
        )
    }

    pub fn show_menu<S: Surface>(
        &mut self,
        surface: &mut S,
        menu: &MenuOfDay,
        time: Option<&str>,
    ) -> Result<(), SurfaceError> {
        let layout = MenuLayout::compute(menu);
        debug!(
            "Rendering menu for {} (row tops {:?})",
            menu.date,
            layout.rows.iter().map(|r| r.top).collect::<Vec<_>>()
        );

        surface.clear(colors::BACKGROUND)?;
        surface.draw_text_centered(
            SCREEN_WIDTH / 2,
            TITLE_Y,
            &format!("Menu for {}", menu.date),
            colors::TEXT_PRIMARY,
        )?;
        if let Some(time) = time {
            draw_time(surface, time)?;
        }

        for row in &layout.rows {
            let text_y = row.text_y();
            surface.draw_text(LABEL_X, text_y, row.category.label(), colors::TEXT_PRIMARY)?;
            for (i, line) in row.meal_lines.iter().enumerate() {
                let y = text_y + i as i32 * LINE_HEIGHT;
                surface.draw_text(MEAL_X, y, line, colors::TEXT_PRIMARY)?;
            }

            surface.fill_rect(row.button, colors::BUTTON_FILL)?;
            surface.draw_rect(row.button, colors::BUTTON_BORDER)?;
            surface.draw_text_centered(
                row.button.x + BUTTON_WIDTH / 2,
                text_y,
                BUTTON_LABEL,
                colors::TEXT_PRIMARY,
            )?;
        }

        self.mode = ScreenMode::Menu;
        self.layout = Some(layout);

        if let Some(notice) = self.notice.clone() {
            draw_notice(surface, &notice)?;
        }
        Ok(())
    }

    /// Redraw just the clock corner of the menu view.
    pub fn update_clock<S: Surface>(
        &mut self,
        surface: &mut S,
        time: &str,
    ) -> Result<(), SurfaceError> {
        if !self.is_showing_menu() {
            return Ok(());
        }
        draw_time(surface, time)
    }

    /// Message in the bottom strip. Cleared by [`Self::expire_notice`] after
    /// the dwell time unless `sticky`.
    pub fn show_notice<S: Surface>(
        &mut self,
        surface: &mut S,
        text: &str,
        color: u16,
        now_ms: u64,
        sticky: bool,
    ) -> Result<(), SurfaceError> {
        let notice = Notice {
            text: text.to_string(),
            color,
            expires_at: if sticky { None } else { Some(now_ms + self.dwell_ms) },
        };
        draw_notice(surface, &notice)?;
        self.notice = Some(notice);
        Ok(())
    }

    /// Forget the current message without touching the screen; the next
    /// full redraw leaves the strip empty.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Clear the message strip once its dwell time has passed. Returns true
    /// if something was cleared.
    pub fn expire_notice<S: Surface>(
        &mut self,
        surface: &mut S,
        now_ms: u64,
    ) -> Result<bool, SurfaceError> {
        let expired = matches!(
            &self.notice,
            Some(Notice { expires_at: Some(at), .. }) if now_ms >= *at
        );
        if !expired {
            return Ok(false);
        }
        self.notice = None;
        if self.is_showing_menu() {
            surface.fill_rect(message_strip(), colors::BACKGROUND)?;
        }
        Ok(true)
    }
}

fn message_strip() -> Rect {
    Rect::new(0, MESSAGE_Y, SCREEN_WIDTH, MESSAGE_HEIGHT)
}

fn draw_notice<S: Surface>(surface: &mut S, notice: &Notice) -> Result<(), SurfaceError> {
    surface.fill_rect(message_strip(), colors::BACKGROUND)?;
    surface.draw_text_centered(
        SCREEN_WIDTH / 2,
        MESSAGE_Y + (MESSAGE_HEIGHT - CHAR_HEIGHT) / 2,
        &notice.text,
        notice.color,
    )
}

fn draw_time<S: Surface>(surface: &mut S, time: &str) -> Result<(), SurfaceError> {
    let x = SCREEN_WIDTH - CLOCK_RIGHT_MARGIN - CLOCK_WIDTH;
    surface.fill_rect(Rect::new(x, TITLE_Y, CLOCK_WIDTH, CHAR_HEIGHT), colors::BACKGROUND)?;
    let x = SCREEN_WIDTH - CLOCK_RIGHT_MARGIN - text_width(time);
    surface.draw_text(x, TITLE_Y, time, colors::TEXT_SECONDARY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ROW_GUTTER;

    #[derive(Default)]
    struct TextLog {
        texts: Vec<(i32, i32, String)>,
        fills: Vec<Rect>,
        clears: usize,
    }

    impl Surface for TextLog {
        fn clear(&mut self, _color: u16) -> Result<(), SurfaceError> {
            self.clears += 1;
            self.texts.clear();
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect, _color: u16) -> Result<(), SurfaceError> {
            self.fills.push(rect);
            Ok(())
        }

        fn draw_rect(&mut self, _rect: Rect, _color: u16) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn draw_text(
            &mut self,
            x: i32,
            y: i32,
            text: &str,
            _color: u16,
        ) -> Result<(), SurfaceError> {
            self.texts.push((x, y, text.to_string()));
            Ok(())
        }
    }

    impl TextLog {
        fn has(&self, text: &str) -> bool {
            self.texts.iter().any(|(_, _, t)| t == text)
        }
    }

    fn menu() -> MenuOfDay {
        MenuOfDay {
            date: "2024-06-01".to_string(),
            breakfast: "Oatmeal".to_string(),
            lunch: "Salad".to_string(),
            dinner: "N/A".to_string(),
        }
    }

    #[test]
    fn test_menu_render_draws_rows() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        screen.show_menu(&mut surface, &menu(), Some("08:15")).unwrap();

        assert!(surface.has("Menu for 2024-06-01"));
        assert!(surface.has("08:15"));
        assert!(surface.has("Breakfast:"));
        assert!(surface.has("Oatmeal"));
        assert!(surface.has("Salad"));
        assert!(surface.has("N/A"));
        assert_eq!(surface.texts.iter().filter(|(_, _, t)| t == "Change").count(), 3);
        assert!(screen.is_showing_menu());
    }

    #[test]
    fn test_meal_name_shares_label_baseline() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        screen.show_menu(&mut surface, &menu(), None).unwrap();

        let find = |t: &str| surface.texts.iter().find(|(_, _, s)| s == t).cloned().unwrap();
        let (label_x, label_y, _) = find("Lunch:");
        let (meal_x, meal_y, _) = find("Salad");
        assert_eq!(label_x, LABEL_X);
        assert_eq!(meal_x, MEAL_X);
        assert_eq!(label_y, meal_y);
    }

    #[test]
    fn test_wrapped_meal_keeps_gutter_to_next_row() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        let mut wrapped = menu();
        wrapped.breakfast = "Grilled chicken with rice".to_string();
        screen.show_menu(&mut surface, &wrapped, None).unwrap();

        let last_line_y = surface
            .texts
            .iter()
            .find(|(_, _, t)| t == "with rice")
            .map(|(_, y, _)| *y)
            .unwrap();
        let lunch = screen.layout().unwrap().row(MealCategory::Lunch).unwrap();
        assert_eq!(lunch.top - (last_line_y + CHAR_HEIGHT), ROW_GUTTER);
    }

    #[test]
    fn test_hit_test_only_on_menu() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        let touch = TouchEvent { x: 280, y: 50 };
        assert_eq!(screen.mode(), &ScreenMode::Blank);
        assert_eq!(screen.hit_test(touch), None);

        screen.show_menu(&mut surface, &menu(), None).unwrap();
        assert_eq!(screen.hit_test(touch), Some(MealCategory::Breakfast));

        screen.show_error(&mut surface, "Failed to fetch menu").unwrap();
        assert_eq!(screen.hit_test(touch), None);
        assert!(screen.is_showing_error());
    }

    #[test]
    fn test_dispatch_latch_rejects_overlap() {
        let mut screen = MenuScreen::new(1500);
        assert!(screen.begin_dispatch(MealCategory::Lunch));
        assert!(!screen.begin_dispatch(MealCategory::Dinner));
        assert_eq!(screen.dispatch_state(), DispatchState::Dispatching(MealCategory::Lunch));
        screen.finish_dispatch();
        assert!(screen.begin_dispatch(MealCategory::Dinner));
    }

    #[test]
    fn test_notice_expires_after_dwell() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        screen.show_menu(&mut surface, &menu(), None).unwrap();
        screen
            .show_notice(
                &mut surface,
                "Failed to change meal",
                colors::MESSAGE_ERROR,
                10_000,
                false,
            )
            .unwrap();
        assert!(surface.has("Failed to change meal"));

        assert!(!screen.expire_notice(&mut surface, 11_000).unwrap());
        assert!(screen.notice().is_some());
        assert!(screen.expire_notice(&mut surface, 11_500).unwrap());
        assert!(screen.notice().is_none());
        assert_eq!(surface.fills.last(), Some(&message_strip()));
    }

    #[test]
    fn test_sticky_notice_never_expires() {
        let mut screen = MenuScreen::new(1500);
        let mut surface = TextLog::default();
        screen
            .show_notice(&mut surface, "Changing lunch...", colors::MESSAGE_BUSY, 0, true)
            .unwrap();
        assert!(!screen.expire_notice(&mut surface, u64::MAX).unwrap());
    }

    #[test]
    fn test_dispatch_table_lookup() {
        struct Ctx(Vec<MealCategory>);
        fn record(ctx: &mut Ctx, category: MealCategory, _now: u64) -> bool {
            ctx.0.push(category);
            true
        }

        let table: DispatchTable<Ctx, bool> = DispatchTable::new()
            .register(MealCategory::Breakfast, record)
            .register(MealCategory::Dinner, record);

        let mut ctx = Ctx(Vec::new());
        let handler = table.lookup(MealCategory::Dinner).unwrap();
        assert!(handler(&mut ctx, MealCategory::Dinner, 0));
        assert!(table.lookup(MealCategory::Lunch).is_none());
        assert_eq!(ctx.0, vec![MealCategory::Dinner]);
    }
}
