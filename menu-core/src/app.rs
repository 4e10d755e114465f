//! Top-level application: owns every capability and runs the
//! fetch / render / change cycle from a single poll loop.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::client::MenuClient;
use crate::clock::{Clock, TimeSource};
use crate::config::{MenuConfig, UiTiming};
use crate::error::{MenuError, NetworkError};
use crate::http::HttpTransport;
use crate::menu::{MealCategory, MenuOfDay};
use crate::network::{ConnectionState, NetworkConnector, WifiLink};
use crate::screen::{DispatchState, DispatchTable, MenuScreen};
use crate::surface::{Surface, SurfaceError};
use crate::theme::colors;
use crate::touch::{TouchCalibration, TouchEvent, TouchInput, TouchPanel};

/// Concrete capability types for one target.
pub trait Platform {
    type Link: WifiLink;
    type Delay: DelayNs;
    type Time: TimeSource;
    type Http: HttpTransport;
    type Surface: Surface;
    type Touch: TouchPanel;
}

/// Capability objects handed to [`MenuApp::new`].
pub struct Devices<P: Platform> {
    pub link: P::Link,
    pub delay: P::Delay,
    pub time: P::Time,
    pub http: P::Http,
    pub surface: P::Surface,
    pub touch: P::Touch,
}

/// Input delivered to the controller. Raw panel touches are hit-tested
/// against the laid-out controls; `Click` comes from a widget toolkit that
/// already knows which control was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Touch(TouchEvent),
    Click(MealCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing under the touch.
    Ignored,
    /// Touch on the error screen re-ran the menu fetch.
    Retried,
    Changed(MealCategory),
    Failed(MealCategory),
    /// Another change was still in flight.
    Rejected(MealCategory),
}

pub struct MenuApp<P: Platform> {
    connector: NetworkConnector<P::Link, P::Delay>,
    clock: Clock<P::Time>,
    client: MenuClient<P::Http>,
    surface: P::Surface,
    panel: P::Touch,
    touch: TouchInput,
    screen: MenuScreen,
    handlers: DispatchTable<Self, DispatchOutcome>,
    timing: UiTiming,
    date: Option<String>,
    menu: Option<MenuOfDay>,
    next_clock_tick: u64,
}

fn log_draw(result: Result<(), SurfaceError>) {
    if let Err(e) = result {
        error!("Render failed: {}", e);
    }
}

impl<P: Platform> MenuApp<P> {
    pub fn new(devices: Devices<P>, config: &MenuConfig, calibration: TouchCalibration) -> Self {
        let mut handlers: DispatchTable<Self, DispatchOutcome> = DispatchTable::new();
        for category in MealCategory::ALL {
            handlers = handlers.register(category, Self::change_meal);
        }

        Self {
            connector: NetworkConnector::new(devices.link, devices.delay, config.retry),
            clock: Clock::new(devices.time, config.utc_offset_hours),
            client: MenuClient::new(devices.http, &config.server),
            surface: devices.surface,
            panel: devices.touch,
            touch: TouchInput::new(calibration, config.timing.debounce_ms),
            screen: MenuScreen::new(config.timing.message_dwell_ms),
            handlers,
            timing: config.timing,
            date: None,
            menu: None,
            next_clock_tick: 0,
        }
    }

    pub fn menu(&self) -> Option<&MenuOfDay> {
        self.menu.as_ref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connector.state()
    }

    pub fn screen(&self) -> &MenuScreen {
        &self.screen
    }

    pub fn surface(&self) -> &P::Surface {
        &self.surface
    }

    /// Boot sequence: connect, sync time, fetch and draw the first menu.
    pub fn start(&mut self, now_ms: u64) {
        info!("Starting menu display");

        self.next_clock_tick = now_ms + self.timing.clock_tick_ms;

        if self.connect_with_status() != ConnectionState::Connected {
            let attempts = self.connector.max_attempts();
            self.show_fetch_error(&MenuError::Connection { attempts });
            return;
        }
        if let Err(e) = self.clock.sync_time() {
            error!("Initial time sync failed: {}", e);
        }
        self.date = self.clock.today();

        self.refresh_menu();
    }

    /// One pass of the main loop: sample touch, then timers.
    pub fn poll(&mut self, now_ms: u64) -> Option<DispatchOutcome> {
        let outcome = self
            .panel
            .sample()
            .and_then(|raw| self.touch.process(raw, now_ms))
            .map(|event| self.handle_event(UiEvent::Touch(event), now_ms));

        self.tick(now_ms);
        outcome
    }

    pub fn handle_event(&mut self, event: UiEvent, now_ms: u64) -> DispatchOutcome {
        match event {
            UiEvent::Touch(touch) => {
                if self.screen.is_showing_error() {
                    info!("Retrying menu fetch after touch");
                    self.refresh_menu();
                    return DispatchOutcome::Retried;
                }
                match self.screen.hit_test(touch) {
                    Some(category) => {
                        info!("{} 'Change' button touched", category);
                        self.dispatch(category, now_ms)
                    }
                    None => DispatchOutcome::Ignored,
                }
            }
            UiEvent::Click(category) => {
                if !self.screen.is_showing_menu() {
                    debug!("Click on {} ignored, menu not shown", category);
                    return DispatchOutcome::Ignored;
                }
                self.dispatch(category, now_ms)
            }
        }
    }

    /// Timer bookkeeping: message dwell and the periodic clock refresh.
    pub fn tick(&mut self, now_ms: u64) {
        if let Err(e) = self.screen.expire_notice(&mut self.surface, now_ms) {
            error!("Render failed: {}", e);
        }

        if now_ms >= self.next_clock_tick {
            self.next_clock_tick = now_ms + self.timing.clock_tick_ms;
            self.clock_tick();
        }
    }

    fn dispatch(&mut self, category: MealCategory, now_ms: u64) -> DispatchOutcome {
        match self.handlers.lookup(category) {
            Some(handler) => handler(self, category, now_ms),
            None => {
                warn!("No handler registered for {}", category);
                DispatchOutcome::Ignored
            }
        }
    }

    fn change_meal(&mut self, category: MealCategory, now_ms: u64) -> DispatchOutcome {
        if !self.screen.begin_dispatch(category) {
            return DispatchOutcome::Rejected(category);
        }

        log_draw(self.screen.show_notice(
            &mut self.surface,
            &format!("Changing {}...", category),
            colors::MESSAGE_BUSY,
            now_ms,
            true,
        ));

        let outcome = match self.request_change(category) {
            Ok(()) => {
                self.screen.clear_notice();
                match self.load_menu() {
                    Ok(menu) => {
                        self.show_menu(menu);
                        log_draw(self.screen.show_notice(
                            &mut self.surface,
                            "Meal changed successfully!",
                            colors::MESSAGE_OK,
                            now_ms,
                            false,
                        ));
                    }
                    Err(e) => self.show_fetch_error(&e),
                }
                DispatchOutcome::Changed(category)
            }
            Err(e) => {
                warn!("Failed to change meal: {}", e);
                self.screen.clear_notice();
                self.redraw_menu();
                log_draw(self.screen.show_notice(
                    &mut self.surface,
                    "Failed to change meal",
                    colors::MESSAGE_ERROR,
                    now_ms,
                    false,
                ));
                DispatchOutcome::Failed(category)
            }
        };

        self.screen.finish_dispatch();
        outcome
    }

    fn request_change(&mut self, category: MealCategory) -> Result<(), MenuError> {
        self.require_network()?;
        let date = self.current_date()?;
        self.client.request_random_meal(&date, category)
    }

    /// Fetch and draw the menu, or replace the screen with an error.
    fn refresh_menu(&mut self) {
        match self.load_menu() {
            Ok(menu) => self.show_menu(menu),
            Err(e) => self.show_fetch_error(&e),
        }
    }

    fn load_menu(&mut self) -> Result<MenuOfDay, MenuError> {
        self.require_network()?;
        let date = self.current_date()?;
        self.client.fetch_menu(&date)
    }

    fn show_menu(&mut self, menu: MenuOfDay) {
        let time = self.clock.now_hhmm();
        log_draw(self.screen.show_menu(&mut self.surface, &menu, time.as_deref()));
        self.menu = Some(menu);
    }

    /// Re-render the held menu after a failed change. The change request may
    /// have passed through the status screen while reconnecting.
    fn redraw_menu(&mut self) {
        let Some(menu) = self.menu.as_ref() else {
            return;
        };
        let time = self.clock.now_hhmm();
        log_draw(self.screen.show_menu(&mut self.surface, menu, time.as_deref()));
    }

    fn show_fetch_error(&mut self, e: &MenuError) {
        error!("Menu fetch failed: {}", e);
        log_draw(self.screen.show_error(&mut self.surface, e.screen_message()));
    }

    fn connect_with_status(&mut self) -> ConnectionState {
        let screen = &mut self.screen;
        let surface = &mut self.surface;
        self.connector.ensure_connected(|state| {
            log_draw(screen.show_status(surface, state.status_message()));
        })
    }

    fn require_network(&mut self) -> Result<(), MenuError> {
        match self.connect_with_status() {
            ConnectionState::Connected => Ok(()),
            _ => Err(NetworkError::NotConnected.into()),
        }
    }

    /// Date of the menu on screen, syncing the clock first if it never was.
    fn current_date(&mut self) -> Result<String, MenuError> {
        if let Some(date) = &self.date {
            return Ok(date.clone());
        }
        self.clock.sync_time()?;
        let date = self
            .clock
            .today()
            .ok_or_else(|| MenuError::TimeSync("clock not set".to_string()))?;
        self.date = Some(date.clone());
        Ok(date)
    }

    fn clock_tick(&mut self) {
        if self.connector.refresh_state() != ConnectionState::Connected {
            debug!("Clock tick skipped, WiFi down");
            return;
        }
        if self.clock.sync_time().is_err() {
            return;
        }

        // A boot without time leaves no date; the first good sync fetches
        let today = self.clock.today();
        if today.is_some() && today != self.date {
            match &self.date {
                Some(_) => info!("Date changed to {:?}, fetching new menu", today),
                None => info!("Clock set, fetching menu for {:?}", today),
            }
            self.date = today;
            if self.screen.dispatch_state() == DispatchState::Idle {
                self.refresh_menu();
            }
            return;
        }

        if let Some(time) = self.clock.now_hhmm() {
            log_draw(self.screen.update_clock(&mut self.surface, &time));
        }
    }
}
