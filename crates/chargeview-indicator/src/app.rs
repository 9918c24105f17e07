//! Application state and key handling

use crate::state::ViewState;
use chargeview_config::Theme;
use chargeview_hal::Subscription;
use chargeview_hal::mock::MockBattery;
use crossterm::event::KeyCode;
use std::sync::Arc;
use tracing::info;

/// Mock level step, in percent
const LEVEL_STEP: f64 = 5.0;

/// Application state
pub struct App {
    subscription: Subscription,
    state: ViewState,
    theme: Theme,
    /// Present when running against the mock backend
    mock: Option<Arc<MockBattery>>,
    should_quit: bool,
}

impl App {
    pub fn new(subscription: Subscription, theme: Theme) -> Self {
        let state = ViewState::from_subscription(&subscription);
        Self {
            subscription,
            state,
            theme,
            mock: None,
            should_quit: false,
        }
    }

    /// Enable keyboard control of a mock battery
    pub fn with_mock(mut self, battery: Arc<MockBattery>) -> Self {
        self.mock = Some(battery);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Pull the latest snapshot into the view state. Returns true when the
    /// view needs a redraw.
    pub fn refresh(&mut self) -> bool {
        match self.subscription.take_update() {
            Some(snapshot) => {
                self.state.update(snapshot);
                true
            }
            None => false,
        }
    }

    /// Handle input
    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.toggle();
            }
            _ => self.handle_mock_input(key),
        }
    }

    fn handle_mock_input(&mut self, key: KeyCode) {
        let Some(battery) = &self.mock else {
            return;
        };

        let readings = battery.readings();
        let percent = (readings.level * 100.0).round();
        match key {
            KeyCode::Char('c') => battery.set_charging(!readings.charging),
            KeyCode::Char('+') | KeyCode::Up => battery.set_level((percent + LEVEL_STEP) / 100.0),
            KeyCode::Char('-') | KeyCode::Down => {
                battery.set_level((percent - LEVEL_STEP) / 100.0)
            }
            _ => {}
        }
    }

    /// Footer help text
    pub fn help_text(&self) -> &'static str {
        if self.mock.is_some() {
            "[C] Charger  [+/-] Level  [T] Theme  [Q] Quit"
        } else {
            "[T] Theme  [Q] Quit"
        }
    }

    /// Release the subscription ahead of shutdown
    pub fn shutdown(&mut self) {
        info!("Shutting down indicator");
        self.subscription.unsubscribe();
    }
}
