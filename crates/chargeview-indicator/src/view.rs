//! Terminal rendering

use crate::format::{BatteryDisplay, ColorClass};
use crate::state::ViewState;
use chargeview_config::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

const BOLT: &str = "⚡";

/// Gauge fill color for a color class
pub fn fill_color(class: ColorClass) -> Color {
    match class {
        ColorClass::Charging => Color::Blue,
        ColorClass::Normal => Color::Green,
        ColorClass::Low => Color::Red,
    }
}

struct Palette {
    text: Color,
    border: Color,
    background: Color,
}

fn palette(theme: Theme) -> Palette {
    if theme.is_dark() {
        Palette {
            text: Color::White,
            border: Color::White,
            background: Color::Black,
        }
    } else {
        Palette {
            text: Color::Black,
            border: Color::DarkGray,
            background: Color::White,
        }
    }
}

/// Draw the UI
pub fn draw(frame: &mut Frame, state: &ViewState, theme: Theme, footer: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Gauge
            Constraint::Min(0),    // Details
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    // Messages take the gauge and details rows together
    let body = chunks[0].union(chunks[1]);

    match state {
        ViewState::Loading => draw_message(frame, body, "Loading...", theme),
        ViewState::Failed(error) => draw_message(frame, body, error, theme),
        ViewState::Ready { display, .. } => {
            draw_gauge(frame, chunks[0], display, theme);
            draw_details(frame, chunks[1], display, theme);
        }
    }

    draw_footer(frame, chunks[2], footer, theme);
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str, theme: Theme) {
    let palette = palette(theme);
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(palette.text).bg(palette.background))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Battery"));

    frame.render_widget(paragraph, area);
}

fn draw_gauge(frame: &mut Frame, area: Rect, display: &BatteryDisplay, theme: Theme) {
    let palette = palette(theme);
    let label = if display.charging {
        format!("{} {}", BOLT, display.level)
    } else {
        display.level.to_string()
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title(format!("Battery ({})", display.color.as_str())),
        )
        .gauge_style(
            Style::default()
                .fg(fill_color(display.color))
                .bg(palette.background)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(f64::from(display.level) / 100.0)
        .label(label);

    frame.render_widget(gauge, area);
}

fn draw_details(frame: &mut Frame, area: Rect, display: &BatteryDisplay, theme: Theme) {
    let palette = palette(theme);
    let key = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Battery Level: ", key),
            Span::raw(display.level.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Charging: ", key),
            Span::raw(if display.charging { "Yes" } else { "No" }),
        ]),
        Line::from(vec![
            Span::styled("Charging Time: ", key),
            Span::raw(display.charging_label.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Discharging Time: ", key),
            Span::raw(display.discharging_label.as_str()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(palette.text).bg(palette.background))
        .block(Block::default().borders(Borders::ALL).title("Details"));

    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, footer: &str, theme: Theme) {
    let help = Paragraph::new(footer)
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette(theme).border)),
        );

    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargeview_hal::{BatterySnapshot, TimeEstimate};
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &ViewState) -> String {
        render_sized(state, 60, 16)
    }

    fn render_sized(state: &ViewState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw(frame, state, Theme::Dark, "[Q] Quit"))
            .unwrap();

        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_fill_colors() {
        assert_eq!(fill_color(ColorClass::Charging), Color::Blue);
        assert_eq!(fill_color(ColorClass::Normal), Color::Green);
        assert_eq!(fill_color(ColorClass::Low), Color::Red);
    }

    #[test]
    fn test_render_loading() {
        let screen = render(&ViewState::Loading);
        assert!(screen.contains("Loading..."));
        assert!(screen.contains("[Q] Quit"));
    }

    #[test]
    fn test_render_error() {
        let screen = render(&ViewState::Failed("Battery telemetry unavailable".into()));
        assert!(screen.contains("Battery telemetry unavailable"));
        assert!(!screen.contains("Charging Time"));
    }

    #[test]
    fn test_render_long_error_wraps() {
        let message = "Battery telemetry unavailable: UPower: \
            org.freedesktop.DBus.Error.ServiceUnknown: The name \
            org.freedesktop.UPower was not provided by any .service files";
        assert!(message.len() > 80);

        let screen = render_sized(&ViewState::Failed(message.to_string()), 80, 24);
        for word in message.split_whitespace() {
            assert!(screen.contains(word), "missing {:?}", word);
        }
    }

    #[test]
    fn test_palette_follows_theme() {
        assert_eq!(palette(Theme::Dark).background, Color::Black);
        assert_eq!(palette(Theme::Light).background, Color::White);
        assert_eq!(palette(Theme::Light).text, Color::Black);
    }

    #[test]
    fn test_render_ready() {
        let state = ViewState::ready(BatterySnapshot {
            level: 72.9,
            charging: false,
            charging_time: TimeEstimate::NotApplicable,
            discharging_time: TimeEstimate::Seconds(3600),
        });

        let screen = render(&state);
        assert!(screen.contains("Battery Level: 72"));
        assert!(screen.contains("Charging: No"));
        assert!(screen.contains("Charging Time: Not Charging"));
        assert!(screen.contains("Discharging Time: 1 hours"));
        assert!(screen.contains("Battery (normal)"));
    }
}
