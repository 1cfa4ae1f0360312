use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Panel};
use crate::ui::overlay::draw_help_overlay;
use crate::ui::panels::{draw_activity, draw_details, draw_status};

pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Main area + 1-line key hint footer.
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    // Top: status | container details. Bottom: activity log.
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(0)])
        .split(outer[0]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    draw_status(frame, app, top[0], app.focused_panel == Panel::Status);
    draw_details(frame, app, top[1], app.focused_panel == Panel::Details);
    draw_activity(frame, app, rows[1], app.focused_panel == Panel::Activity);

    let hint = Line::from(Span::styled(
        " s start  x stop  R restart  p pull  b build  r refresh  ? help  q quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(hint), outer[1]);

    if app.show_help {
        draw_help_overlay(frame, size);
    }
}
