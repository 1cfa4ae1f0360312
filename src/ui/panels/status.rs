use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::style::{
    COLOR_BUSY, COLOR_FAIL, COLOR_MUTED, COLOR_OK, ICON_BUSY, ICON_FAIL, ICON_OK,
    container_state_color, container_state_icon, health_color, make_block,
};

fn row<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<11}"), Style::default().fg(COLOR_MUTED)),
        value,
    ])
}

pub fn draw_status(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Status", focused);

    let Some(status) = &app.status else {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "Waiting for first poll…",
            Style::default().fg(COLOR_MUTED),
        )))
        .block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    let daemon = if status.is_daemon_running {
        Span::styled(format!("{ICON_OK} running"), bold.fg(COLOR_OK))
    } else {
        Span::styled(format!("{ICON_FAIL} not running"), bold.fg(COLOR_FAIL))
    };
    lines.push(row("Daemon", daemon));
    lines.push(row(
        "Version",
        Span::raw(status.version.clone().unwrap_or_else(|| "-".into())),
    ));

    let state = status.container_state;
    lines.push(row(
        "Container",
        Span::styled(
            format!(
                "{} {} ({})",
                container_state_icon(state),
                state,
                status.container_name
            ),
            Style::default().fg(container_state_color(state)),
        ),
    ));

    let health = status.health_status.as_deref().unwrap_or("-");
    lines.push(row(
        "Health",
        Span::styled(health.to_string(), Style::default().fg(health_color(health))),
    ));
    lines.push(row(
        "Checked",
        Span::raw(
            status
                .timestamp
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string(),
        ),
    ));

    if let Some(action) = app.busy {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("{ICON_BUSY} {}…", action.label()),
            Style::default().fg(COLOR_BUSY),
        )));
    }

    if let Some(err) = &app.daemon_error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            err.code.as_str(),
            bold.fg(COLOR_FAIL),
        )));
        lines.push(Line::from(err.message.clone()));
        lines.push(Line::from(Span::styled(
            err.suggestion.clone(),
            Style::default().fg(COLOR_BUSY),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
