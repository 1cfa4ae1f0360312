use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::style::{COLOR_MUTED, health_color, make_block};

pub fn draw_details(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Container", focused);

    let Some(details) = &app.details else {
        let msg = format!("No running container named {}", app.container_name);
        let paragraph =
            Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(COLOR_MUTED))))
                .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let label = |s: &'static str| Span::styled(format!("{s:<8}"), Style::default().fg(COLOR_MUTED));
    let health = details.health.as_deref().unwrap_or("none");

    let lines = vec![
        Line::from(vec![label("Name"), Span::raw(details.name.clone())]),
        Line::from(vec![label("Image"), Span::raw(details.image.clone())]),
        Line::from(vec![label("State"), Span::raw(details.state.clone())]),
        Line::from(vec![
            label("Health"),
            Span::styled(health.to_string(), Style::default().fg(health_color(health))),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
