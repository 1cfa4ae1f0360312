use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::App;
use crate::ui::style::{COLOR_MUTED, activity_color, make_block};

pub fn draw_activity(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let block = make_block("Activity", focused);

    if app.activity.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Nothing yet. Press ? for keys.",
            Style::default().fg(COLOR_MUTED),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Newest first, so the latest outcome is visible without scrolling.
    let lines: Vec<Line> = app
        .activity
        .iter()
        .rev()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(COLOR_MUTED),
                ),
                Span::styled(
                    entry.text.clone(),
                    Style::default().fg(activity_color(entry.kind)),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.activity_scroll, 0));
    frame.render_widget(paragraph, area);
}
