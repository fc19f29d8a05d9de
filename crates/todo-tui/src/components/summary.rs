use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn summary_lines(total: u64, completed: u64) -> Vec<Line<'static>> {
    vec![
        Line::from(format!("タスク件数: {total}")),
        Line::from(Span::styled(
            format!("完了タスク: {completed}"),
            Style::default().fg(Color::Green),
        )),
    ]
}

pub fn render(frame: &mut Frame, total: u64, completed: u64, area: Rect) {
    let paragraph = Paragraph::new(summary_lines(total, completed))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}
