use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use todo_core::{DisplayZone, Task};

use super::{centered_rect, priority_style, status_style};

/// Read-only rows of the detail popup.
pub fn detail_lines<'a>(task: &'a Task, zone: &DisplayZone) -> Vec<Line<'a>> {
    let bold = Style::default().bold();
    vec![
        Line::from(vec![Span::styled("タイトル: ", bold), Span::raw(&task.title)]),
        Line::from(""),
        Line::from(vec![
            Span::styled("詳細: ", bold),
            Span::raw(&task.description),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ステータス: ", bold),
            Span::styled(task.status.label(), status_style(task.status)),
        ]),
        Line::from(vec![
            Span::styled("優先度: ", bold),
            Span::styled(task.priority.label(), priority_style(task.priority)),
        ]),
        Line::from(vec![
            Span::styled("期限: ", bold),
            Span::raw(zone.format_due(task.due_date.as_ref())),
        ]),
    ]
}

pub fn render(frame: &mut Frame, task: &Task, zone: &DisplayZone, area: Rect) {
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" タスク詳細 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(detail_lines(task, zone))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}
