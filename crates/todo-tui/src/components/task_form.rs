use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use todo_core::form::{FormErrors, TaskDraft};
use todo_core::{DisplayZone, Task};

use super::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Title,
        FormField::Description,
        FormField::Status,
        FormField::Priority,
        FormField::DueDate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Title => "題名",
            FormField::Description => "詳細",
            FormField::Status => "ステータス",
            FormField::Priority => "優先度",
            FormField::DueDate => "期限",
        }
    }
}

/// What the owner of the form should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

/// Create/edit form: a draft, the focused field and the errors of the last
/// submit attempt.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub draft: TaskDraft,
    focus: Option<FormField>,
    errors: FormErrors,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(task: &Task, zone: &DisplayZone) -> Self {
        Self {
            draft: TaskDraft::from_task(task, zone),
            ..Self::default()
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus.unwrap_or(FormField::Title)
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn set_errors(&mut self, errors: FormErrors) {
        self.errors = errors;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let focus = self.focus();
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return FormAction::Submit
            }
            KeyCode::Tab | KeyCode::Down => self.focus = Some(focus.next()),
            KeyCode::BackTab | KeyCode::Up => self.focus = Some(focus.prev()),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match focus {
                    FormField::Status => {
                        self.draft.status = if forward {
                            self.draft.status.next()
                        } else {
                            self.draft.status.prev()
                        }
                    }
                    FormField::Priority => {
                        self.draft.priority = if forward {
                            self.draft.priority.next()
                        } else {
                            self.draft.priority.prev()
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut(focus) {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.text_mut(focus) {
                    text.push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.draft.title),
            FormField::Description => Some(&mut self.draft.description),
            FormField::DueDate => Some(&mut self.draft.due_date),
            FormField::Status | FormField::Priority => None,
        }
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.draft.title.clone(),
            FormField::Description => self.draft.description.clone(),
            FormField::Status => format!("< {} >", self.draft.status.label()),
            FormField::Priority => format!("< {} >", self.draft.priority.label()),
            FormField::DueDate if self.draft.due_date.is_empty() => "期限なし".into(),
            FormField::DueDate => self.draft.due_date.clone(),
        }
    }

    fn error(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::Title => self.errors.title,
            FormField::Description => self.errors.description,
            FormField::DueDate => self.errors.due_date,
            FormField::Status | FormField::Priority => None,
        }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let focus = self.focus();
        let mut lines = Vec::new();
        for field in FormField::ORDER {
            let label_style = if field == focus {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().bold()
            };
            let marker = if field == focus { "> " } else { "  " };
            let value_style = if field == FormField::DueDate && self.draft.due_date.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{}: ", field.label()), label_style),
                Span::styled(self.value(field), value_style),
            ]));
            if let Some(msg) = self.error(field) {
                lines.push(Line::from(Span::styled(
                    format!("    {msg}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, editing: bool, area: Rect) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let title = if editing {
            " タスクを編集 "
        } else {
            " 新規タスク登録 "
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }
}
