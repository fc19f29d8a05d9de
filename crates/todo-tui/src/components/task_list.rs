use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use todo_core::{DisplayZone, Task};

use super::{priority_style, status_style};

/// The tasks of the current page with a cursor.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    list_state: ListState,
}

impl TaskList {
    /// Replace the tasks, keeping the cursor on the same task when it is
    /// still present and clamping it otherwise.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let selected_id = self.selected_task().map(|t| t.id);
        let previous = self.list_state.selected().unwrap_or(0);
        self.tasks = tasks;

        if self.is_empty() {
            self.list_state.select(None);
            return;
        }
        let idx = selected_id
            .and_then(|id| self.tasks.iter().position(|t| t.id == id))
            .unwrap_or_else(|| previous.min(self.tasks.len() - 1));
        self.list_state.select(Some(idx));
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.list_state.selected()?)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < self.tasks.len() {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            KeyCode::Char('g') => self.list_state.select(Some(0)),
            KeyCode::Char('G') => self.list_state.select(Some(self.tasks.len() - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, zone: &DisplayZone, area: Rect) {
        let block = Block::default()
            .title(" タスク一覧 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let items: Vec<ListItem> = self.tasks.iter().map(|t| task_item(t, zone)).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn task_item<'a>(task: &'a Task, zone: &DisplayZone) -> ListItem<'a> {
    let dim = Style::default().fg(Color::DarkGray);
    ListItem::new(vec![
        Line::from(Span::styled(task.title.as_str(), Style::default().bold())),
        Line::from(vec![
            Span::styled("  ステータス: ", dim),
            Span::styled(task.status.label(), status_style(task.status)),
            Span::styled("  優先度: ", dim),
            Span::styled(task.priority.label(), priority_style(task.priority)),
            Span::styled("  期限: ", dim),
            Span::raw(zone.format_due(task.due_date.as_ref())),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use crossterm::event::KeyModifiers;
    use todo_core::{Priority, Status};

    fn make_task(id: i64) -> Task {
        let ts = DateTime::parse_from_rfc3339("2023-07-01T00:00:00Z").unwrap();
        Task {
            id,
            title: format!("Task {id}"),
            description: String::new(),
            status: Status::NotStarted,
            priority: Priority::Medium,
            due_date: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn list_of(tasks: Vec<Task>) -> TaskList {
        let mut list = TaskList::default();
        list.set_tasks(tasks);
        list
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn first_task_selected_on_load() {
        let list = list_of(vec![make_task(1), make_task(2)]);
        assert_eq!(list.selected_task().unwrap().id, 1);
    }

    #[test]
    fn empty_list_has_no_selection() {
        let list = list_of(vec![]);
        assert!(list.is_empty());
        assert!(list.selected_task().is_none());
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut list = list_of(vec![make_task(1), make_task(2), make_task(3)]);
        list.handle_key(key(KeyCode::Char('k')));
        assert_eq!(list.selected_task().unwrap().id, 1);
        list.handle_key(key(KeyCode::Char('j')));
        list.handle_key(key(KeyCode::Down));
        list.handle_key(key(KeyCode::Char('j')));
        assert_eq!(list.selected_task().unwrap().id, 3);
        list.handle_key(key(KeyCode::Char('g')));
        assert_eq!(list.selected_task().unwrap().id, 1);
        list.handle_key(key(KeyCode::Char('G')));
        assert_eq!(list.selected_task().unwrap().id, 3);
    }

    #[test]
    fn reload_keeps_cursor_on_same_task() {
        let mut list = list_of(vec![make_task(1), make_task(2), make_task(3)]);
        list.handle_key(key(KeyCode::Char('j')));
        list.set_tasks(vec![make_task(0), make_task(1), make_task(2)]);
        assert_eq!(list.selected_task().unwrap().id, 2);
    }

    #[test]
    fn reload_clamps_when_task_is_gone() {
        let mut list = list_of(vec![make_task(1), make_task(2), make_task(3)]);
        list.handle_key(key(KeyCode::Char('G')));
        list.set_tasks(vec![make_task(1), make_task(2)]);
        assert_eq!(list.selected_task().unwrap().id, 2);
    }
}
