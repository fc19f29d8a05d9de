use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use todo_core::{DisplayZone, Task};
use todo_service::BlockingHttpService;
use tracing::{error, info};

use crate::components::task_form::{FormAction, TaskForm};
use crate::components::task_list::TaskList;
use crate::components::{centered_rect, summary, task_detail};

pub const FETCH_TASKS_FAILED: &str = "タスクの取得に失敗しました";
pub const FETCH_SUMMARY_FAILED: &str = "タスクサマリーの取得に失敗しました";
pub const SAVE_FAILED: &str = "タスクの保存に失敗しました";
pub const DELETE_FAILED: &str = "タスクの削除に失敗しました";

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Browsing the current page
    Normal,
    /// Read-only view of one task
    TaskDetail { task: Task },
    /// Create (`editing: None`) or edit form
    Form {
        form: TaskForm,
        editing: Option<i64>,
    },
    /// Confirm delete task
    ConfirmDelete { task: Task },
}

/// Pagination and summary counters, as of the last successful fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_tasks: u64,
    pub completed_tasks: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_tasks: 0,
            completed_tasks: 0,
        }
    }
}

impl PageState {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

pub struct App {
    service: BlockingHttpService,
    zone: DisplayZone,
    list: TaskList,
    page: PageState,
    mode: Mode,
    error: Option<String>,
    status_message: Option<String>,
}

impl App {
    /// Build the app and load the first page and the summary. Fetch failures
    /// show up as the error banner rather than failing construction.
    pub fn new(service: BlockingHttpService, zone: DisplayZone) -> Self {
        let mut app = Self {
            service,
            zone,
            list: TaskList::default(),
            page: PageState::default(),
            mode: Mode::Normal,
            error: None,
            status_message: None,
        };
        app.refresh();
        app
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.list.selected_task()
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Form { .. })
    }

    fn fetch_tasks(&mut self) {
        match self.service.list_tasks(self.page.current_page) {
            Ok(page) => {
                self.list.set_tasks(page.tasks);
                self.page.total_pages = page.total_pages;
                self.error = None;
            }
            Err(e) => {
                error!(page = self.page.current_page, error = %e, "failed to fetch tasks");
                self.error = Some(FETCH_TASKS_FAILED.into());
            }
        }
    }

    fn fetch_summary(&mut self) {
        match self.service.get_summary() {
            Ok(summary) => {
                self.page.total_tasks = summary.total;
                self.page.completed_tasks = summary.completed;
            }
            Err(e) => {
                error!(error = %e, "failed to fetch task summary");
                self.error = Some(FETCH_SUMMARY_FAILED.into());
            }
        }
    }

    /// Reload the current page, then the summary.
    fn refresh(&mut self) {
        self.fetch_tasks();
        self.fetch_summary();
    }

    fn change_page(&mut self, page: u64) {
        self.page.current_page = page;
        self.refresh();
    }

    pub fn prev_page(&mut self) {
        if self.page.has_prev() {
            self.change_page(self.page.current_page - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.page.has_next() {
            self.change_page(self.page.current_page + 1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match &self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::TaskDetail { task } => self.handle_task_detail(key, task.clone()),
            Mode::Form { form, editing } => self.handle_form(key, form.clone(), *editing),
            Mode::ConfirmDelete { task } => self.handle_confirm_delete(key, task.clone()),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => {
                self.mode = Mode::Form {
                    form: TaskForm::new(),
                    editing: None,
                };
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(task) = self.list.selected_task() {
                    self.mode = Mode::TaskDetail { task: task.clone() };
                }
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.list.selected_task().cloned() {
                    self.open_edit(&task);
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.list.selected_task() {
                    self.mode = Mode::ConfirmDelete { task: task.clone() };
                }
            }
            KeyCode::Char('h') | KeyCode::Left => self.prev_page(),
            KeyCode::Char('l') | KeyCode::Right => self.next_page(),
            _ => self.list.handle_key(key),
        }
    }

    fn handle_task_detail(&mut self, key: KeyEvent, task: Task) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Char('e') => self.open_edit(&task),
            KeyCode::Char('d') => self.mode = Mode::ConfirmDelete { task },
            _ => {}
        }
    }

    fn open_edit(&mut self, task: &Task) {
        self.mode = Mode::Form {
            form: TaskForm::edit(task, &self.zone),
            editing: Some(task.id),
        };
    }

    fn handle_form(&mut self, key: KeyEvent, mut form: TaskForm, editing: Option<i64>) {
        match form.handle_key(key) {
            FormAction::None => self.mode = Mode::Form { form, editing },
            FormAction::Cancel => self.mode = Mode::Normal,
            FormAction::Submit => self.save(form, editing),
        }
    }

    /// Validate, then create or update. On success the page and summary are
    /// reloaded before the form closes; on failure the form stays open.
    fn save(&mut self, mut form: TaskForm, editing: Option<i64>) {
        let input = match form.draft.validate(&self.zone) {
            Ok(input) => input,
            Err(errors) => {
                form.set_errors(errors);
                self.mode = Mode::Form { form, editing };
                return;
            }
        };
        form.set_errors(Default::default());

        let result = match editing {
            Some(id) => self.service.update_task(&input, id),
            None => self.service.create_task(&input),
        };

        match result {
            Ok(task) => {
                info!(id = task.id, updated = editing.is_some(), "task saved");
                self.refresh();
                self.mode = Mode::Normal;
                self.status_message = Some(
                    if editing.is_some() {
                        "タスクを更新しました"
                    } else {
                        "タスクを登録しました"
                    }
                    .into(),
                );
            }
            Err(e) => {
                error!(?editing, error = %e, "failed to save task");
                self.error = Some(SAVE_FAILED.into());
                self.mode = Mode::Form { form, editing };
            }
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, task: Task) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.service.delete_task(task.id) {
                    Ok(()) => {
                        info!(id = task.id, "task deleted");
                        self.refresh();
                        self.status_message = Some(format!("削除しました: {}", task.title));
                    }
                    Err(e) => {
                        error!(id = task.id, error = %e, "failed to delete task");
                        self.error = Some(DELETE_FAILED.into());
                    }
                }
                self.mode = Mode::Normal;
            }
            _ => self.mode = Mode::Normal,
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        summary::render(
            frame,
            self.page.total_tasks,
            self.page.completed_tasks,
            layout[1],
        );
        self.render_error(frame, layout[2]);
        self.list.render(frame, &self.zone, layout[3]);
        self.render_pager(frame, layout[4]);
        self.render_status_bar(frame, layout[5]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::TaskDetail { task } => task_detail::render(frame, task, &self.zone, area),
            Mode::Form { form, editing } => form.render(frame, editing.is_some(), area),
            Mode::ConfirmDelete { task } => self.render_confirm_delete_dialog(frame, task, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" TODOアプリ ", Style::default().bold().fg(Color::Cyan)),
            Span::styled(
                format!("| {}", self.service.base_url()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_error(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.error {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Red).bold(),
            ));
            frame.render_widget(line, area);
        }
    }

    fn render_pager(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            pager_line(&self.page).alignment(Alignment::Center),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "tasks"),
                ("h/l", "page"),
                ("n", "new"),
                ("Enter", "detail"),
                ("e", "edit"),
                ("d", "del"),
            ],
            Mode::TaskDetail { .. } => vec![("e", "edit"), ("d", "del"), ("Esc", "back")],
            Mode::Form { .. } => vec![
                ("Tab", "next field"),
                ("←/→", "change"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ],
            Mode::ConfirmDelete { .. } => vec![("y", "confirm"), ("any", "cancel")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_confirm_delete_dialog(&self, frame: &mut Frame, task: &Task, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" 削除の確認 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("「{}」を削除しますか?\n\n(y)es / (any key) cancel", task.title);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

/// "前  n / m  次", with the unavailable direction dimmed.
pub fn pager_line(page: &PageState) -> Line<'static> {
    let enabled = Style::default().fg(Color::Cyan).bold();
    let disabled = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled("< 前", if page.has_prev() { enabled } else { disabled }),
        Span::raw(format!("  {} / {}  ", page.current_page, page.total_pages)),
        Span::styled("次 >", if page.has_next() { enabled } else { disabled }),
    ])
}
