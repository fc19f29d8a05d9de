//! State machine tests for the TUI App.
//!
//! Each test spawns a test server on a separate thread (to avoid nested tokio runtime panics),
//! creates a BlockingHttpService, builds an App, and simulates key events to test mode
//! transitions and the requests they cause.

use axum::http::Method;
use chrono::DateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todo_core::form::{DESCRIPTION_REQUIRED, TITLE_REQUIRED};
use todo_core::{DisplayZone, Priority, Status, TaskInput};
use todo_server::RequestLog;
use todo_service::BlockingHttpService;
use todo_tui::app::{
    App, Mode, DELETE_FAILED, FETCH_SUMMARY_FAILED, FETCH_TASKS_FAILED, SAVE_FAILED,
};

const LIST: &str = "/api/todo/";
const SUMMARY: &str = "/api/todo/summary/";

/// Spawn the test server on a separate thread, return the base URL and its
/// request log. BlockingHttpService creates its own tokio Runtime, so the
/// server must live in a separate thread's Runtime to avoid nesting.
fn spawn_server() -> (String, RequestLog) {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let server = todo_server::test_helpers::spawn_test_server().await;
            tx.send((server.base_url.clone(), server.requests.clone()))
                .unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn char_key(c: char) -> KeyEvent {
    key(KeyCode::Char(c))
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key(char_key(c));
    }
}

fn input(title: &str) -> TaskInput {
    TaskInput {
        title: title.into(),
        description: "A test description".into(),
        status: Status::NotStarted,
        priority: Priority::Medium,
        due_date: None,
    }
}

fn client(url: &str) -> BlockingHttpService {
    BlockingHttpService::new(url).unwrap()
}

fn make_app() -> (App, RequestLog) {
    let (url, requests) = spawn_server();
    (App::new(client(&url), DisplayZone::default()), requests)
}

/// Seed `n` tasks through the API before the App is built. The returned
/// client talks to the same server behind the App's back.
fn make_seeded_app(n: usize) -> (App, RequestLog, BlockingHttpService) {
    let (url, requests) = spawn_server();
    let seed = client(&url);
    for i in 1..=n {
        seed.create_task(&input(&format!("Task {i}"))).unwrap();
    }
    requests.clear();
    (App::new(client(&url), DisplayZone::default()), requests, seed)
}

fn make_app_with_tasks(n: usize) -> (App, RequestLog) {
    let (app, requests, _seed) = make_seeded_app(n);
    (app, requests)
}

// ---- Mount ----

#[test]
fn app_starts_normal_with_first_page_and_summary() {
    let (url, requests) = spawn_server();
    let seed = client(&url);
    for i in 1..=4 {
        seed.create_task(&input(&format!("Task {i}"))).unwrap();
    }
    seed.create_task(&TaskInput {
        status: Status::Done,
        ..input("Done task")
    })
    .unwrap();
    requests.clear();

    let app = App::new(client(&url), DisplayZone::default());
    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.tasks().len(), 3);
    assert_eq!(app.tasks()[0].title, "Task 1");

    let page = app.page_state();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_tasks, 5);
    assert_eq!(page.completed_tasks, 1);
    assert!(app.error().is_none());

    assert_eq!(requests.count(Method::GET, LIST), 1);
    assert_eq!(requests.count(Method::GET, SUMMARY), 1);
}

#[test]
fn empty_backend_has_no_pages() {
    let (app, _requests) = make_app();
    assert!(app.tasks().is_empty());
    assert_eq!(app.page_state().total_pages, 0);
    assert!(app.selected_task().is_none());
}

#[test]
fn unreachable_server_shows_error_banner() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let app = App::new(client(&format!("http://{addr}")), DisplayZone::default());
    assert!(app.tasks().is_empty());
    assert_eq!(app.error(), Some(FETCH_SUMMARY_FAILED));
}

// ---- Create ----

#[test]
fn n_opens_empty_create_form() {
    let (mut app, _requests) = make_app();
    app.handle_key(char_key('n'));
    match app.mode() {
        Mode::Form { form, editing } => {
            assert!(editing.is_none());
            assert!(form.draft.title.is_empty());
        }
        other => panic!("expected form, got {other:?}"),
    }
    assert!(app.is_input_mode());
}

#[test]
fn empty_submit_reports_both_errors_without_request() {
    let (mut app, requests) = make_app();
    requests.clear();

    app.handle_key(char_key('n'));
    app.handle_key(key(KeyCode::Enter));

    match app.mode() {
        Mode::Form { form, .. } => {
            assert_eq!(form.errors().title, Some(TITLE_REQUIRED));
            assert_eq!(form.errors().description, Some(DESCRIPTION_REQUIRED));
        }
        other => panic!("expected form, got {other:?}"),
    }
    assert!(requests.entries().is_empty());
}

#[test]
fn create_through_form_refetches_and_closes() {
    let (mut app, requests) = make_app();
    requests.clear();

    app.handle_key(char_key('n'));
    type_str(&mut app, "買物");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "コーヒー豆");
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Tab));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "2023-07-01T09:00");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.tasks().len(), 1);
    let task = &app.tasks()[0];
    assert_eq!(task.title, "買物");
    assert_eq!(task.description, "コーヒー豆");
    assert_eq!(task.status, Status::InProgress);
    assert_eq!(
        task.due_date,
        Some(DateTime::parse_from_rfc3339("2023-07-01T00:00:00Z").unwrap())
    );
    assert_eq!(app.page_state().total_tasks, 1);
    assert!(app.status_message().is_some());

    assert_eq!(requests.count(Method::POST, LIST), 1);
    assert_eq!(requests.count(Method::GET, LIST), 1);
    assert_eq!(requests.count(Method::GET, SUMMARY), 1);
}

#[test]
fn q_types_into_form_instead_of_quitting() {
    let (mut app, _requests) = make_app();
    app.handle_key(char_key('n'));
    app.handle_key(char_key('q'));
    match app.mode() {
        Mode::Form { form, .. } => assert_eq!(form.draft.title, "q"),
        other => panic!("expected form, got {other:?}"),
    }
}

#[test]
fn esc_cancels_form_without_request() {
    let (mut app, requests) = make_app();
    requests.clear();
    app.handle_key(char_key('n'));
    type_str(&mut app, "draft");
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
    assert!(requests.entries().is_empty());
}

#[test]
fn failed_save_keeps_form_open() {
    let (mut app, _requests) = make_app();
    app.handle_key(char_key('n'));
    // Over the server's title limit, so the POST is rejected.
    type_str(&mut app, &"x".repeat(256));
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "desc");
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.error(), Some(SAVE_FAILED));
    match app.mode() {
        Mode::Form { form, .. } => assert_eq!(form.draft.title.len(), 256),
        other => panic!("expected form, got {other:?}"),
    }
    assert!(app.tasks().is_empty());
}

// ---- Edit ----

#[test]
fn edit_prefills_local_due_date() {
    let (url, _requests) = spawn_server();
    let seed = client(&url);
    seed.create_task(&TaskInput {
        due_date: Some(DateTime::parse_from_rfc3339("2023-07-01T00:00:00Z").unwrap()),
        ..input("Dated")
    })
    .unwrap();

    let mut app = App::new(client(&url), DisplayZone::default());
    app.handle_key(char_key('e'));
    match app.mode() {
        Mode::Form { form, editing } => {
            assert_eq!(*editing, Some(app.tasks()[0].id));
            assert_eq!(form.draft.title, "Dated");
            assert_eq!(form.draft.due_date, "2023-07-01T09:00");
        }
        other => panic!("expected form, got {other:?}"),
    }
}

#[test]
fn update_refetches_list_and_summary_once_each() {
    let (mut app, requests) = make_app_with_tasks(1);
    let id = app.tasks()[0].id;
    requests.clear();

    app.handle_key(char_key('e'));
    type_str(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.tasks()[0].title, "Task 1!");
    assert_eq!(requests.count(Method::PUT, &format!("{LIST}{id}/")), 1);
    assert_eq!(requests.count(Method::GET, LIST), 1);
    assert_eq!(requests.count(Method::GET, SUMMARY), 1);
    assert_eq!(requests.entries().len(), 3);
}

// ---- Detail ----

#[test]
fn enter_opens_detail_and_esc_returns() {
    let (mut app, requests) = make_app_with_tasks(2);
    requests.clear();

    app.handle_key(char_key('j'));
    app.handle_key(key(KeyCode::Enter));
    match app.mode() {
        Mode::TaskDetail { task } => assert_eq!(task.title, "Task 2"),
        other => panic!("expected detail, got {other:?}"),
    }
    app.handle_key(key(KeyCode::Esc));
    assert!(matches!(app.mode(), Mode::Normal));
    assert!(requests.entries().is_empty());
}

#[test]
fn detail_e_opens_edit_form() {
    let (mut app, _requests) = make_app_with_tasks(1);
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    assert!(matches!(app.mode(), Mode::Form { editing: Some(_), .. }));
}

#[test]
fn enter_on_empty_list_stays_normal() {
    let (mut app, _requests) = make_app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(char_key('e'));
    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::Normal));
}

// ---- Delete ----

#[test]
fn delete_issues_one_delete_and_refetches() {
    let (mut app, requests) = make_app_with_tasks(1);
    let id = app.tasks()[0].id;
    requests.clear();

    app.handle_key(char_key('d'));
    assert!(matches!(app.mode(), Mode::ConfirmDelete { .. }));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert!(app.tasks().is_empty());
    assert_eq!(app.page_state().total_tasks, 0);
    assert_eq!(requests.count(Method::DELETE, &format!("{LIST}{id}/")), 1);
    assert_eq!(requests.count(Method::GET, LIST), 1);
    assert_eq!(requests.count(Method::GET, SUMMARY), 1);
}

#[test]
fn failed_delete_keeps_list_and_shows_error() {
    let (mut app, requests, seed) = make_seeded_app(1);
    let id = app.tasks()[0].id;
    seed.delete_task(id).unwrap();
    requests.clear();

    app.handle_key(char_key('d'));
    app.handle_key(char_key('y'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.error(), Some(DELETE_FAILED));
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].id, id);
    assert_eq!(requests.count(Method::DELETE, &format!("{LIST}{id}/")), 1);
    assert_eq!(requests.count(Method::GET, LIST), 0);
}

#[test]
fn failed_refetch_keeps_prior_page() {
    let (mut app, _requests, seed) = make_seeded_app(4);
    app.handle_key(char_key('l'));
    assert_eq!(app.page_state().current_page, 2);
    assert_eq!(app.page_state().total_pages, 2);

    // Shrink the collection to one page behind the App's back.
    let first = seed.list_tasks(1).unwrap().tasks[0].id;
    seed.delete_task(first).unwrap();

    app.handle_key(char_key('e'));
    type_str(&mut app, "!");
    app.handle_key(key(KeyCode::Enter));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.error(), Some(FETCH_TASKS_FAILED));
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].title, "Task 4");
    assert_eq!(app.page_state().total_pages, 2);
    assert_eq!(app.page_state().total_tasks, 3);
}

#[test]
fn delete_cancel_sends_nothing() {
    let (mut app, requests) = make_app_with_tasks(1);
    requests.clear();

    app.handle_key(char_key('d'));
    app.handle_key(char_key('n'));

    assert!(matches!(app.mode(), Mode::Normal));
    assert_eq!(app.tasks().len(), 1);
    assert!(requests.entries().is_empty());
}

// ---- Pagination ----

#[test]
fn prev_is_disabled_on_first_page() {
    let (mut app, requests) = make_app_with_tasks(7);
    requests.clear();

    app.handle_key(char_key('h'));
    assert_eq!(app.page_state().current_page, 1);
    assert!(requests.entries().is_empty());
}

#[test]
fn next_walks_pages_and_stops_at_last() {
    let (mut app, requests) = make_app_with_tasks(7);
    assert_eq!(app.page_state().total_pages, 3);
    requests.clear();

    app.handle_key(char_key('l'));
    assert_eq!(app.page_state().current_page, 2);
    assert_eq!(app.tasks()[0].title, "Task 4");

    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.page_state().current_page, 3);
    assert_eq!(app.tasks().len(), 1);

    app.handle_key(char_key('l'));
    assert_eq!(app.page_state().current_page, 3);

    assert_eq!(requests.count(Method::GET, LIST), 2);
    assert_eq!(requests.count(Method::GET, SUMMARY), 2);

    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.page_state().current_page, 2);
    assert_eq!(app.tasks()[0].title, "Task 4");
}
