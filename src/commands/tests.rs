use super::*;
use crate::core::app::tests::test_app;
use crate::core::backend::BackendKind;
use crate::core::settings::{Model, Temperature};
use tempfile::TempDir;

#[test]
fn plain_text_is_a_message() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);
    assert_eq!(
        process_input(&mut app, "hello there"),
        CommandResult::ProcessAsMessage("hello there".to_string())
    );
}

#[test]
fn unknown_commands_are_sent_as_messages() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);
    assert_eq!(
        process_input(&mut app, "/shrug ok"),
        CommandResult::ProcessAsMessage("/shrug ok".to_string())
    );
    assert_eq!(
        process_input(&mut app, "/"),
        CommandResult::ProcessAsMessage("/".to_string())
    );
}

#[test]
fn every_command_is_registered_once() {
    let names: Vec<_> = all_commands().iter().map(|c| c.name).collect();
    for name in ["help", "clear", "export", "model", "temp", "theme", "log"] {
        assert_eq!(names.iter().filter(|n| **n == name).count(), 1, "{name}");
    }
    assert!(find_command("HELP").is_some());
}

#[test]
fn help_lists_commands_and_keys() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);
    assert_eq!(process_input(&mut app, "/help"), CommandResult::Continue);

    let notice = app.ui.notice.as_deref().unwrap();
    assert!(notice.contains("/export [file]"));
    assert!(notice.contains("Ctrl+L"));
}

#[test]
fn model_without_argument_cycles() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);

    process_input(&mut app, "/model");
    assert_eq!(app.session.settings().model(), Model::Llama3_70b);

    process_input(&mut app, "/model PHI3");
    assert_eq!(app.session.settings().model(), Model::Phi3);

    process_input(&mut app, "/model HuggingFaceH4/zephyr-7b-beta");
    assert_eq!(app.session.settings().model(), Model::Phi3);
    assert!(app.ui.status.as_deref().unwrap().contains("not served"));
}

#[test]
fn temp_sets_and_reports() {
    let mut app = test_app(BackendKind::HostedApi, &[]);

    process_input(&mut app, "/temp 0.2");
    assert_eq!(app.session.settings().temperature(), Temperature::new(0.2).unwrap());

    process_input(&mut app, "/temp");
    assert!(app.ui.status.as_deref().unwrap().starts_with("Temperature: 0.2"));
}

#[test]
fn theme_and_log_commands() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);

    process_input(&mut app, "/theme");
    assert!(app.session.settings().light_theme());

    process_input(&mut app, "/log");
    assert_eq!(app.ui.status.as_deref(), Some("Logging: disabled"));

    process_input(&mut app, "/log sideways");
    assert_eq!(app.ui.status.as_deref(), Some("Usage: /log [on|off]"));
}

#[test]
fn export_with_filename_writes_it() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat.txt");
    let mut app = test_app(BackendKind::LocalDaemon, &[]);
    let pending = app.begin_turn("q").unwrap();
    app.complete_turn(pending, "a".to_string());

    process_input(&mut app, &format!("/export {}", path.display()));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "User: q\nAssistant: a\n");
}

#[test]
fn clear_empties_the_transcript() {
    let mut app = test_app(BackendKind::LocalDaemon, &[]);
    let pending = app.begin_turn("q").unwrap();
    app.complete_turn(pending, "a".to_string());

    process_input(&mut app, "/clear");

    assert!(app.session.transcript().is_empty());
    assert_eq!(app.ui.status.as_deref(), Some("Conversation cleared"));
}
