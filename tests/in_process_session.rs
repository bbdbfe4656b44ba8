//! End-to-end in-process runs against a real settings file on disk.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use termino::color::Color;
use termino::command::{ColorRequest, Command, CommandInfo};
use termino::dispatch::{
    CommandOutcome, Completion, Dispatcher, InProcessExecutor, RemoteAck, RemoteExecutor,
};
use termino::error::TerminoError;
use termino::model::{ColorField, ProfileSelector, SettingsModel};
use termino::store::FileSettingsStore;

#[path = "../src/testsupport.rs"]
#[allow(dead_code)]
mod testsupport;

use testsupport::TestTempDir;

const SETTINGS: &str = r##"{
    "$schema": "https://aka.ms/terminal-profiles-schema",
    "defaultProfile": "{2c4de342-38b7-51cf-b940-2309a097f518}",
    "launchMode": "default",
    "profiles": {
        "defaults": {
            "font": {
                "face": "Cascadia Mono"
            }
        },
        "list": [
            {
                "guid": "{61c54bbd-c2c6-5271-96e7-009a87ff44bf}",
                "name": "Windows PowerShell",
                "tabColor": null
            },
            {
                "guid": "{2c4de342-38b7-51cf-b940-2309a097f518}",
                "name": "Ubuntu",
                "source": "Windows.Terminal.Wsl",
                "foreground": "#cccccc"
            }
        ]
    },
    "schemes": []
}
"##;

struct Fixture {
    _dir: TestTempDir,
    path: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = TestTempDir::new(name);
        let path = dir.write_text("settings.json", SETTINGS);
        Self { _dir: dir, path }
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn text(&self) -> String {
        fs::read_to_string(self.path()).expect("read settings")
    }

    fn model(&self) -> SettingsModel {
        SettingsModel::from_json_str(&self.text()).expect("parse settings")
    }
}

fn dispatcher(fixture: &Fixture) -> Dispatcher {
    Dispatcher::in_process(InProcessExecutor::new(
        fixture.path(),
        Arc::new(FileSettingsStore),
    ))
}

fn set_commands(request: ColorRequest, selector: ProfileSelector) -> Vec<Command> {
    request
        .into_commands(&selector)
        .expect("at least one option")
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("valid colors")
}

#[tokio::test]
async fn set_then_undo_restores_the_exact_file() {
    let fixture = Fixture::new("set-undo");
    let dispatcher = dispatcher(&fixture);

    let commands = set_commands(
        ColorRequest {
            tab_color: Some("#1a2b3c".into()),
            background: None,
            foreground: Some("white".into()),
        },
        ProfileSelector::Default,
    );
    for command in commands {
        dispatcher.submit(command).outcome().await.expect("apply");
    }

    let model = fixture.model();
    let ubuntu = model.profile(1).expect("ubuntu");
    assert_eq!(ubuntu.color(ColorField::TabColor), Some(Color::rgb(26, 43, 60)));
    assert_eq!(ubuntu.color(ColorField::Foreground), Some(Color::rgb(255, 255, 255)));
    assert!(fixture.text().contains("\"face\": \"Cascadia Mono\""));

    let undo = dispatcher
        .submit(Command::undo(5).expect("count"))
        .outcome()
        .await
        .expect("undo");
    assert_eq!(
        undo,
        CommandOutcome::Completed(Completion::Undone {
            requested: 5,
            undone: 2
        })
    );
    assert_eq!(fixture.text(), SETTINGS);

    let report = dispatcher.close().await;
    assert_eq!((report.succeeded, report.failed), (3, 0));
}

#[tokio::test]
async fn null_color_survives_unrelated_edits() {
    let fixture = Fixture::new("null-color");
    let dispatcher = dispatcher(&fixture);
    let commands = set_commands(
        ColorRequest {
            tab_color: None,
            background: Some("black".into()),
            foreground: None,
        },
        ProfileSelector::ByName("Windows PowerShell".into()),
    );
    for command in commands {
        dispatcher.submit(command).outcome().await.expect("apply");
    }
    let text = fixture.text();
    assert!(text.contains("\"tabColor\": null"));
    assert!(text.contains("\"background\": \"#000000\""));
    assert!(text.contains("\"foreground\": \"#cccccc\""));
    dispatcher.close().await;
}

#[tokio::test]
async fn atomic_composite_undoes_as_one() {
    let fixture = Fixture::new("composite");
    let dispatcher = dispatcher(&fixture);
    let children = set_commands(
        ColorRequest {
            tab_color: Some("red".into()),
            background: Some("navy".into()),
            foreground: None,
        },
        ProfileSelector::ByPosition(0),
    );
    dispatcher
        .submit(Command::composite(CommandInfo::new("set", "both"), children))
        .outcome()
        .await
        .expect("composite");
    assert_ne!(fixture.text(), SETTINGS);

    let undo = dispatcher
        .submit(Command::undo(1).expect("count"))
        .outcome()
        .await
        .expect("undo");
    assert_eq!(
        undo,
        CommandOutcome::Completed(Completion::Undone {
            requested: 1,
            undone: 1
        })
    );
    assert_eq!(fixture.text(), SETTINGS);
    dispatcher.close().await;
}

#[tokio::test]
async fn ambiguous_selector_is_reported_without_writing() {
    let fixture = Fixture::new("ambiguous");
    fs::write(
        fixture.path(),
        r#"{"profiles":[{"name":"dup"},{"name":"dup"}]}"#,
    )
    .expect("write");
    let before = fixture.text();
    let dispatcher = dispatcher(&fixture);
    let err = dispatcher
        .submit(Command::set_color(
            ColorField::TabColor,
            CommandInfo::new("tabColor", ""),
            ProfileSelector::ByName("dup".into()),
            Some(Color::rgb(0, 0, 0)),
        ))
        .outcome()
        .await
        .expect_err("two matches");
    assert!(matches!(
        err,
        TerminoError::AmbiguousSelector { matches: 2, .. }
    ));
    assert_eq!(fixture.text(), before);
    dispatcher.close().await;
}

struct Recorder {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl RemoteExecutor for Recorder {
    async fn forward(&self, command: &Command) -> Result<RemoteAck, TerminoError> {
        self.seen
            .lock()
            .expect("lock")
            .push(command.to_string());
        Ok(RemoteAck {
            summary: "queued remotely".to_string(),
        })
    }
}

#[tokio::test]
async fn out_of_process_forwards_in_order_and_leaves_file_alone() {
    let fixture = Fixture::new("forward");
    let recorder = Arc::new(Recorder {
        seen: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::out_of_process(recorder.clone());

    let mut tickets = set_commands(
        ColorRequest {
            tab_color: Some("red".into()),
            background: Some("black".into()),
            foreground: Some("white".into()),
        },
        ProfileSelector::Default,
    )
    .into_iter()
    .map(|command| dispatcher.submit(command))
    .collect::<Vec<_>>();
    tickets.push(dispatcher.submit(Command::undo(2).expect("count")));

    for ticket in tickets {
        assert!(matches!(
            ticket.outcome().await.expect("forwarded"),
            CommandOutcome::Forwarded(_)
        ));
    }
    dispatcher.close().await;

    assert_eq!(
        *recorder.seen.lock().expect("lock"),
        vec![
            "set tabColor of the default profile to #FF0000",
            "set background of the default profile to #000000",
            "set foreground of the default profile to #FFFFFF",
            "undo 2 commands",
        ]
    );
    assert_eq!(fixture.text(), SETTINGS);
}
