//! `set` and `profile <SELECTOR> set`.

use termino::command::{ColorRequest, Command, CommandInfo};
use termino::dispatch::Dispatcher;
use termino::model::ProfileSelector;
use termino::ui::RenderSink;

use super::report_tickets;

const ATOMIC_DESCRIPTION: &str = "Sets several colors as one command";

/// Validate each color option, queue the valid ones and report results.
///
/// An invalid option is reported on its own and does not stop its siblings,
/// except with `atomic`, where nothing is queued unless every option is valid.
pub(crate) async fn run_set(
    dispatcher: &Dispatcher,
    request: &ColorRequest,
    selector: &ProfileSelector,
    atomic: bool,
    sink: &dyn RenderSink,
) -> bool {
    let results = match request.into_commands(selector) {
        Ok(results) => results,
        Err(err) => {
            sink.error(&err.to_string());
            return false;
        }
    };

    let mut valid = true;
    let mut commands = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(command) => commands.push(command),
            Err(err) => {
                sink.error(&err.to_string());
                valid = false;
            }
        }
    }

    if atomic {
        if !valid {
            sink.warn("nothing was changed: --atomic needs every color to be valid");
            return false;
        }
        commands = vec![Command::composite(
            CommandInfo::new("set", ATOMIC_DESCRIPTION),
            commands,
        )];
    }

    let tickets = commands
        .into_iter()
        .map(|command| {
            let label = command.to_string();
            (label, dispatcher.submit(command))
        })
        .collect::<Vec<_>>();
    report_tickets(tickets, sink).await && valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::testsink::{RecordingSink, SETTINGS};
    use std::path::Path;
    use std::sync::Arc;
    use termino::dispatch::InProcessExecutor;
    use termino::store::MemorySettingsStore;

    const PATH: &str = "/mem/settings.json";

    fn dispatcher() -> (Arc<MemorySettingsStore>, Dispatcher) {
        let store = Arc::new(MemorySettingsStore::new());
        store.insert(PATH, SETTINGS);
        let dispatcher = Dispatcher::in_process(InProcessExecutor::new(PATH, store.clone()));
        (store, dispatcher)
    }

    fn request(tab: Option<&str>, background: Option<&str>) -> ColorRequest {
        ColorRequest {
            tab_color: tab.map(str::to_string),
            background: background.map(str::to_string),
            foreground: None,
        }
    }

    #[tokio::test]
    async fn bad_option_is_reported_and_good_one_still_applies() {
        let (store, dispatcher) = dispatcher();
        let sink = RecordingSink::default();
        let ok = run_set(
            &dispatcher,
            &request(Some("notacolor"), Some("black")),
            &ProfileSelector::Default,
            false,
            &sink,
        )
        .await;
        assert!(!ok);
        assert_eq!(
            sink.lines_of("error"),
            vec!["tabColor: Cannot set an unknown color named 'notacolor' as the tab color"]
        );
        let text = store.contents(Path::new(PATH)).expect("document");
        assert!(text.contains("\"background\": \"#000000\""));
        assert_eq!(dispatcher.close().await.succeeded, 1);
    }

    #[tokio::test]
    async fn atomic_set_is_all_or_nothing() {
        let (store, dispatcher) = dispatcher();
        let sink = RecordingSink::default();
        let ok = run_set(
            &dispatcher,
            &request(Some("#12345"), Some("black")),
            &ProfileSelector::Default,
            true,
            &sink,
        )
        .await;
        assert!(!ok);
        assert_eq!(sink.lines_of("warn").len(), 1);
        assert_eq!(store.contents(Path::new(PATH)).as_deref(), Some(SETTINGS));

        let ok = run_set(
            &dispatcher,
            &request(Some("red"), Some("black")),
            &ProfileSelector::ByPosition(0),
            true,
            &sink,
        )
        .await;
        assert!(ok);
        let report = dispatcher.close().await;
        assert_eq!(report.succeeded, 1);
    }

    #[tokio::test]
    async fn unknown_profile_fails_the_invocation() {
        let (_, dispatcher) = dispatcher();
        let sink = RecordingSink::default();
        let ok = run_set(
            &dispatcher,
            &request(Some("red"), None),
            &ProfileSelector::ByName("Nonexistent".into()),
            false,
            &sink,
        )
        .await;
        assert!(!ok);
        let errors = sink.lines_of("error");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].ends_with("no profile matches name `Nonexistent`"), "{errors:?}");
        dispatcher.close().await;
    }
}
