//! Application entry orchestration for the termino CLI.

use termino::config::load_config;
use termino::config::Config;
use termino::dispatch::Dispatcher;
use termino::model::ProfileSelector;
use termino::store::FileSettingsStore;
use termino::ui::{RenderSink, Renderer};
use tracing::debug;

use crate::app::commands::{daemon, get, set, undo};
use crate::app::startup::{apply_cli_overrides, build_dispatcher, init_tracing, settings_path};
use crate::cli::{Args, Command, ProfileAction};

/// Run one invocation; `true` means every command succeeded.
pub(crate) async fn run(args: Args) -> bool {
    let loaded = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return false;
        }
    };
    let mut config = loaded.config;
    apply_cli_overrides(&mut config, &args);
    init_tracing(&config.log.filter);
    debug!(source = ?loaded.source, mode = %config.run.mode, "config loaded");

    let renderer = Renderer::new(config.display.color);
    execute(args.command, &config, &renderer).await
}

async fn execute(command: Command, config: &Config, sink: &dyn RenderSink) -> bool {
    match command {
        Command::Get => show(config, None, sink),
        Command::Set(set_args) => {
            let Some(dispatcher) = open_dispatcher(config, sink) else {
                return false;
            };
            let ok = set::run_set(
                &dispatcher,
                &set_args.color_request(),
                &ProfileSelector::Default,
                set_args.atomic,
                sink,
            )
            .await;
            finish(dispatcher).await && ok
        }
        Command::Undo { count } => {
            let Some(dispatcher) = open_dispatcher(config, sink) else {
                return false;
            };
            let ok = undo::run_undo(&dispatcher, count as usize, sink).await;
            finish(dispatcher).await && ok
        }
        Command::Profile { selector, action } => {
            let selector = match selector.parse::<ProfileSelector>() {
                Ok(selector) => selector,
                Err(msg) => {
                    sink.error(&format!("profile: {msg}"));
                    return false;
                }
            };
            match action {
                ProfileAction::Get => show(config, Some(&selector), sink),
                ProfileAction::Set(set_args) => {
                    let Some(dispatcher) = open_dispatcher(config, sink) else {
                        return false;
                    };
                    let ok = set::run_set(
                        &dispatcher,
                        &set_args.color_request(),
                        &selector,
                        set_args.atomic,
                        sink,
                    )
                    .await;
                    finish(dispatcher).await && ok
                }
            }
        }
        Command::Daemon { listen } => {
            let path = match settings_path(config) {
                Ok(path) => path,
                Err(err) => {
                    sink.error(&err.to_string());
                    return false;
                }
            };
            let address = listen.unwrap_or_else(|| config.daemon.address.clone());
            daemon::run_daemon(path, &address, sink).await
        }
    }
}

/// `get` always reads the local file, whatever the run mode.
fn show(config: &Config, selector: Option<&ProfileSelector>, sink: &dyn RenderSink) -> bool {
    match settings_path(config) {
        Ok(path) => get::run_get(&path, &FileSettingsStore, selector, sink),
        Err(err) => {
            sink.error(&err.to_string());
            false
        }
    }
}

fn open_dispatcher(config: &Config, sink: &dyn RenderSink) -> Option<Dispatcher> {
    match build_dispatcher(config) {
        Ok(dispatcher) => Some(dispatcher),
        Err(err) => {
            sink.error(&err.to_string());
            None
        }
    }
}

/// Close the queue; `false` if anything it ran failed.
async fn finish(dispatcher: Dispatcher) -> bool {
    let report = dispatcher.close().await;
    debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        halted = report.halted.is_some(),
        "queue closed"
    );
    report.failed == 0 && report.halted.is_none()
}
