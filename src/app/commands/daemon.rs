//! `daemon`: serve out-of-process clients until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use termino::daemon::Daemon;
use termino::dispatch::InProcessExecutor;
use termino::store::FileSettingsStore;
use termino::ui::RenderSink;

pub(crate) async fn run_daemon(path: PathBuf, address: &str, sink: &dyn RenderSink) -> bool {
    let executor = InProcessExecutor::new(path.clone(), Arc::new(FileSettingsStore));
    let daemon = match Daemon::bind(address, executor).await {
        Ok(daemon) => daemon,
        Err(err) => {
            sink.error(&format!("cannot listen on {address}: {err}"));
            return false;
        }
    };
    let listening = daemon
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| address.to_string());
    sink.activity(&format!(
        "serving `{}` on {listening}; press Ctrl-C to stop",
        path.display()
    ));

    let report = daemon
        .serve_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    sink.activity(&format!(
        "stopped after {} succeeded and {} failed command(s)",
        report.succeeded, report.failed
    ));
    match report.halted {
        Some(reason) => {
            sink.error(&reason);
            false
        }
        None => true,
    }
}
