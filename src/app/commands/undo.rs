//! `undo [N]`.

use termino::command::Command;
use termino::dispatch::Dispatcher;
use termino::ui::RenderSink;

use super::report_tickets;

pub(crate) async fn run_undo(dispatcher: &Dispatcher, count: usize, sink: &dyn RenderSink) -> bool {
    let command = match Command::undo(count) {
        Ok(command) => command,
        Err(err) => {
            sink.error(&err.to_string());
            return false;
        }
    };
    let label = command.to_string();
    report_tickets(vec![(label, dispatcher.submit(command))], sink).await
}
