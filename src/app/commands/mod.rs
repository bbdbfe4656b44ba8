//! One handler per sub-command.
//!
//! Handlers report through a [`RenderSink`] and return `true` when every
//! command they issued succeeded.

pub(crate) mod daemon;
pub(crate) mod get;
pub(crate) mod set;
pub(crate) mod undo;

use termino::dispatch::Ticket;
use termino::ui::RenderSink;

/// Wait for each ticket in submission order and report its outcome.
pub(crate) async fn report_tickets(tickets: Vec<(String, Ticket)>, sink: &dyn RenderSink) -> bool {
    let mut ok = true;
    for (label, ticket) in tickets {
        match ticket.outcome().await {
            Ok(outcome) => sink.activity(&format!("{label}: {outcome}")),
            Err(err) => {
                sink.error(&format!("{label}: {err}"));
                ok = false;
            }
        }
    }
    ok
}
