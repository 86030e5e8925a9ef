//! Graceful teardown of the scheduling loop.

use crate::chat::ChatSession;
use crate::scheduler::SchedulerState;
use std::sync::Arc;

/// Farewell sent to the channel on shutdown.
const FAREWELL: &str = "sergeSnerge Sleepy time!";

/// Stop the scheduler and close the session.
///
/// Sets the stopped flag and clears the pending-timer slot, so no further
/// tick fires. If a session is connected, a farewell is sent; a failed
/// farewell never blocks the close, which is unconditional. Idempotent:
/// a second call finds the stopped flag set and does nothing more.
pub async fn shutdown(state: &mut SchedulerState, session: Option<&Arc<dyn ChatSession>>) {
    if state.stopped {
        return;
    }

    tracing::info!("shutting down");
    state.stopped = true;
    state.cancel();

    if let Some(session) = session {
        if let Err(e) = session.send(FAREWELL).await {
            tracing::warn!(error = %e, "farewell send failed");
        }
        session.close().await;
    }
}
