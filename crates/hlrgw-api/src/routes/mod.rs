pub mod chat;
pub mod health;

use crate::state::AppState;
use hlrgw_types::UsageSnapshot;

/// Fresh usage read for attaching to a response.
///
/// Always taken at response time, not admission time, so it can differ from
/// the value the admission decision saw. A failing store degrades to a zero
/// count rather than masking the response itself.
pub(crate) async fn usage_snapshot(state: &AppState) -> UsageSnapshot {
    match state.ledger.peek().await {
        Ok(usage) => UsageSnapshot::new(usage.count, usage.cap),
        Err(err) => {
            tracing::error!(%err, "usage store unavailable");
            UsageSnapshot::new(0, state.ledger.cap())
        }
    }
}
