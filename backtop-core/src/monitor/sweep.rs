use crate::monitor::state::SessionTable;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub sessions_removed: usize,
    pub requests_removed: usize,
}

/// Drop sessions and requests that ended more than `retention` ago.
///
/// A session is kept or dropped on its own end time only; emptying its
/// request list does not remove it.
pub fn sweep(table: &mut SessionTable, now: Instant, retention: Duration) -> SweepStats {
    let expired = |ended: Option<Instant>| {
        ended.is_some_and(|end| now.saturating_duration_since(end) > retention)
    };

    let mut stats = SweepStats::default();

    table.sessions.retain(|_, session| {
        if expired(session.ended) {
            stats.sessions_removed += 1;
            return false;
        }

        let before = session.requests.len();
        session.requests.retain(|request| !expired(request.ended));
        stats.requests_removed += before - session.requests.len();

        true
    });

    if stats != SweepStats::default() {
        tracing::debug!(
            sessions_removed = stats.sessions_removed,
            requests_removed = stats.requests_removed,
            retained = table.len(),
            "sweep"
        );
    }

    stats
}
