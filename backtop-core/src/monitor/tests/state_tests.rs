use super::{id, ms};
use crate::monitor::state::{Applied, IgnoreReason, SessionTable};
use crate::monitor::types::LogEvent;
use pretty_assertions::assert_eq;
use std::time::Instant;

fn open(table: &mut SessionTable, session: &str, backend: &str, now: Instant) {
    table.on_connection_open(id(session), backend.to_string(), now);
}

#[test]
fn open_index_tracks_opens_minus_matched_closes() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();

    open(&mut table, "1", "web1", t0);
    open(&mut table, "2", "web1", t0);
    open(&mut table, "3", "web2", t0);
    assert_eq!(table.open_count(), 3);

    assert_eq!(table.on_connection_close(&id("2"), t0), Ok(()));
    assert_eq!(table.open_count(), 2);

    // Unknown and already-closed ids do not decrement.
    assert_eq!(
        table.on_connection_close(&id("99"), t0),
        Err(IgnoreReason::UnknownSession)
    );
    assert_eq!(
        table.on_connection_close(&id("2"), t0),
        Err(IgnoreReason::UnknownSession)
    );
    assert_eq!(table.open_count(), 2);

    // Closed sessions stay retained until swept.
    assert_eq!(table.len(), 3);
    assert!(!table.is_open(&id("2")));
}

#[test]
fn close_sets_end_once() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();
    open(&mut table, "1", "web1", t0);

    table.on_connection_close(&id("1"), t0 + ms(10)).unwrap();
    let _ = table.on_connection_close(&id("1"), t0 + ms(20));

    let session = table.sessions().next().unwrap();
    assert_eq!(session.ended(), Some(t0 + ms(10)));
    assert!(!session.is_open());
}

#[test]
fn request_count_matches_starts_while_open() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();

    // Before the session exists.
    assert_eq!(
        table.on_request_start(&id("1"), t0),
        Err(IgnoreReason::UnknownSession)
    );

    open(&mut table, "1", "web1", t0);
    table.on_request_start(&id("1"), t0).unwrap();
    table.on_request_start(&id("1"), t0 + ms(5)).unwrap();
    table.on_connection_close(&id("1"), t0 + ms(6)).unwrap();

    // After close.
    assert_eq!(
        table.on_request_start(&id("1"), t0 + ms(7)),
        Err(IgnoreReason::UnknownSession)
    );

    let session = table.sessions().next().unwrap();
    assert_eq!(session.requests().len(), 2);
}

#[test]
fn updates_without_a_request_are_no_ops() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();
    open(&mut table, "1", "web1", t0);

    assert_eq!(
        table.on_request_url(&id("1"), "/".to_string()),
        Err(IgnoreReason::NoRequest)
    );
    assert_eq!(
        table.on_response_received(&id("1"), "200".to_string(), t0),
        Err(IgnoreReason::NoRequest)
    );
    assert!(table.sessions().next().unwrap().requests().is_empty());
}

#[test]
fn response_freezes_request_until_next_start() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();
    open(&mut table, "1", "web1", t0);

    table.on_request_start(&id("1"), t0).unwrap();
    table.on_request_url(&id("1"), "/a".to_string()).unwrap();
    table
        .on_response_received(&id("1"), "200".to_string(), t0 + ms(40))
        .unwrap();

    assert_eq!(
        table.on_response_received(&id("1"), "500".to_string(), t0 + ms(90)),
        Err(IgnoreReason::RequestFinished)
    );
    assert_eq!(
        table.on_request_url(&id("1"), "/b".to_string()),
        Err(IgnoreReason::RequestFinished)
    );

    {
        let request = &table.sessions().next().unwrap().requests()[0];
        assert_eq!(request.status(), Some("200"));
        assert_eq!(request.url(), Some("/a"));
        assert_eq!(request.ended(), Some(t0 + ms(40)));
    }

    // A new start opens a fresh request that takes updates again.
    table.on_request_start(&id("1"), t0 + ms(100)).unwrap();
    table.on_request_url(&id("1"), "/b".to_string()).unwrap();

    let requests = table.sessions().next().unwrap().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url(), Some("/a"));
    assert_eq!(requests[1].url(), Some("/b"));
    assert!(!requests[1].is_finished());
}

#[test]
fn apply_dispatches_events_and_reports_ignored_ones() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();

    let events = [
        LogEvent::ConnectionOpen {
            id: id("12"),
            backend: "web1".to_string(),
        },
        LogEvent::RequestStart { id: id("12") },
        LogEvent::RequestUrl {
            id: id("12"),
            url: "/index.html".to_string(),
        },
        LogEvent::RequestHeader {
            id: id("12"),
            name: "Host".to_string(),
            value: "example.com".to_string(),
        },
        LogEvent::ResponseReceived {
            id: id("12"),
            status: "200".to_string(),
        },
    ];
    for event in events {
        assert_eq!(table.apply(event, t0), Applied::Changed);
    }

    assert_eq!(
        table.apply(LogEvent::RequestStart { id: id("13") }, t0),
        Applied::Ignored(IgnoreReason::UnknownSession)
    );

    let session = table.get_open(&id("12")).unwrap();
    assert_eq!(session.backend(), "web1");
    assert_eq!(
        session.requests()[0].full_url().as_deref(),
        Some("example.com/index.html")
    );
}

#[test]
fn reopening_an_open_id_ends_the_stale_session() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();

    open(&mut table, "5", "web1", t0);
    open(&mut table, "5", "web2", t0 + ms(10));

    assert_eq!(table.len(), 2);
    assert_eq!(table.open_count(), 1);

    let sessions: Vec<_> = table.sessions().collect();
    assert_eq!(sessions[0].backend(), "web1");
    assert_eq!(sessions[0].ended(), Some(t0 + ms(10)));
    assert_eq!(sessions[1].backend(), "web2");
    assert!(sessions[1].is_open());

    // Events for the id now reach the new session.
    table.on_request_start(&id("5"), t0 + ms(20)).unwrap();
    assert_eq!(table.get_open(&id("5")).unwrap().requests().len(), 1);
    assert!(sessions_requests_empty(&table, 0));
}

fn sessions_requests_empty(table: &SessionTable, index: usize) -> bool {
    table
        .sessions()
        .nth(index)
        .is_some_and(|s| s.requests().is_empty())
}

#[test]
fn id_can_be_reused_after_close() {
    let t0 = Instant::now();
    let mut table = SessionTable::new();

    open(&mut table, "5", "web1", t0);
    table.on_connection_close(&id("5"), t0 + ms(1)).unwrap();
    open(&mut table, "5", "web1", t0 + ms(2));

    assert_eq!(table.len(), 2);
    assert_eq!(table.open_count(), 1);
    assert_eq!(table.get_open(&id("5")).unwrap().started(), t0 + ms(2));
}
