use crate::monitor::types::{LogEvent, SessionId};
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Stable handle for a retained session. Handles are handed out in increasing
/// order, so ordering by handle is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub(crate) started: Instant,
    pub(crate) ended: Option<Instant>,
    pub(crate) host: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) status: Option<String>,
}

impl Request {
    fn new(now: Instant) -> Self {
        Self {
            started: now,
            ended: None,
            host: None,
            url: None,
            status: None,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn ended(&self) -> Option<Instant> {
        self.ended
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.ended.is_some()
    }

    /// Live while in progress, fixed once the response has arrived.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.ended {
            Some(end) => end.saturating_duration_since(self.started),
            None => now.saturating_duration_since(self.started),
        }
    }

    /// Host and url joined, or `None` unless both are known.
    pub fn full_url(&self) -> Option<String> {
        match (&self.host, &self.url) {
            (Some(host), Some(url)) => Some(format!("{host}{url}")),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) started: Instant,
    pub(crate) ended: Option<Instant>,
    pub(crate) backend: String,
    pub(crate) requests: Vec<Request>,
}

impl Session {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn ended(&self) -> Option<Instant> {
        self.ended
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn is_open(&self) -> bool {
        self.ended.is_none()
    }
}

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The id is not open. Usually a session that began before we attached.
    UnknownSession,
    /// The session has no request to update.
    NoRequest,
    /// The current request already has its response.
    RequestFinished,
}

impl From<Result<(), IgnoreReason>> for Applied {
    fn from(result: Result<(), IgnoreReason>) -> Self {
        match result {
            Ok(()) => Applied::Changed,
            Err(reason) => Applied::Ignored(reason),
        }
    }
}

/// All retained sessions plus an index of the open ones.
///
/// `sessions` is the only owner. `open` maps an id to the handle of its open
/// session and holds exactly the sessions whose end is unset.
#[derive(Debug, Default)]
pub struct SessionTable {
    pub(crate) sessions: BTreeMap<SessionKey, Session>,
    open: AHashMap<SessionId, SessionKey>,
    next_key: u64,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: LogEvent, now: Instant) -> Applied {
        match event {
            LogEvent::ConnectionOpen { id, backend } => {
                self.on_connection_open(id, backend, now);
                Applied::Changed
            }
            LogEvent::ConnectionClose { id } => self.on_connection_close(&id, now).into(),
            LogEvent::RequestStart { id } => self.on_request_start(&id, now).into(),
            LogEvent::RequestUrl { id, url } => self.on_request_url(&id, url).into(),
            LogEvent::RequestHeader { id, value, .. } => self.on_request_host(&id, value).into(),
            LogEvent::ResponseReceived { id, status } => {
                self.on_response_received(&id, status, now).into()
            }
        }
    }

    pub fn on_connection_open(&mut self, id: SessionId, backend: String, now: Instant) {
        // An id that is still open was never closed in the stream. End the
        // stale session so the sweeper can evict it.
        if self.on_connection_close(&id, now).is_ok() {
            tracing::debug!(session = %id, "session reopened before close, ending stale entry");
        }

        let key = SessionKey(self.next_key);
        self.next_key += 1;

        self.sessions.insert(
            key,
            Session {
                id: id.clone(),
                started: now,
                ended: None,
                backend,
                requests: Vec::new(),
            },
        );
        self.open.insert(id, key);
    }

    pub fn on_connection_close(&mut self, id: &SessionId, now: Instant) -> Result<(), IgnoreReason> {
        let key = self.open.remove(id).ok_or(IgnoreReason::UnknownSession)?;
        if let Some(session) = self.sessions.get_mut(&key) {
            session.ended = Some(now);
        }
        Ok(())
    }

    pub fn on_request_start(&mut self, id: &SessionId, now: Instant) -> Result<(), IgnoreReason> {
        let session = self.open_session_mut(id)?;
        session.requests.push(Request::new(now));
        Ok(())
    }

    pub fn on_request_url(&mut self, id: &SessionId, url: String) -> Result<(), IgnoreReason> {
        self.current_request_mut(id)?.url = Some(url);
        Ok(())
    }

    pub fn on_request_host(&mut self, id: &SessionId, host: String) -> Result<(), IgnoreReason> {
        self.current_request_mut(id)?.host = Some(host);
        Ok(())
    }

    pub fn on_response_received(
        &mut self,
        id: &SessionId,
        status: String,
        now: Instant,
    ) -> Result<(), IgnoreReason> {
        let request = self.current_request_mut(id)?;
        request.status = Some(status);
        request.ended = Some(now);
        Ok(())
    }

    /// Retained sessions in insertion order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, id: &SessionId) -> bool {
        self.open.contains_key(id)
    }

    /// The open session for `id`, if any.
    pub fn get_open(&self, id: &SessionId) -> Option<&Session> {
        self.open.get(id).and_then(|key| self.sessions.get(key))
    }

    fn open_session_mut(&mut self, id: &SessionId) -> Result<&mut Session, IgnoreReason> {
        let key = self.open.get(id).ok_or(IgnoreReason::UnknownSession)?;
        self.sessions
            .get_mut(key)
            .ok_or(IgnoreReason::UnknownSession)
    }

    /// Only the newest request of a session is ever updated, and only until
    /// its response arrives.
    fn current_request_mut(&mut self, id: &SessionId) -> Result<&mut Request, IgnoreReason> {
        let request = self
            .open_session_mut(id)?
            .requests
            .last_mut()
            .ok_or(IgnoreReason::NoRequest)?;

        if request.is_finished() {
            return Err(IgnoreReason::RequestFinished);
        }
        Ok(request)
    }
}
