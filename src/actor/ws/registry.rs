//! The set of live sessions, behind one lock.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::session::{Connection, Liveness, Session, SessionError, SessionId};
use crate::debug;

/// Owns every connected session.
///
/// All mutation and every send pass happen under a single lock, so a
/// broadcast always sees one consistent set. The sessions themselves are
/// never handed out.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<Vec<Session>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a session after sending it `initial(route)`.
    ///
    /// `initial` runs and its result is sent under the lock, so a broadcast
    /// either happens before `initial` reads its content or reaches the
    /// registered session afterwards.
    pub fn admit(
        &self,
        conn: Box<dyn Connection>,
        route: Option<String>,
        initial: impl FnOnce(Option<&str>) -> Option<String>,
    ) -> Result<SessionId, SessionError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut session = Session::new(id, conn, route);

        let mut sessions = self.sessions.lock();
        if let Some(text) = initial(session.route.as_deref()) {
            session.send(&text)?;
        }
        debug!("ws"; "session {} from {} (total: {})", id, session.peer(), sessions.len() + 1);
        sessions.push(session);
        Ok(id)
    }

    /// Send each session its own message; failed sessions are dropped.
    ///
    /// `render` sees the session's route and may return `None` to skip it.
    /// Returns how many sessions were sent to.
    pub fn send_each(&self, mut render: impl FnMut(Option<&str>) -> Option<String>) -> usize {
        let mut sessions = self.sessions.lock();
        let mut sent = 0;
        sessions.retain_mut(|session| {
            let Some(text) = render(session.route.as_deref()) else {
                return true;
            };
            match session.send(&text) {
                Ok(()) => {
                    sent += 1;
                    true
                }
                Err(e) => {
                    crate::log!("ws"; "dropping session {}: {}", session.id, e);
                    false
                }
            }
        });
        sent
    }

    /// Ping every session and mark it suspect.
    pub fn probe(&self) -> usize {
        let mut sessions = self.sessions.lock();
        sessions.retain_mut(|session| match session.probe() {
            Ok(()) => true,
            Err(e) => {
                debug!("ws"; "session {} unreachable: {}", session.id, e);
                false
            }
        });
        sessions.len()
    }

    /// Read pending frames from every session (routes, pongs, closes).
    ///
    /// Returns the ids whose route changed.
    pub fn poll_inbound(&self) -> Vec<SessionId> {
        let mut sessions = self.sessions.lock();
        let mut changed = Vec::new();
        sessions.retain_mut(|session| match session.pump() {
            Ok(route_changed) => {
                if route_changed {
                    debug!("ws"; "session {} now on {:?}", session.id, session.route);
                    changed.push(session.id);
                }
                true
            }
            Err(e) => {
                debug!("ws"; "session {} gone: {}", session.id, e);
                false
            }
        });
        changed
    }

    /// Evict every session still suspect since the last probe.
    pub fn reap_unresponsive(&self) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain_mut(|session| {
            if session.liveness == Liveness::Suspect {
                crate::log!("ws"; "evicting unresponsive session {} ({})", session.id, session.peer());
                session.close();
                false
            } else {
                true
            }
        });
        before - sessions.len()
    }

    /// Send one session its own message (after its route changed).
    pub fn send_to(&self, id: SessionId, render: impl FnOnce(Option<&str>) -> Option<String>) {
        let mut sessions = self.sessions.lock();
        let Some(pos) = sessions.iter().position(|s| s.id == id) else {
            return;
        };
        let Some(text) = render(sessions[pos].route.as_deref()) else {
            return;
        };
        if let Err(e) = sessions[pos].send(&text) {
            crate::log!("ws"; "dropping session {}: {}", id, e);
            sessions.remove(pos);
        }
    }

    /// Close and forget every session.
    pub fn close_all(&self) {
        let mut sessions = self.sessions.lock();
        for mut session in sessions.drain(..) {
            session.close();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::actor::ws::session::Inbound;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Shared view into a [`MockConnection`] for assertions.
    #[derive(Default)]
    pub struct MockState {
        pub sent: Vec<String>,
        pub pings: usize,
        pub inbound: VecDeque<Inbound>,
        pub fail_send: bool,
        pub closed: bool,
        pub answer_pings: bool,
    }

    pub struct MockConnection(pub Arc<parking_lot::Mutex<MockState>>);

    impl MockConnection {
        pub fn new() -> (Box<dyn Connection>, Arc<parking_lot::Mutex<MockState>>) {
            let state = Arc::new(parking_lot::Mutex::new(MockState::default()));
            (Box::new(Self(Arc::clone(&state))), state)
        }
    }

    impl Connection for MockConnection {
        fn send_text(&mut self, text: &str) -> Result<(), SessionError> {
            let mut state = self.0.lock();
            if state.fail_send {
                return Err(SessionError::Closed);
            }
            state.sent.push(text.to_owned());
            Ok(())
        }

        fn send_ping(&mut self) -> Result<(), SessionError> {
            let mut state = self.0.lock();
            if state.fail_send {
                return Err(SessionError::Closed);
            }
            state.pings += 1;
            if state.answer_pings {
                state.inbound.push_back(Inbound::Pong);
            }
            Ok(())
        }

        fn poll(&mut self) -> Result<Option<Inbound>, SessionError> {
            Ok(self.0.lock().inbound.pop_front())
        }

        fn close(&mut self) {
            self.0.lock().closed = true;
        }

        fn peer(&self) -> String {
            "mock".to_owned()
        }
    }

    fn echo_route(route: Option<&str>) -> Option<String> {
        Some(route.unwrap_or("/").to_owned())
    }

    #[test]
    fn test_admit_sends_initial_content() {
        let registry = SessionRegistry::new();
        let (conn, state) = MockConnection::new();

        registry.admit(conn, Some("/Foo".into()), echo_route).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(state.lock().sent, vec!["/Foo"]);
    }

    #[test]
    fn test_admit_failure_is_not_registered() {
        let registry = SessionRegistry::new();
        let (conn, state) = MockConnection::new();
        state.lock().fail_send = true;

        assert!(registry.admit(conn, None, echo_route).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_send_only_drops_that_session() {
        let registry = SessionRegistry::new();
        let (a, state_a) = MockConnection::new();
        let (b, state_b) = MockConnection::new();
        registry.admit(a, None, |_| None).unwrap();
        registry.admit(b, None, |_| None).unwrap();

        state_a.lock().fail_send = true;
        let sent = registry.send_each(|_| Some("update".into()));

        assert_eq!(sent, 1);
        assert_eq!(registry.len(), 1);
        assert!(state_a.lock().sent.is_empty());
        assert_eq!(state_b.lock().sent, vec!["update"]);
    }

    #[test]
    fn test_heartbeat_evicts_silent_sessions() {
        let registry = SessionRegistry::new();
        let (alive, alive_state) = MockConnection::new();
        let (silent, silent_state) = MockConnection::new();
        alive_state.lock().answer_pings = true;
        registry.admit(alive, None, |_| None).unwrap();
        registry.admit(silent, None, |_| None).unwrap();

        assert_eq!(registry.probe(), 2);
        registry.poll_inbound();
        assert_eq!(registry.reap_unresponsive(), 1);

        assert_eq!(registry.len(), 1);
        assert!(silent_state.lock().closed);
        assert!(!alive_state.lock().closed);
        assert_eq!(alive_state.lock().pings, 1);
    }

    #[test]
    fn test_route_updates() {
        let registry = SessionRegistry::new();
        let (conn, state) = MockConnection::new();
        let id = registry.admit(conn, None, |_| None).unwrap();

        state.lock().inbound.push_back(Inbound::Route("/Bar".into()));
        assert_eq!(registry.poll_inbound(), vec![id]);
        // Same route again is not a change.
        state.lock().inbound.push_back(Inbound::Route("/Bar".into()));
        assert!(registry.poll_inbound().is_empty());

        registry.send_to(id, echo_route);
        assert_eq!(state.lock().sent, vec!["/Bar"]);
    }

    #[test]
    fn test_close_all() {
        let registry = SessionRegistry::new();
        let (conn, state) = MockConnection::new();
        registry.admit(conn, None, |_| None).unwrap();

        registry.close_all();
        assert!(registry.is_empty());
        assert!(state.lock().closed);
    }
}
