//! One browser connection and its liveness.

use std::io::ErrorKind;
use std::net::TcpStream;

use thiserror::Error;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::reload::message::parse_page_message;

/// Why a session can no longer be used.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<tungstenite::Error> for SessionError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::Closed
            }
            tungstenite::Error::Io(e) => Self::Io(e),
            other => Self::Protocol(other.to_string()),
        }
    }
}

/// A frame of interest read from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Answer to a liveness probe.
    Pong,
    /// The browser now shows this (decoded) path.
    Route(String),
    /// Anything else; it still proves the peer is there.
    Other,
}

/// Transport under a session. Every method must return promptly.
pub trait Connection: Send {
    fn send_text(&mut self, text: &str) -> Result<(), SessionError>;

    fn send_ping(&mut self) -> Result<(), SessionError>;

    /// Read one pending frame, `Ok(None)` if nothing has arrived.
    fn poll(&mut self) -> Result<Option<Inbound>, SessionError>;

    fn close(&mut self);

    fn peer(&self) -> String;
}

fn is_would_block(err: &tungstenite::Error) -> bool {
    matches!(err, tungstenite::Error::Io(e) if e.kind() == ErrorKind::WouldBlock)
}

/// Non-blocking tungstenite socket.
///
/// A send that would block stays queued inside tungstenite and is flushed
/// by the next write or read.
impl Connection for WebSocket<TcpStream> {
    fn send_text(&mut self, text: &str) -> Result<(), SessionError> {
        match self.send(Message::Text(text.to_owned().into())) {
            Err(e) if !is_would_block(&e) => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn send_ping(&mut self) -> Result<(), SessionError> {
        match self.send(Message::Ping(Default::default())) {
            Err(e) if !is_would_block(&e) => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn poll(&mut self) -> Result<Option<Inbound>, SessionError> {
        match self.read() {
            Ok(Message::Text(text)) => Ok(Some(
                parse_page_message(text.as_str()).map_or(Inbound::Other, Inbound::Route),
            )),
            Ok(Message::Pong(_)) => Ok(Some(Inbound::Pong)),
            Ok(Message::Close(_)) => Err(SessionError::Closed),
            Ok(_) => Ok(Some(Inbound::Other)),
            Err(e) if is_would_block(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) {
        let _ = self.close(None);
        let _ = self.flush();
    }

    fn peer(&self) -> String {
        self.get_ref()
            .peer_addr()
            .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string())
    }
}

/// Liveness of a session between heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Answered the last probe, or has not been probed yet.
    Alive,
    /// Probed, no answer yet.
    Suspect,
}

pub type SessionId = u64;

/// A connected browser: its transport, what it shows, whether it answers.
pub struct Session {
    pub id: SessionId,
    pub route: Option<String>,
    pub liveness: Liveness,
    conn: Box<dyn Connection>,
}

impl Session {
    pub fn new(id: SessionId, conn: Box<dyn Connection>, route: Option<String>) -> Self {
        Self {
            id,
            route,
            liveness: Liveness::Alive,
            conn,
        }
    }

    pub fn send(&mut self, text: &str) -> Result<(), SessionError> {
        self.conn.send_text(text)
    }

    /// Ping and mark suspect until the pong comes back.
    pub fn probe(&mut self) -> Result<(), SessionError> {
        self.conn.send_ping()?;
        self.liveness = Liveness::Suspect;
        Ok(())
    }

    /// Drain every pending frame. Returns whether the route changed.
    pub fn pump(&mut self) -> Result<bool, SessionError> {
        let mut route_changed = false;
        while let Some(frame) = self.conn.poll()? {
            self.liveness = Liveness::Alive;
            if let Inbound::Route(route) = frame
                && self.route.as_deref() != Some(route.as_str())
            {
                self.route = Some(route);
                route_changed = true;
            }
        }
        Ok(route_changed)
    }

    pub fn close(&mut self) {
        self.conn.close();
    }

    pub fn peer(&self) -> String {
        self.conn.peer()
    }
}
