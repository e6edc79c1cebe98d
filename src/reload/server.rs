//! Session listener: port binding and the handshake/accept thread.

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;

use super::message::decode_path;
use crate::actor::ws::Broadcaster;
use crate::core::StopSignal;
use crate::{debug, log};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Idle sleep between non-blocking accepts.
const ACCEPT_IDLE: Duration = Duration::from_millis(100);

/// A slow client must not hold the acceptor forever.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(2);

/// Bind `ip:base_port`, moving up one port at a time while busy.
pub fn bind(ip: IpAddr, base_port: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(ip, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                if actual_port != base_port {
                    log!("live"; "port {} busy, using {}", base_port, actual_port);
                }
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind live-update listener after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Accept connections until stopped, admitting each as a session.
pub fn spawn_acceptor(
    listener: TcpListener,
    broadcaster: Arc<Broadcaster>,
    endpoint: String,
    stop: StopSignal,
) -> Result<JoinHandle<()>> {
    listener
        .set_nonblocking(true)
        .context("failed to make live-update listener non-blocking")?;

    let handle = std::thread::Builder::new()
        .name("live-accept".into())
        .spawn(move || {
            while !stop.is_stopped() && !crate::core::is_shutdown() {
                match listener.accept() {
                    Ok((stream, addr)) => {
                        debug!("live"; "client connected: {}", addr);
                        if let Err(e) = admit(stream, &broadcaster, &endpoint) {
                            debug!("live"; "rejected {}: {:#}", addr, e);
                        }
                    }
                    Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                        std::thread::sleep(ACCEPT_IDLE);
                    }
                    Err(e) => {
                        log!("live"; "accept error: {}", e);
                        std::thread::sleep(ACCEPT_IDLE);
                    }
                }
            }
            debug!("live"; "acceptor stopped");
        })
        .context("failed to spawn live-update acceptor")?;

    Ok(handle)
}

/// Handshake one stream and hand it to the broadcaster.
fn admit(stream: TcpStream, broadcaster: &Broadcaster, endpoint: &str) -> Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;

    let mut route = None;
    let ws = tungstenite::accept_hdr(stream, |req: &Request, resp: Response| {
        match check_request(req, endpoint) {
            Ok(initial) => {
                route = initial;
                Ok(resp)
            }
            Err(status) => {
                let mut err = ErrorResponse::new(None);
                *err.status_mut() = status;
                Err(err)
            }
        }
    })
    .map_err(|e| anyhow::anyhow!("handshake failed: {}", e))?;

    ws.get_ref().set_read_timeout(None)?;
    ws.get_ref().set_nonblocking(true)?;
    broadcaster.connect(Box::new(ws), route);
    Ok(())
}

/// Accept only `<prefix>/front`; returns the `?path=` route if present.
fn check_request(req: &Request, endpoint: &str) -> Result<Option<String>, StatusCode> {
    if req.uri().path() != endpoint {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(req.uri().query().and_then(route_from_query))
}

fn route_from_query(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "path")
        .map(|(_, value)| decode_path(&value.replace('+', " ")))
        .filter(|path| !path.is_empty())
}
