//! HTTP responses over tiny_http.

use std::fs;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::view::Reply;
use crate::utils::mime::{self, types};

/// Send a [`Reply`], answering HEAD requests with headers only.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    match reply {
        Reply::Html { status, body } => send_body(request, status, types::HTML, body.into_bytes()),
        Reply::File(path) => {
            let content_type = mime::from_path(&path);
            if is_head_request(&request) {
                return send_head(request, 200, content_type);
            }
            let body =
                fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
            send_body(request, 200, content_type, body)
        }
        Reply::Redirect(location) => {
            let mut response = Response::empty(StatusCode(307));
            if let Some(header) = make_header("Location", location.as_bytes()) {
                response.add_header(header);
            }
            request.respond(response)?;
            Ok(())
        }
        Reply::NotFound => send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec()),
    }
}

/// Respond with 503 Service Unavailable (first scan pending or shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let mut response = Response::empty(StatusCode(status));
    if let Some(header) = make_header("Content-Type", content_type.as_bytes()) {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, status, content_type);
    }
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    if let Some(header) = make_header("Content-Type", content_type.as_bytes()) {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &[u8]) -> Option<Header> {
    Header::from_bytes(key.as_bytes(), value).ok()
}
