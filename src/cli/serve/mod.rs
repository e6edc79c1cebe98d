//! Wiki HTTP server with live page updates.

mod lifecycle;
mod response;
mod route;
mod view;

use crate::{
    actor::{Coordinator, ws::Broadcaster},
    config::WikiConfig,
    content::{ContentStore, Scanner},
    core::register_server,
    debug, log,
    reload,
    vcs::{Git, HistoryExtractor},
};
use anyhow::{Context, Result};
use crossbeam::channel;
use route::Route;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Request worker threads.
const REQUEST_THREADS: usize = 4;

/// Everything a request handler reads.
pub struct ServeContext {
    pub config: Arc<WikiConfig>,
    pub store: Arc<ContentStore>,
    pub history: HistoryExtractor,
    /// Port the live-update listener actually bound.
    pub ws_port: u16,
}

impl ServeContext {
    fn prefix(&self) -> &str {
        &self.config.serve.prefix
    }
}

/// Bound listeners, ready to serve.
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    ws_listener: TcpListener,
    ws_port: u16,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server and the live-update listener.
///
/// Both ports are taken before anything else starts, so the pages always
/// embed the port the session listener really has.
pub fn bind_server(config: &WikiConfig) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.listen)?;
    let server = Arc::new(server);

    let (ws_listener, ws_port) = reload::server::bind(config.serve.listen.ip(), config.serve.ws_port)
        .context("failed to bind live-update listener")?;
    debug!("live"; "ws://{}:{}{}/front", addr.ip(), ws_port, config.serve.prefix);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}{}/", addr, config.serve.prefix);

    Ok(BoundServer {
        server,
        addr,
        ws_listener,
        ws_port,
        shutdown_rx,
    })
}

impl BoundServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the actors and the request loop (blocking until shutdown).
    pub fn run(self, config: Arc<WikiConfig>, scanner: Arc<Scanner>, store: Arc<ContentStore>) -> Result<()> {
        let broadcaster = Arc::new(Broadcaster::new(
            Arc::clone(&store),
            config.serve.prefix.clone(),
        ));
        let coordinator = Coordinator::new(
            Arc::clone(&config),
            Arc::clone(&scanner),
            Arc::clone(&store),
            broadcaster,
        )
        .with_listener(self.ws_listener)
        .with_shutdown_signal(self.shutdown_rx);
        let actor_handle = lifecycle::spawn_actors(coordinator);

        let ctx = Arc::new(ServeContext {
            history: HistoryExtractor::new(Git::for_root(config.git.program(), scanner.root())),
            config,
            store,
            ws_port: self.ws_port,
        });
        run_request_loop(&self.server, ctx)?;

        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server, ctx: Arc<ServeContext>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .thread_name(|i| format!("http-{i}"))
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, ctx: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() || !crate::core::is_ready() {
        return response::respond_unavailable(request);
    }

    let route = Route::parse(request.url(), ctx.prefix());
    debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);
    response::send(request, view::respond(route, ctx))
}
