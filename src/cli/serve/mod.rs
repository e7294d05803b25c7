//! Development server exposing current sprite documents over HTTP.
//!
//! Every sprite is reachable under [`SPRITE_ROUTE`] as
//! `sprite.<name>.<digest>.svg`. The digest in the request is advisory; the
//! response is always the current document for `<name>`, composed on demand.

mod response;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tiny_http::{Request, Server};

use crate::config::ProjectConfig;
use crate::log;
use crate::sprite::{Collector, SPRITE_ROUTE};
use crate::watch;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(
    interface: std::net::IpAddr,
    base_port: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Start the dev server (blocking until Ctrl+C).
pub fn run(config: ProjectConfig) -> Result<()> {
    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let shutdown = Arc::new(AtomicBool::new(false));

    {
        let server = Arc::clone(&server);
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::SeqCst);
            server.unblock();
        })
        .context("Failed to install Ctrl+C handler")?;
    }

    let mut collector = Collector::new(&config, true);
    collector.init();
    let collector = Arc::new(RwLock::new(collector));

    let watch_handle = config.serve.watch.then(|| {
        let root = config.source_root().to_path_buf();
        let collector = Arc::clone(&collector);
        let shutdown = Arc::clone(&shutdown);
        thread::spawn(move || {
            if let Err(e) = watch::run(&root, &collector, &shutdown) {
                log!("watch"; "error: {e:#}");
            }
        })
    });

    log!("serve"; "http://{addr}");

    for request in server.incoming_requests() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        if let Err(e) = handle_request(request, &collector) {
            log!("serve"; "request error: {e}");
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    if let Some(handle) = watch_handle {
        let _ = handle.join();
    }

    log!("serve"; "shutting down");
    Ok(())
}

/// Handle a single HTTP request.
fn handle_request(request: Request, collector: &RwLock<Collector>) -> Result<()> {
    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or(&url);

    if let Some(rest) = path.strip_prefix(SPRITE_ROUTE) {
        let Some(name) = parse_sprite_file(rest.trim_start_matches('/')) else {
            return response::respond_empty_sprite(request);
        };

        let collector = collector.read();
        return match collector.sprite(&name) {
            Some(sprite) => response::respond_sprite(request, sprite.get_sprite().markup.clone()),
            None => response::respond_empty_sprite(request),
        };
    }

    if path == "/" {
        return response::respond_index(request, index_page(&collector.read()));
    }

    response::respond_not_found(request)
}

/// Parse `sprite.<name>.<digest>.svg` into the sprite name.
///
/// Sprite names cannot contain `.`, so the dot count is fixed.
fn parse_sprite_file(file: &str) -> Option<String> {
    match file.split('.').collect::<Vec<_>>().as_slice() {
        ["sprite", name, _digest, "svg"] if !name.is_empty() => Some((*name).to_string()),
        _ => None,
    }
}

/// Minimal index listing every sprite and its current endpoint.
fn index_page(collector: &Collector) -> String {
    let mut items = String::new();
    for sprite in collector.sprites() {
        let file = sprite.dev_file_name();
        let count = sprite.len();
        items.push_str(&format!(
            "<li><a href=\"{SPRITE_ROUTE}/{file}\">{}</a> ({count} symbol{})</li>\n",
            sprite.name,
            if count == 1 { "" } else { "s" }
        ));
    }

    format!(
        "<!DOCTYPE html><html><head><title>spriteforge</title></head>\
         <body><h1>Sprites</h1><ul>\n{items}</ul></body></html>"
    )
}
