//! HTTP response handlers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

const SVG: &str = "image/svg+xml";
const HTML: &str = "text/html; charset=utf-8";

/// Dev sprite documents change digest on every edit, so a long client cache
/// is safe.
const SPRITE_CACHE_CONTROL: &str = "max-age=100000";

/// Respond with a sprite document.
pub fn respond_sprite(request: Request, markup: String) -> Result<()> {
    let response = Response::from_string(markup)
        .with_header(make_header("Content-Type", SVG))
        .with_header(make_header("Cache-Control", SPRITE_CACHE_CONTROL));
    request.respond(response)?;
    Ok(())
}

/// Respond with an empty SVG document (unknown sprite name). Kept a 200 so
/// `<use>` references degrade to nothing instead of broken-image icons.
pub fn respond_empty_sprite(request: Request) -> Result<()> {
    let response = Response::from_string("<svg></svg>")
        .with_header(make_header("Content-Type", SVG));
    request.respond(response)?;
    Ok(())
}

/// Respond with the index page.
pub fn respond_index(request: Request, body: String) -> Result<()> {
    let response = Response::from_string(body).with_header(make_header("Content-Type", HTML));
    request.respond(response)?;
    Ok(())
}

/// Respond with plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    let response = Response::from_string("404 Not Found")
        .with_status_code(StatusCode(404))
        .with_header(make_header("Content-Type", "text/plain"));
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
