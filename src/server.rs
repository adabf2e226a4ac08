use std::io;

use chrono::Utc;
use tiny_http::{Header, Method, Response, Server};
use url::form_urlencoded;

use crate::{compute_progress, parse_page, PageError, PageSource, ProgressResponse, SectionTable};

pub(crate) struct ServerState {
    pub(crate) table: SectionTable,
    pub(crate) source: Option<Box<dyn PageSource>>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct Reply {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: String,
}

impl Reply {
    fn json(status: u16, value: &impl serde::Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => Self::error(500, &format!("serialize: {e}")),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.to_string(),
        }
    }
}

pub(crate) fn run_server(
    state: ServerState,
    bind: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{bind}:{port}");
    let server = Server::http(&addr)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("server: {e}")))?;
    tracing::info!("listening on http://{addr}");

    for request in server.incoming_requests() {
        let reply = route(request.method(), request.url(), &state);
        tracing::info!(
            method = %request.method(),
            url = request.url(),
            status = reply.status,
            "request"
        );
        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
            response.add_header(header);
        }
        if let Err(e) = request.respond(response) {
            tracing::warn!("respond failed: {e}");
        }
    }
    Ok(())
}

pub(crate) fn route(method: &Method, url: &str, state: &ServerState) -> Reply {
    if *method != Method::Get {
        return Reply::error(405, "method not allowed");
    }
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };
    match path.trim_end_matches('/') {
        "/health" => Reply::text(200, "ok"),
        "/sections" => Reply::json(200, &state.table),
        "" | "/progress" => progress_reply(query, state),
        _ => Reply::error(404, "not found"),
    }
}

fn progress_reply(query: &str, state: &ServerState) -> Reply {
    let (page, source) = match resolve_page(query, state) {
        Ok(resolved) => resolved,
        Err((status, e)) => {
            tracing::warn!("page unavailable: {e}");
            return Reply::error(status, &e.to_string());
        }
    };
    let report = compute_progress(page, &state.table);
    Reply::json(
        200,
        &ProgressResponse {
            generated_at: Utc::now().to_rfc3339(),
            source,
            report: &report,
        },
    )
}

/// A bad `?page=` is the caller's fault (400); anything the configured
/// source gets wrong is upstream's (502).
fn resolve_page(query: &str, state: &ServerState) -> Result<(i64, String), (u16, PageError)> {
    let param = form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned());
    if let Some(raw) = param {
        return parse_page(&raw)
            .map(|page| (page, "query".to_string()))
            .map_err(|e| (400, e));
    }
    match &state.source {
        Some(source) => source
            .current_page()
            .map(|page| (page, source.describe()))
            .map_err(|e| (502, e)),
        None => Err((400, PageError::Missing)),
    }
}
