//! Populate a `Replacer` from an incoming HTTP request.

use std::net::SocketAddr;

use axum::http::{header, HeaderMap, Request};
use percent_encoding::percent_decode_str;

use super::{Replacer, HEADER_PREFIX};

impl Replacer {
    /// Build the request-scoped variable set for `req`.
    ///
    /// `remote` is the peer address when the server recorded one; the
    /// `http.request.remote*` keys are left unset otherwise.
    pub fn from_request<B>(req: &Request<B>, remote: Option<SocketAddr>) -> Self {
        let mut repl = Replacer::new();
        let uri = req.uri();

        repl.set("http.request.method", req.method().as_str());
        repl.set(
            "http.request.uri",
            uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/"),
        );
        repl.set(
            "http.request.uri.path",
            percent_decode_str(uri.path()).decode_utf8_lossy(),
        );
        let query = uri.query().unwrap_or("");
        repl.set("http.request.uri.query", query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            repl.vars
                .entry(format!("http.request.uri.query.{}", key))
                .or_insert_with(|| value.into_owned());
        }

        repl.set("http.request.scheme", uri.scheme_str().unwrap_or("http"));
        repl.set("http.request.proto", format!("{:?}", req.version()));

        let hostport = req
            .headers()
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| uri.authority().map(|a| a.as_str()));
        if let Some(hostport) = hostport {
            let (host, port) = split_host_port(hostport);
            repl.set("http.request.hostport", hostport);
            repl.set("http.request.host", host);
            if let Some(port) = port {
                repl.set("http.request.port", port);
            }
        }

        if let Some(addr) = remote {
            repl.set("http.request.remote", addr.to_string());
            repl.set("http.request.remote.host", addr.ip().to_string());
            repl.set("http.request.remote.port", addr.port().to_string());
        }

        repl.set_headers(req.headers());
        repl
    }

    fn set_headers(&mut self, headers: &HeaderMap) {
        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect::<Vec<_>>()
                .join(",");
            self.vars
                .insert(format!("{}{}", HEADER_PREFIX, name.as_str()), joined);
        }

        for cookie_header in headers.get_all(header::COOKIE) {
            let Ok(raw) = cookie_header.to_str() else {
                continue;
            };
            for pair in raw.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    self.vars
                        .entry(format!("http.request.cookie.{}", name.trim()))
                        .or_insert_with(|| value.trim().to_string());
                }
            }
        }
    }
}

/// Split `host[:port]`, including bracketed IPv6 literals.
fn split_host_port(hostport: &str) -> (&str, Option<&str>) {
    if let Some(rest) = hostport.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            return (host, tail.strip_prefix(':').filter(|p| !p.is_empty()));
        }
        return (hostport, None);
    }
    match hostport.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => (host, Some(port).filter(|p| !p.is_empty())),
        _ => (hostport, None),
    }
}
