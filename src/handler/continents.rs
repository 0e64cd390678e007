//! Continent lookup handler
//!
//! Strips the fixed route prefix off the request path, looks the remainder up
//! in the continent table and renders either the record as JSON or a
//! plain-text miss message.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::continent::{ContinentError, ContinentTable};
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;

/// Return the part of `path` that follows `prefix`, verbatim
///
/// No percent-decoding or trimming is applied, so `/continents/` yields an
/// empty key and `/continents/asia/` yields `asia/`.
pub fn extract_path_param<'a>(path: &'a str, prefix: &str) -> Result<&'a str, ContinentError> {
    path.strip_prefix(prefix)
        .ok_or_else(|| ContinentError::MalformedPath(path.to_string()))
}

/// Resolve a continent request to its response
pub fn serve_continent(
    ctx: &RequestContext<'_>,
    prefix: &str,
    table: &ContinentTable,
) -> Response<Full<Bytes>> {
    let result = extract_path_param(ctx.path, prefix)
        .and_then(|key| table.lookup(key).map(|record| (key, record)));

    match result {
        Ok((key, record)) => match record.to_json() {
            Ok(json) => http::build_json_response(json, ctx.is_head),
            Err(e) => {
                logger::log_error(&format!("Failed to serialize continent '{key}': {e}"));
                http::build_text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    ctx.is_head,
                )
            }
        },
        Err(err @ ContinentError::LookupMiss(_)) => {
            logger::log_warning(&err.to_string());
            http::build_text_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), ctx.is_head)
        }
        Err(err @ ContinentError::MalformedPath(_)) => {
            logger::log_warning(&err.to_string());
            http::build_text_response(StatusCode::BAD_REQUEST, err.to_string(), ctx.is_head)
        }
    }
}
