//! Introspection report served on every path outside `/healthz` and `/shutdown`.
//!
//! The report lists the request number, request line, Host header, the Downward API
//! environment and the files of the podinfo volume. Environment and files are read
//! fresh for every request. Filesystem failures are logged and never change the 200.

use std::fmt::Write as _;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
};
use tracing::instrument;

use crate::downward::{env_snapshot, read_podinfo, render_lines, PodInfoError, PodInfoFile};
use crate::error::AppError;
use crate::middleware::request_host;
use crate::state::AppState;

/// Introspection handler.
#[instrument(name = "introspect::report", skip_all)]
pub async fn report(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let path = uri.path();
    if !path.starts_with(&state.config.app_context) {
        return Err(AppError::PathNotAllowed {
            context: state.config.app_context.clone(),
        });
    }

    let request_count = state.counter.next();
    let host = request_host(&headers);

    let env = env_snapshot(state.env.as_ref());

    let files = match read_podinfo(&state.config.podinfo_dir).await {
        Ok(files) => files,
        Err(e @ PodInfoError::Missing { .. }) => {
            tracing::info!(error = %e, "No podinfo files to report");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read podinfo directory");
            Vec::new()
        }
    };

    tracing::debug!(request_count, files = files.len(), "Built introspection report");

    Ok(render_report(
        request_count,
        &method,
        path,
        &host,
        &env,
        &files,
    ))
}

/// Format the plain-text report body.
pub fn render_report(
    request_count: u64,
    method: &Method,
    path: &str,
    host: &str,
    env: &[(&str, String)],
    files: &[PodInfoFile],
) -> String {
    let mut body = String::new();
    // fmt::Write into a String cannot fail
    let _ = writeln!(body, "{request_count} {method} {path}");
    let _ = writeln!(body, "path: {path}");
    let _ = writeln!(body, "Host: {host}");

    for (key, value) in env {
        let _ = writeln!(body, "ENV {key} = {value}");
    }

    for file in files {
        let _ = writeln!(
            body,
            "FILE {} = {}",
            file.path.display(),
            render_lines(&file.content)
        );
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_report_layout() {
        let env = vec![
            ("MY_NODE_NAME", "node-1".to_string()),
            ("MY_POD_NAME", "none".to_string()),
        ];
        let files = vec![PodInfoFile {
            path: PathBuf::from("/etc/podinfo/labels"),
            content: "app=demo".to_string(),
        }];

        let body = render_report(3, &Method::GET, "/foo", "example:8000", &env, &files);

        assert_eq!(
            body,
            "3 GET /foo\n\
             path: /foo\n\
             Host: example:8000\n\
             ENV MY_NODE_NAME = node-1\n\
             ENV MY_POD_NAME = none\n\
             FILE /etc/podinfo/labels = ['app=demo']\n"
        );
    }

    #[test]
    fn test_render_report_without_host_or_files() {
        let body = render_report(0, &Method::POST, "/", "", &[], &[]);
        assert_eq!(body, "0 POST /\npath: /\nHost: \n");
    }
}
