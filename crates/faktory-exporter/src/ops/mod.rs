//! Operational HTTP endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::exposition;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(landing_page(&state.cfg().web.telemetry_path))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let collector = state.collector();
    let values = collector.collect_snapshot().await;
    let body = exposition::render(&collector.describe(), &values);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn landing_page(telemetry_path: &str) -> String {
    format!(
        r#"<html>
	<head>
		<title>Faktory Exporter</title>
	</head>
	<body>
		<h1>Faktory Exporter</h1>
		<p>
		<a href="{}">Metrics</a>
		</p>
	</body>
</html>"#,
        escape_attr(telemetry_path)
    )
}
