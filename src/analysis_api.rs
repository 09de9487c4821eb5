//! Client for the remote quasi-static analysis endpoint.
//!
//! The endpoint accepts one multipart upload with the three energy CSVs and
//! answers with the analysis payload. Non-2xx responses may carry a JSON body
//! with a `message` field that is preferred over the synthesized status text.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::http_client;
use crate::report::series::SeriesData;
use crate::report::summary::SummaryPayload;

/// Default endpoint of the analysis service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/analyze";

/// Multipart field names the endpoint expects, in upload order.
pub const FILE_FIELDS: [&str; 3] = ["allke_csv", "allie_csv", "allwk_csv"];

const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
const MAX_ERROR_RESPONSE_BYTES: usize = 64 * 1024;

/// Decoded success payload. Treated as immutable once received.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnalysisResult {
    /// Free-text verdict; classified client-side.
    #[serde(default)]
    pub final_decision_text: Option<String>,
    /// Key-value metrics for the summary table.
    #[serde(default)]
    pub summary_table: Option<SummaryPayload>,
    /// Named time series for the chart.
    #[serde(default)]
    pub graph_data: Option<BTreeMap<String, SeriesData>>,
}

/// One file part of the multipart upload.
#[derive(Clone, Debug)]
pub struct FilePart {
    pub field: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// Read a file from disk into an upload part.
    pub fn from_path(field: &'static str, path: &Path) -> Result<Self, AnalyzeError> {
        let bytes = std::fs::read(path).map_err(|source| AnalyzeError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.to_string());
        Ok(Self {
            field,
            file_name,
            bytes,
        })
    }
}

/// Errors raised by the analysis call.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The server rejected the request; carries the user-facing message.
    #[error("{0}")]
    Server(String),
    /// The request never completed.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// A 2xx response carried an undecodable body.
    #[error("JSON error: {0}")]
    Json(String),
    /// A selected CSV could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Upload the CSV parts and decode the analysis payload.
pub fn analyze(endpoint: &str, parts: &[FilePart]) -> Result<AnalysisResult, AnalyzeError> {
    let boundary = multipart_boundary();
    let body = encode_multipart(parts, &boundary);
    let request = http_client::agent()
        .post(endpoint)
        .set("Accept", "application/json")
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        );

    let response = match request.send_bytes(&body) {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            return Err(AnalyzeError::Server(status_message(code, response)));
        }
        Err(ureq::Error::Transport(err)) => {
            return Err(AnalyzeError::Transport(err.to_string()));
        }
    };

    let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES)
        .map_err(|err| AnalyzeError::Json(err.to_string()))?;
    parse_analysis_response(&bytes)
}

fn parse_analysis_response(bytes: &[u8]) -> Result<AnalysisResult, AnalyzeError> {
    serde_json::from_slice(bytes).map_err(|err| AnalyzeError::Json(err.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Prefer the server's `message` field; fall back to a generic status text.
fn status_message(code: u16, response: ureq::Response) -> String {
    let body = http_client::read_response_bytes(response, MAX_ERROR_RESPONSE_BYTES)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default();
    error_message(code, &body)
}

fn error_message(code: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body.trim())
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("Server error: {code}"))
}

fn multipart_boundary() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("----quasicheck-{nanos:032x}")
}

fn encode_multipart(parts: &[FilePart], boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        let file_name = part.file_name.replace('"', "_");
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::tests::serve_once;

    fn parts() -> Vec<FilePart> {
        FILE_FIELDS
            .iter()
            .map(|field| FilePart {
                field,
                file_name: format!("{field}.csv"),
                bytes: b"0.0,1.0\n0.1,0.9\n".to_vec(),
            })
            .collect()
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn decodes_success_payload() {
        let body = r#"{
            "final_decision_text": "MUY BUENO. Suficiente.",
            "summary_table": {"time_RI_estable_menor_5pct": "1.2s", "time_RI_estable_menor_1pct": null},
            "graph_data": {"RI": {"x": [0.0, 1.0], "y": [5.0, null]}}
        }"#;
        let url = serve_once(json_response("200 OK", body));
        let result = analyze(&url, &parts()).unwrap();
        assert_eq!(
            result.final_decision_text.as_deref(),
            Some("MUY BUENO. Suficiente.")
        );
        let summary = result.summary_table.unwrap();
        assert!(summary["time_RI_estable_menor_1pct"].is_none());
        let graph = result.graph_data.unwrap();
        assert_eq!(graph["RI"].x, vec![0.0, 1.0]);
        assert_eq!(graph["RI"].y, vec![Some(5.0), None]);
    }

    #[test]
    fn empty_payload_decodes_with_absent_fields() {
        let result = parse_analysis_response(b"{}").unwrap();
        assert!(result.final_decision_text.is_none());
        assert!(result.summary_table.is_none());
        assert!(result.graph_data.is_none());
    }

    #[test]
    fn server_message_is_preferred_on_error_status() {
        let url = serve_once(json_response(
            "500 Internal Server Error",
            r#"{"message": "boom"}"#,
        ));
        let err = analyze(&url, &parts()).unwrap_err();
        match err {
            AnalyzeError::Server(message) => assert_eq!(message, "boom"),
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_error_body_falls_back_to_status_text() {
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "Server error: 502");
        assert_eq!(error_message(400, ""), "Server error: 400");
        assert_eq!(error_message(400, r#"{"message": "  "}"#), "Server error: 400");
    }

    #[test]
    fn undecodable_success_body_is_a_json_error() {
        let url = serve_once(json_response("200 OK", "not json"));
        let err = analyze(&url, &parts()).unwrap_err();
        assert!(matches!(err, AnalyzeError::Json(_)));
    }

    #[test]
    fn multipart_body_carries_all_three_fields() {
        let boundary = "----quasicheck-test";
        let body = encode_multipart(&parts(), boundary);
        let text = String::from_utf8(body).unwrap();
        for field in FILE_FIELDS {
            assert!(text.contains(&format!("name=\"{field}\"")));
        }
        assert!(text.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn file_part_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allke.csv");
        std::fs::write(&path, "0,1\n").unwrap();
        let part = FilePart::from_path("allke_csv", &path).unwrap();
        assert_eq!(part.file_name, "allke.csv");
        assert_eq!(part.bytes, b"0,1\n");
    }
}
