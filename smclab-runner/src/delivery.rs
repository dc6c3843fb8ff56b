//! Webhook delivery of a finished report.
//!
//! Any HTTP response counts as delivered, whatever its status. A transport
//! failure is an outcome too: the report is handed back inside `Failed` so
//! the caller still has it.

use std::time::Duration;

use serde::Serialize;
use smclab_core::domain::Timeframe;
use thiserror::Error;
use tracing::{info, warn};

use crate::report::MultiTimeframeReport;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Short description of what was sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub symbol: String,
    pub timeframes: Vec<Timeframe>,
    /// Candles across the timeframes that produced an analysis.
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeliveryOutcome {
    Delivered {
        message: String,
        webhook_status: u16,
        analysis_summary: AnalysisSummary,
    },
    Failed {
        message: String,
        webhook_error: String,
        data: Box<MultiTimeframeReport>,
    },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// POST `report` as JSON to `url`.
pub fn deliver(
    url: &str,
    report: &MultiTimeframeReport,
    timeout: Duration,
) -> Result<DeliveryOutcome, DeliveryError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DeliveryError::Client(e.to_string()))?;

    match client.post(url).json(report).send() {
        Ok(response) => {
            let status = response.status().as_u16();
            info!(url, status, symbol = %report.symbol, "report delivered to webhook");
            Ok(DeliveryOutcome::Delivered {
                message: "Analysis completed and sent to webhook".into(),
                webhook_status: status,
                analysis_summary: AnalysisSummary {
                    symbol: report.symbol.clone(),
                    timeframes: report.timeframes_analyzed.clone(),
                    data_points: report.total_data_points(),
                },
            })
        }
        Err(e) => {
            warn!(url, error = %e, symbol = %report.symbol, "webhook delivery failed");
            Ok(DeliveryOutcome::Failed {
                message: "Analysis completed but webhook failed".into(),
                webhook_error: e.to_string(),
                data: Box::new(report.clone()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportMetadata, SCHEMA_VERSION};
    use chrono::{TimeZone, Utc};
    use smclab_core::data::AnalysisPeriod;
    use smclab_core::TimeframeEntry;
    use std::collections::BTreeMap;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    fn report() -> MultiTimeframeReport {
        let mut entries = BTreeMap::new();
        entries.insert("1d".to_string(), TimeframeEntry::no_data(&Timeframe::Daily));
        MultiTimeframeReport {
            schema_version: SCHEMA_VERSION,
            symbol: "AAPL".into(),
            company_name: "AAPL".into(),
            currency: "USD".into(),
            analysis_period: AnalysisPeriod::ThreeMonths,
            timeframes_analyzed: vec![Timeframe::Daily],
            multi_timeframe_analysis: entries,
            metadata: ReportMetadata::default(),
            data_source: "mock".into(),
            fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    /// One-shot HTTP server: reads a request, answers with `status`, and
    /// hands back the request body.
    fn serve_once(status_line: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/hook", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            let mut stream = stream;
            write!(stream, "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                .unwrap();
            String::from_utf8(body).unwrap()
        });
        (url, handle)
    }

    #[test]
    fn any_response_counts_as_delivered() {
        let (url, server) = serve_once("500 Internal Server Error");
        let outcome = deliver(&url, &report(), Duration::from_secs(5)).unwrap();
        let body = server.join().unwrap();

        let posted: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(posted["symbol"], "AAPL");
        assert_eq!(
            posted["multi_timeframe_analysis"]["1d"]["error"],
            "No data available for 1d timeframe"
        );

        match &outcome {
            DeliveryOutcome::Delivered {
                message,
                webhook_status,
                analysis_summary,
            } => {
                assert_eq!(message, "Analysis completed and sent to webhook");
                assert_eq!(*webhook_status, 500);
                assert_eq!(analysis_summary.symbol, "AAPL");
                assert_eq!(analysis_summary.data_points, 0);
            }
            other => panic!("expected delivery, got {other:?}"),
        }
        assert!(outcome.is_delivered());
    }

    #[test]
    fn transport_failure_returns_report() {
        // bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let url = format!("http://127.0.0.1:{port}/hook");
        let outcome = deliver(&url, &report(), Duration::from_secs(2)).unwrap();
        assert!(!outcome.is_delivered());

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["message"], "Analysis completed but webhook failed");
        assert!(json["webhook_error"].as_str().is_some_and(|s| !s.is_empty()));
        assert_eq!(json["data"]["symbol"], "AAPL");
    }
}
