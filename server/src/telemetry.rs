//! Logging setup: console output filtered by `RUST_LOG`, plus OTLP export of
//! traces and logs when `OTEL_EXPORTER_OTLP_ENDPOINT` points at a reachable
//! collector.

use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SERVICE_NAME: &str = "ladle-server";

/// Keeps the OTLP providers alive; call [`Telemetry::shutdown`] before exit
/// so batched spans and logs are flushed.
#[derive(Default)]
pub struct Telemetry {
    traces: Option<SdkTracerProvider>,
    logs: Option<SdkLoggerProvider>,
}

impl Telemetry {
    pub fn shutdown(self) {
        if let Some(traces) = self.traces {
            if let Err(e) = traces.shutdown() {
                eprintln!("failed to flush traces: {}", e);
            }
        }
        if let Some(logs) = self.logs {
            if let Err(e) = logs.shutdown() {
                eprintln!("failed to flush logs: {}", e);
            }
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// `host:port` of an OTLP endpoint URL.
fn host_port(endpoint: &str) -> &str {
    let rest = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    rest.split('/').next().unwrap_or(rest)
}

/// Quick TCP probe so a missing collector does not stall every export.
fn is_reachable(endpoint: &str) -> bool {
    host_port(endpoint)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

fn init_console() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub fn init_telemetry() -> Telemetry {
    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        init_console();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return Telemetry::default();
    };

    if !is_reachable(&endpoint) {
        init_console();
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return Telemetry::default();
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build();
    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build();

    let (trace_exporter, log_exporter) = match (trace_exporter, log_exporter) {
        (Ok(t), Ok(l)) => (t, l),
        (Err(e), _) | (_, Err(e)) => {
            init_console();
            tracing::warn!("Failed to create OTLP exporter ({}), using console logging only", e);
            return Telemetry::default();
        }
    };

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = trace_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider.clone());

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );

    Telemetry {
        traces: Some(trace_provider),
        logs: Some(log_provider),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_port() {
        assert_eq!(host_port("http://collector:4317"), "collector:4317");
        assert_eq!(host_port("https://otel.example.com:443/v1"), "otel.example.com:443");
        assert_eq!(host_port("localhost:4317"), "localhost:4317");
    }
}
