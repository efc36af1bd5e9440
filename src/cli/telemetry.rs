//! Diagnostics for the CLI. Human-readable events go to stderr so stdout only
//! carries command output; spans are exported over OTLP/gRPC when an endpoint
//! is configured.

use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_otlp::{Compression, WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::{
    Resource,
    propagation::{BaggagePropagator, TraceContextPropagator},
    trace::{SdkTracerProvider, Tracer},
};
use std::{env::var, io, time::Duration};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};
use ulid::Ulid;

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

const ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

/// Noisy dependencies capped regardless of `-v`.
const QUIET_TARGETS: [&str; 4] = [
    "hyper=error",
    "hyper_util=error",
    "reqwest=warn",
    "opentelemetry_sdk=warn",
];

/// Resolves the collector address; bare `host:port` values get `https://`.
fn otlp_endpoint(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{}", raw.trim_end_matches('/'))
    }
}

fn filter(level: Level) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    for directive in QUIET_TARGETS {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

fn resource() -> Resource {
    let instance = var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string());
    Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("service.instance.id", instance),
        ])
        .build()
}

fn otlp_tracer(endpoint: &str) -> Result<Tracer> {
    if var("OTEL_EXPORTER_OTLP_PROTOCOL").is_ok_and(|protocol| protocol != "grpc") {
        debug!("only grpc export is supported, ignoring OTEL_EXPORTER_OTLP_PROTOCOL");
    }

    // Extra headers come from OTEL_EXPORTER_OTLP_HEADERS via the exporter.
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_endpoint(endpoint))
        .with_compression(Compression::Gzip)
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource())
        .build();

    let _ = TRACER_PROVIDER.set(provider.clone());
    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    Ok(provider.tracer(env!("CARGO_PKG_NAME")))
}

/// Installs the global subscriber. `None` keeps the default of errors only.
///
/// # Errors
///
/// Returns an error if a filter directive, the exporter or the global
/// subscriber cannot be set up.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact();
    let filter = filter(verbosity_level.unwrap_or(Level::ERROR))?;

    match var(ENDPOINT_VAR) {
        Ok(endpoint) => {
            let traces = tracing_opentelemetry::layer().with_tracer(otlp_tracer(&endpoint)?);
            let subscriber = Registry::default().with(stderr).with(traces).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        Err(_) => {
            let subscriber = Registry::default().with(stderr).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

/// Flushes pending spans; does nothing when export was never enabled.
pub fn shutdown_tracer() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        debug!("flushing trace exporter");
        let _ = provider.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otlp_endpoint_keeps_scheme() {
        assert_eq!(otlp_endpoint("http://localhost:4317"), "http://localhost:4317");
        assert_eq!(
            otlp_endpoint(" https://otel.example.com:4317/v1/traces "),
            "https://otel.example.com:4317/v1/traces"
        );
    }

    #[test]
    fn test_otlp_endpoint_defaults_to_https() {
        assert_eq!(
            otlp_endpoint("otel.example.com:4317/"),
            "https://otel.example.com:4317"
        );
    }

    #[test]
    fn test_filter_caps_http_stack() -> Result<()> {
        temp_env::with_var_unset("RUST_LOG", || {
            let rendered = filter(Level::DEBUG).map(|filter| filter.to_string())?;
            assert!(rendered.contains("hyper=error"));
            assert!(rendered.contains("reqwest=warn"));
            assert!(rendered.contains("debug"));
            Ok(())
        })
    }

    #[test]
    fn test_shutdown_tracer_no_provider() {
        shutdown_tracer();
    }
}
