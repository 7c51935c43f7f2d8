//! Tracing subscriber setup with an optional OpenTelemetry exporter.
//!
//! Every process installs one `tracing_subscriber` registry: an `EnvFilter`
//! (`RUST_LOG`, default `info`), a pretty or JSON `fmt` layer, and, when
//! telemetry is enabled, an OpenTelemetry layer backed by an OTLP exporter.

use std::time::Duration;

use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::{BatchSpanProcessor, Sampler, SdkTracerProvider};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LoggingConfig, TelemetryConfig};

/// Opaque handle returned by [`init`]. Dropping it is a no-op; call
/// [`TelemetryGuard::shutdown`] for a clean flush of pending spans.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Flush pending spans and shut down the exporter.
    pub fn shutdown(mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            tracing::warn!(error = %e, "OpenTelemetry tracer provider shutdown failed");
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// If the OTLP exporter fails to build (e.g., invalid endpoint), the
/// subscriber is installed without the OpenTelemetry layer and the failure
/// is logged rather than aborting startup.
pub fn init(telemetry: &TelemetryConfig, logging: &LoggingConfig) -> TelemetryGuard {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let (pretty_layer, json_layer) = match logging.format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    let (provider, exporter_error) = if telemetry.enabled {
        match build_provider(telemetry) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("boxes")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(otel_layer)
        .init();

    if let Some(e) = exporter_error {
        tracing::error!(
            error = %e,
            endpoint = %telemetry.endpoint,
            protocol = %telemetry.protocol,
            "failed to build OTLP exporter, falling back to fmt-only tracing"
        );
    } else if provider.is_some() {
        info!(
            endpoint = %telemetry.endpoint,
            protocol = %telemetry.protocol,
            sample_ratio = telemetry.sample_ratio,
            "OpenTelemetry tracing enabled"
        );
    }

    TelemetryGuard { provider }
}

/// Build and register the global tracer provider.
fn build_provider(
    config: &TelemetryConfig,
) -> Result<SdkTracerProvider, opentelemetry::trace::TraceError> {
    let exporter = build_exporter(config)?;

    global::set_text_map_propagator(opentelemetry_sdk::propagation::TraceContextPropagator::new());

    let mut resource_kvs = vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("process.pid", std::process::id().to_string()),
    ];
    if let Ok(hostname) = std::env::var("HOSTNAME").or_else(|_| std::env::var("HOST")) {
        resource_kvs.push(KeyValue::new("host.name", hostname));
    }
    for (k, v) in &config.resource_attributes {
        resource_kvs.push(KeyValue::new(k.clone(), v.clone()));
    }
    let resource = Resource::builder().with_attributes(resource_kvs).build();

    let provider = SdkTracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter).build())
        .with_sampler(sampler(config.sample_ratio))
        .with_resource(resource)
        .build();

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

fn sampler(ratio: f64) -> Sampler {
    if (ratio - 1.0).abs() < f64::EPSILON {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

/// Build the OTLP span exporter based on the configured protocol.
fn build_exporter(
    config: &TelemetryConfig,
) -> Result<opentelemetry_otlp::SpanExporter, opentelemetry::trace::TraceError> {
    let timeout = Duration::from_secs(config.timeout_seconds);

    match config.protocol.as_str() {
        "http" => opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .with_endpoint(&config.endpoint)
            .with_timeout(timeout)
            .build(),
        other => {
            if other != "grpc" {
                tracing::warn!(protocol = %other, "unknown telemetry protocol, defaulting to gRPC");
            }
            opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(&config.endpoint)
                .with_timeout(timeout)
                .build()
        }
    }
}
