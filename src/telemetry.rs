//! src/telemetry.rs
use crate::configuration::TelemetrySettings;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Keeps the span exporter alive; call [`TelemetryGuard::shutdown`] before exiting
/// so buffered spans are flushed.
#[must_use]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn shutdown(self) -> anyhow::Result<()> {
        if let Some(tracer_provider) = self.tracer_provider {
            tracer_provider.shutdown()?;
        }
        Ok(())
    }
}

fn build_tracer_provider(
    service_name: &str,
    endpoint: &str,
) -> anyhow::Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_service_name(service_name.to_string())
                .build(),
        )
        .with_batch_exporter(exporter)
        .build();
    opentelemetry::global::set_tracer_provider(tracer_provider.clone());
    Ok(tracer_provider)
}

/// Installs the global subscriber: an `RUST_LOG`-driven filter (falling back to the
/// configured level), human readable output on stderr, and span export over OTLP
/// when an endpoint is configured.
pub fn init_tracing(settings: &TelemetrySettings) -> anyhow::Result<TelemetryGuard> {
    let tracer_provider = match &settings.otlp_endpoint {
        Some(endpoint) => Some(build_tracer_provider(&settings.service_name, endpoint)?),
        None => None,
    };
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(settings.service_name.clone()))
    });

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false),
        )
        .with(otel_layer)
        .try_init()?;

    Ok(TelemetryGuard { tracer_provider })
}
