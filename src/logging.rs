use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::Tracer;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, field, info_span};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// Name reported to OpenTelemetry collectors
const SERVICE_NAME: &str = "todo-jwt-api";

/// Background OpenTelemetry pipelines shipping spans and metrics to a collector
pub struct OtelExporters {
    pub tracer: Tracer,
    pub meter: SdkMeterProvider,
}

/// Wraps every route in a span carrying the method, path, and final status code. An incoming
/// W3C trace context header becomes the span's parent.
pub fn attach_tracing_http<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let span = info_span!(
                "request",
                method = request.method().as_str(),
                path = request.uri().path(),
                response_status = field::Empty,
            );

            let remote_context = global::get_text_map_propagator(|propagator| {
                propagator.extract(&HeaderExtractor(request.headers()))
            });
            span.set_parent(remote_context);

            span
        })
        .on_response(|response: &Response<Body>, latency: Duration, span: &Span| {
            span.record("response_status", field::display(response.status()));
            debug!(latency_ms = latency.as_millis() as u64, "Finished handling request");
        });

    router.layer(ServiceBuilder::new().layer(trace_layer))
}

/// Builds OTLP/gRPC exporters for spans and metrics. Both endpoints are usually the local
/// collector sidecar at http://localhost:4317.
pub fn init_exporters(
    traces_endpoint: &str,
    metrics_endpoint: &str,
) -> Result<OtelExporters, anyhow::Error> {
    let span_exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(traces_endpoint)
        .build()
        .context("building the span exporter")?;
    let metric_exporter = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(metrics_endpoint)
        .build()
        .context("building the metric exporter")?;

    let service_resource = || Resource::new([KeyValue::new("service.name", SERVICE_NAME)]);

    let tracer = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(span_exporter, runtime::Tokio)
        .with_resource(service_resource())
        .build()
        .tracer(SERVICE_NAME);
    let meter = SdkMeterProvider::builder()
        .with_reader(PeriodicReader::builder(metric_exporter, runtime::Tokio).build())
        .with_resource(service_resource())
        .build();

    Ok(OtelExporters { tracer, meter })
}

/// Reads per-module log directives from [app_env::LOG_LEVEL], falling back to "info"
pub fn init_env_filter() -> Result<EnvFilter, anyhow::Error> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("{} holds an invalid log filter", app_env::LOG_LEVEL))
}

/// Installs the global subscriber. Stdout gets JSON lines filtered by [env_filter]. When
/// [otel_exporters] is present, everything at "debug" and above is also shipped to the collector.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    match otel_exporters {
        Some(OtelExporters { tracer, meter }) => registry()
            .with(LevelFilter::DEBUG)
            .with(OpenTelemetryLayer::new(tracer))
            .with(MetricsLayer::new(meter))
            .with(tracing_subscriber::fmt::layer().json().with_filter(env_filter))
            .init(),
        None => registry()
            .with(LevelFilter::DEBUG)
            .with(tracing_subscriber::fmt::layer().json().with_filter(env_filter))
            .init(),
    }
}
