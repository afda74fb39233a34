/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Shared secret used to sign and verify bearer tokens (HMAC-SHA-512, UTF-8 bytes of the value)
pub const JWT_KEY: &str = "JWT_KEY";
/// Value placed in and required from the "iss" claim of bearer tokens
pub const JWT_ISSUER: &str = "JWT_ISSUER";
/// Value placed in and required from the "aud" claim of bearer tokens
pub const JWT_AUDIENCE: &str = "JWT_AUDIENCE";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";
