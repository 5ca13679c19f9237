use std::{error::Error, io};

use opentelemetry::{KeyValue, global};
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, trace::SdkTracerProvider};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::config::{AppConfig, TracingConfig};

/// Tracer configuration and initialization.
pub struct Tracer;

impl Tracer {
    /// Installs the global subscriber for the configured tracing kind.
    ///
    /// Events are written to standard error and filtered by `RUST_LOG`, so
    /// command output on standard output stays clean. The `Stdout` kind also
    /// exports spans through OpenTelemetry.
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed.
    pub fn install(config: &AppConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
        if config.tracing == TracingConfig::Stdout {
            global::set_text_map_propagator(TraceContextPropagator::new());

            let mut resource =
                Resource::builder().with_service_name(config.distribution.name.clone());
            if let Some(version) = config.distribution.version.clone() {
                resource = resource.with_attribute(KeyValue::new("version", version));
            }

            let provider = SdkTracerProvider::builder()
                .with_resource(resource.build())
                .with_simple_exporter(SpanExporter::default())
                .build();
            global::set_tracer_provider(provider);
        }

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::from_default_env());

        tracing_subscriber::registry().with(layer).try_init()?;

        Ok(())
    }
}
