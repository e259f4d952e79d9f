// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use veil_config::AppConfig;

/// Install the fmt layer, plus an OTLP exporter when `otel` is configured.
pub fn setup_tracing(config: &AppConfig, log_level: Level) -> Result<()> {
    let level = tracing_subscriber::filter::LevelFilter::from_level(log_level);
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match config.otel() {
        Some(endpoint) => {
            let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .with_protocol(Protocol::Grpc)
                .build()?;

            let service_name =
                std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| format!("veil-{}", config.name()));
            let resource = Resource::builder().with_service_name(service_name).build();

            let provider = SdkTracerProvider::builder()
                .with_batch_exporter(otlp_exporter)
                .with_resource(resource)
                .build();

            let tracer = provider.tracer("veil");
            let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(fmt)
                .with(telemetry)
                .with(level)
                .try_init()?;
        }
        None => {
            tracing_subscriber::registry().with(fmt).with(level).try_init()?;
        }
    }

    Ok(())
}
