// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::time::Duration;

use anyhow::Context;
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::PeriodicReader;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::runtime::Tokio;

const SERVICE_NAME: &str = "disk-log-manager";

/// OTLP (gRPC) metrics pipeline. The endpoint comes from the standard
/// `OTEL_EXPORTER_OTLP_*` environment variables. Must be called inside a tokio runtime.
pub fn init_meter_provider() -> anyhow::Result<SdkMeterProvider> {
    let resource = opentelemetry_sdk::Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)])
        .merge(&opentelemetry_sdk::Resource::default());

    let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .build()
        .context("Failed to build OTLP metrics exporter")?;

    Ok(SdkMeterProvider::builder()
        .with_reader(
            PeriodicReader::builder(metric_exporter, Tokio)
                .with_interval(Duration::from_secs(30))
                .with_timeout(Duration::from_secs(5))
                .build(),
        )
        .with_resource(resource)
        .build())
}
