use opentelemetry::global;
use opentelemetry::sdk::propagation::TraceContextPropagator;
use opentelemetry::sdk::{
    trace::{self, RandomIdGenerator, Sampler},
    Resource,
};
use opentelemetry::KeyValue;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn telemetry_enabled() -> bool {
    env::var("ENABLE_TELEMETRY")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false)
}

/// Install the tracing subscriber: formatted JSON logs always, a Jaeger
/// export layer when `ENABLE_TELEMETRY` is set.
pub async fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .json();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("marslink=debug,axum=info,warn"));

    if telemetry_enabled() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let agent_endpoint =
            env::var("JAEGER_AGENT_ENDPOINT").unwrap_or_else(|_| "jaeger:6831".to_string());

        let tracer = opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name("marslink-relay")
            .with_endpoint(&agent_endpoint)
            .with_trace_config(
                trace::config()
                    .with_sampler(Sampler::AlwaysOn)
                    .with_id_generator(RandomIdGenerator::default())
                    .with_max_events_per_span(64)
                    .with_max_attributes_per_span(16)
                    .with_resource(Resource::new(vec![
                        KeyValue::new("service.name", "marslink-relay"),
                        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    ])),
            )
            .install_batch(opentelemetry::runtime::Tokio)?;

        let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .with(telemetry)
            .try_init()?;

        tracing::info!("telemetry enabled, exporting to {}", agent_endpoint);
    } else {
        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        tracing::info!("telemetry disabled");
    }

    Ok(())
}

pub fn shutdown_telemetry() {
    if telemetry_enabled() {
        // Flush remaining spans before the process exits.
        opentelemetry::global::shutdown_tracer_provider();
    }
}
