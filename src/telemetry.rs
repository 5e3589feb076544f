use tracing::{subscriber::set_global_default, Level, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter::{self, EnvFilter},
    fmt::MakeWriter,
    layer::SubscriberExt,
    Layer, Registry,
};

/// Create a new subscriber to add telemetry to the application.
///
/// `RUST_LOG` overrides the default target filter when set.
pub fn get_subscriber<Sink>(name: String, sink: Sink) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env_filter) => env_filter.boxed(),
        Err(_) => filter::Targets::new()
            .with_target("signsound", Level::DEBUG)
            .with_target("tower_http::trace", Level::INFO)
            .with_target("hyper", Level::INFO)
            .with_default(Level::WARN)
            .boxed(),
    };

    let formatting_layer = BunyanFormattingLayer::new(name.into(), sink);

    Registry::default()
        .with(filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

/// Init a subscriber and set it as the global tracing subscription.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) {
    LogTracer::init().expect("Failed to set logger");
    set_global_default(subscriber).expect("Failed to set subscriber");
}
