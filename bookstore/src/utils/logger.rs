use std::sync::OnceLock;

use tracing::error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let log_filter = match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,bookstore=error",
        // Only show warnings
        Verbosity::Verbose(0) => "off,bookstore=warn",
        // Show our own info logs
        Verbosity::Verbose(1) => "off,bookstore=info",
        // Also show debug from our libraries
        Verbosity::Verbose(2) => "off,bookstore=debug,bookstore_sdk=debug,bookstore_api=debug",
        // Also show trace from our libraries
        Verbosity::Verbose(3) => "off,bookstore=trace,bookstore_sdk=trace,bookstore_api=trace",
        Verbosity::Verbose(_) => "trace",
    };

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        // The filter starts wide open and is narrowed to the actual level
        // below, so later re-initializations only need to modify it.
        let filter = EnvFilter::new("trace");
        let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
        let log_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter);
        tracing_subscriber::registry().with(log_layer).init();
        filter_reload_handle
    });

    update_filters(filter_handle, log_filter);
}

fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}
