//! Subscriber setup for the RAG services.
//!
//! `LOG_FORMAT` picks pretty or JSON output, `RUST_LOG` the filter,
//! `LOG_SPANS` span open/close events and `LOG_LOCATION` file/line fields.

use std::env;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name: String,
    /// dev, staging, prod
    pub environment: String,
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset (e.g. "graph_rag=debug,info")
    pub level: String,
    pub log_spans: bool,
    pub include_location: bool,
}

impl TracingConfig {
    /// Settings for `service_name`, read from the process environment
    pub fn for_service(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(service_name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str, default: bool| lookup(key).map(|v| v == "true").unwrap_or(default);

        Self {
            service_name: service_name.into(),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            format: lookup("LOG_FORMAT").map(|v| LogFormat::parse(&v)).unwrap_or(LogFormat::Pretty),
            level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_spans: flag("LOG_SPANS", false),
            include_location: flag("LOG_LOCATION", true),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    pub fn with_spans(mut self) -> Self {
        self.log_spans = true;
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.log_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_span_events(self.span_events())
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_target(true);

        match self.format {
            LogFormat::Json => base
                .json()
                .with_current_span(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .boxed(),
            LogFormat::Pretty => base.pretty().boxed(),
        }
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (tests, or a host
/// process that set up its own), in which case nothing changes.
///
/// ```ignore
/// use medgraph_observability::{init_tracing, TracingConfig};
///
/// init_tracing(TracingConfig::for_service("graph-rag"));
/// ```
pub fn init_tracing(config: TracingConfig) -> bool {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            service = %config.service_name,
            environment = %config.environment,
            format = config.format.as_str(),
            "Tracing initialized"
        );
    }

    installed
}
