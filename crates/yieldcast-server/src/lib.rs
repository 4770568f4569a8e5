//! HTTP service for yieldcast.
//!
//! - [`api`]: axum router, handlers and JSON wire types.
//! - [`validation`]: request decoding and bounds/label checks.
//! - [`config`]: TOML + environment + CLI configuration.
//! - [`cli`]: flag parsing for the `yieldcast-server` binary.
//! - [`tracing_setup`]: subscriber installation.

pub mod api;
pub mod cli;
pub mod config;
pub mod tracing_setup;
pub mod validation;

pub use api::{
    ApiError, AppState, AreasResponse, CropsResponse, ErrorBody, HealthResponse, InputEcho,
    MODEL_TYPE, PredictResponse, StatsResponse, router, run_server, title_case,
};
pub use cli::{CliArgs, USAGE, parse_cli_args};
pub use config::ServerConfig;
pub use tracing_setup::{Verbosity, init_subscriber};
pub use validation::{NumericField, PredictRequest, validate_request};
