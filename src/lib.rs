pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::DashboardConfig;

pub use adapters::{LocalStorage, SyntheticSource};
pub use app::pipelines::DashboardPipeline;
pub use app::session::Session;
pub use core::{etl::DashboardEngine, pipeline::run_pipeline};
pub use domain::aggregates::PipelineOutput;
pub use domain::model::{ContractType, Dataset, Province, Record, Year};
pub use domain::selection::FilterSelection;
pub use render::ChartBackend;
pub use utils::error::{DashError, Result};
