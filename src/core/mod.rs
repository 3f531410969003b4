pub mod aggregate;
pub mod etl;
pub mod filter;
pub mod pipeline;

pub use crate::domain::aggregates::PipelineOutput;
pub use crate::domain::model::{Dataset, Record};
pub use crate::domain::ports::{ConfigProvider, DatasetSource, Pipeline, Storage};
pub use crate::utils::error::Result;
