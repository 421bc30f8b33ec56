pub mod etl;
pub mod parse;
pub mod pipeline;

pub use crate::domain::model::{Record, ReportPeriod, ReportSummary, Task, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
