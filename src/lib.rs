// 公开导出的模块，供外部使用
pub mod analytics;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use errors::{LensError, Result};
pub use models::stock::{StockRecord, StockResponse, Trend};
pub use services::aggregator::Aggregator;
