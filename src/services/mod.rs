pub mod cache;
pub mod scalper;
pub mod signals;

pub use cache::Cache;
pub use scalper::ScalperService;
pub use signals::{compute_snapshot, enrich};
