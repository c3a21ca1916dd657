pub mod catalog;
pub mod error;
pub mod intent;
pub mod models;
pub mod planner;
pub mod prompts;
pub mod resolver;

pub use catalog::{normalize_catalog, normalize_record, try_normalize_catalog};
pub use error::CatalogError;
pub use models::*;
pub use prompts::{quick_prompts, GREETING};
pub use resolver::{resolve, resolve_detailed};
