mod builtin;
pub mod catalog;
pub mod error;
pub mod types;

pub use catalog::AgentCatalog;
pub use error::{CatalogError, CatalogResult};
pub use types::{parse_parameter, AgentSpec};
