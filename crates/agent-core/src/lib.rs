pub mod agent;
pub mod config;
pub mod document;
pub mod export;
pub mod pipeline;
pub mod session;
pub mod template;
pub mod vendor;

pub use agent::{parse_parameter, AgentCatalog, AgentSpec, CatalogError, CatalogResult};
pub use config::{Config, ConfigError, HttpConfig, OcrConfig, ProviderConfig};
pub use document::{AgentOutput, DocumentKey, DocumentStatus, SubmissionState};
pub use pipeline::{join_inputs, PipelineState, PipelineStep, FAILURE_PLACEHOLDER};
pub use session::{SessionError, SessionSnapshot};
pub use template::{PromptTemplate, TemplateError, TemplateResult};
pub use vendor::ApiVendor;
