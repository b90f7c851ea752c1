//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectConfig (validated, immutable)
//!     → handed to the servers at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; rules are the only hot-reloaded state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AdminConfig;
pub use schema::ListenerConfig;
pub use schema::RedirectConfig;
pub use schema::RulesConfig;
