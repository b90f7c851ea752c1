//! Redirect mapper library.
//!
//! Maps not-found request paths to redirect destinations. The core is
//! [`routing::normalize`], [`routing::RuleSet::sanitize`] and
//! [`routing::RuleSet::lookup`]; the rest is the service around it.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod storage;

pub use config::schema::RedirectConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{normalize, Redirector, Rule, RuleRecord, RuleSet};
