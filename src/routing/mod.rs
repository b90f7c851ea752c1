//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Rule replacement:
//!     raw rule data (untrusted JSON)
//!     → rules.rs (RuleSet::sanitize, per record:)
//!         → destination.rs (clean `to`)
//!         → normalize.rs (canonical key from `from`)
//!     → router.rs (persist, swap into the live set)
//!
//! Incoming Request (path + query)
//!     → router.rs (snapshot of the live set)
//!     → rules.rs (normalize, ordered exact-match scan)
//!     → Return: destination or no match
//! ```
//!
//! # Design Decisions
//! - Exact string matching only: no prefixes, wildcards or case folding
//! - Rule sets are immutable; updates replace the whole set
//! - First match wins (stored order)

pub mod destination;
pub mod normalize;
pub mod router;
pub mod rules;

pub use destination::sanitize_destination;
pub use normalize::normalize;
pub use router::Redirector;
pub use rules::{Rule, RuleRecord, RuleSet};
