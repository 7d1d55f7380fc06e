//! Declarative validation and query-predicate engine for bookmark requests.
//!
//! Requests are turned into a [`ParameterSet`], checked field by field against
//! an immutable [`ConstraintTable`], and every failing field is classified
//! into a coded [`ValidationError`]. Once a list request is clean, the
//! [`PredicateBuilder`] normalizes it into a storage [`QueryPredicate`].
//!
//! [`QueryPredicate`]: bookmarks_storage::QueryPredicate

pub mod classifier;
pub mod constraints;
pub mod cross_field;
pub mod engine;
pub mod error;
pub mod link;
pub mod params;
pub mod predicate;
pub mod rules;

pub use classifier::classify;
pub use constraints::ConstraintTable;
pub use engine::{BookmarkEngine, EngineConfig, EngineError};
pub use error::{ErrorCode, ValidationError, ValidationErrors};
pub use link::{DEFAULT_BLOCKED_HOSTS, LinkMode};
pub use params::ParameterSet;
pub use predicate::{ContractViolation, PredicateBuilder};
pub use rules::{Failure, Rule, RuleInput, evaluate};
