//! Querying directory users by arbitrary attributes

pub mod attributes;
pub mod collation;
pub mod field;
pub mod filter;
pub mod normalize;
pub mod query;

pub use attributes::{AttributeDistribution, ValueCount, attribute_values};
pub use collation::NameOrder;
pub use field::AttributeField;
pub use filter::{AttributeQuery, Predicate, build_filter, escape_value};
pub use normalize::normalize_user;
pub use query::{QueryResult, run_query};
