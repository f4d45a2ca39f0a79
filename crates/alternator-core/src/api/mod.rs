//! Public API: database handle, builder-pattern item operations and queries.

pub mod builders;
pub mod database;
pub mod key_utils;
pub mod query;

pub use builders::{
    DeleteItemBuilder, GetItemBuilder, PutItemBuilder, QueryBuilder, SaveBehavior, TableBuilder,
};
pub use database::AlternatorDB;
pub use query::{ComparisonOperator, Condition, SortCondition};
