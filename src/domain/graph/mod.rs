//! Graph store domain models and traits

mod row;
mod store;

pub use row::{FieldValue, Row, ScalarValue};
pub use store::GraphStore;

#[cfg(test)]
pub use store::mock::MockGraphStore;
