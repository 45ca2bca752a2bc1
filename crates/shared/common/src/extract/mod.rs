//! Request extractors that render rejections in the error envelope.

mod validated_json;
mod validated_query;

pub use validated_json::{validation_error, ValidatedJson};
pub use validated_query::ValidatedQuery;
