//! Property-based tests
//!
//! - `classifier_props`: the variant classifier, list partition and detail
//!   rendering agree on every name
//! - `selection_props`: expansion toggles and rank/category toggles behave
//!   as sets
//! - `record_props`: lenient record decoding never panics and never turns a
//!   sentinel into a link

mod classifier_props;
mod record_props;
mod selection_props;
