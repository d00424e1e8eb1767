pub mod policy;

pub use policy::{FirstLegalPolicy, Policy, PolicyContext, PolicyKind, RandomPolicy};
