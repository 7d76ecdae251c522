//! Accumulation, reclassification and delivery of change rows.

mod dispatch;
mod reclassify;
mod recovery;
mod section;

pub use recovery::{
    ConfiguredRecovery, IgnoreFailures, PropagateFailures, RecoveryContext, RecoveryDecision,
    RecoveryPolicy,
};
pub use section::EventTypeSectionHandler;
