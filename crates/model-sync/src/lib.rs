//! Keeps the selected chat model consistent with the shared model catalog:
//! the reconciliation pass that repairs stale selections, and the
//! fetch → confirm → merge workflow that replaces one provider's model list.

pub mod error;
pub mod reconcile;
pub mod refresh;

pub use {
    error::RefreshError,
    reconcile::{ReconcilePlan, SlotOutcome, plan, reconcile, select_compress_provider, select_provider},
    refresh::{AuthHeaders, RefreshOutcome, RefreshState, RefreshUi, RefreshWorkflow},
};
