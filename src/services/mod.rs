pub mod cancellation;
pub mod reconciler;
pub mod side_effects;
