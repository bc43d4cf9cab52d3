pub mod cancel_policy;
pub mod count_estimate;
pub mod frequency;
pub mod predicate;
pub mod resource_kind;
pub mod sort;
pub mod time_window;
