//! Mentor lint rules

pub mod cross_stack_reference;
pub mod no_construct_in_construct_id;
pub mod no_stack_in_construct_id;
pub mod pascal_case_construct_id;

// Re-export rule structs
pub use cross_stack_reference::CrossStackReference;
pub use no_construct_in_construct_id::NoConstructInConstructId;
pub use no_stack_in_construct_id::NoStackInConstructId;
pub use pascal_case_construct_id::PascalCaseConstructId;
