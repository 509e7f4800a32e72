pub mod conflict;
pub mod coordinator;
pub mod merge;

pub use conflict::{detect_conflicts, recommended_entity, Conflict};
pub use coordinator::Coordinator;
