pub mod task;
pub mod user;

pub use task::{DueTask, Task};
pub use user::{User, UserSummary};
