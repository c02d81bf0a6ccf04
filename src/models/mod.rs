pub mod api_key;
pub mod task;
pub mod user;

pub use api_key::ApiKey;
pub use task::{Task, TaskInput};
pub use user::User;
