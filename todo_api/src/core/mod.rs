pub mod service;
pub mod traits;

pub use service::{IdGenerator, TodoService};
pub use traits::TodoRepository;
