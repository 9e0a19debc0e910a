pub mod list;
pub mod todo;
pub mod user;

pub use list::{List, ListInput, ListUpdate, ListWithItems};
pub use todo::{ToDo, ToDoInput, ToDoUpdate};
pub use user::{User, UserQuery, UserRole};
