mod auth;
mod pages;
mod students;

pub use auth::{login, logout, verify};
pub use pages::page;
pub use students::{create_student, delete_student, get_student, list_students};
