//! Data models for Bookhaven

pub mod author;
pub mod book;
pub mod category;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookFormat, BookQuery, CreateBook, UpdateBook};
pub use category::Category;
pub use user::{Claims, Role, User};
