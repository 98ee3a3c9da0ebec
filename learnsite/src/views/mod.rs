pub mod catalog;
pub mod todos;
