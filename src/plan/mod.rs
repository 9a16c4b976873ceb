pub mod catalog;
pub mod gate;
