pub mod anki;
pub mod core;
pub mod parser;
pub mod persistence;
pub mod render;
pub mod sync;
pub mod vault;
