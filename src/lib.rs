pub mod circuit;
pub mod common;
pub mod constants;
pub mod game;
pub mod level;
pub mod line;
pub mod utils;
pub mod visitor;
