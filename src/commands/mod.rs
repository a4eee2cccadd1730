pub mod render;
pub mod serve;
