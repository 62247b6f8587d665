pub mod lighting;
pub mod motion;
pub mod render;
