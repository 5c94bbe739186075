pub mod completions;
pub mod fuse;
pub mod humans;
pub mod recommend;
