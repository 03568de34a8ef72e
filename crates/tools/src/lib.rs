pub mod escape;
pub mod utf8;
