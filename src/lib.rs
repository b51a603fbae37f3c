pub mod constants;
pub mod libs;
