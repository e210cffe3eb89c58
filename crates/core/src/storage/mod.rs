pub mod codec;
pub mod kv;
pub mod mirror;
