pub mod global_id;
mod macros;
