// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler helpers for convenience
pub use handlers::{db_path, expand_cache_dir, parse_status_arg};
