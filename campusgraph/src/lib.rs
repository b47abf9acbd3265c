pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_site_config, resolve_output_path, verbosity_level, write_default_config};
