pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{AuditOutcome, config_from_args, perform_audit, write_default_config};
