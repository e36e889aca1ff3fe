pub mod client;
pub mod error;
pub mod report;

pub use client::{AuditClient, AuditRequest};
pub use error::AuditError;
pub use report::AuditReport;
