pub mod json_audit_logger;
pub mod memory_audit_logger;
