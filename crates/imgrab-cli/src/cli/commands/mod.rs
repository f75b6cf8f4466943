//! CLI command handlers, one per file.

mod audit;
mod crawl;
mod status;

#[cfg(test)]
pub use audit::ask_remediation;
pub use audit::run_audit;
pub use crawl::run_crawl_command;
pub use status::run_status;
