//! CLI commands for prodbench

pub mod bench;
pub mod dispatch;
pub mod init;
pub mod load;
