pub mod assets;
pub mod attend;
pub mod config;
pub mod history;
pub mod init;
pub mod last;
pub mod log;
pub mod nearby;
pub mod status;
