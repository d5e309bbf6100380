//! CLI commands for noteo

pub mod add;
pub mod dispatch;
pub mod helpers;
pub mod init;
pub mod ls;
pub mod mv;
pub mod tag;
