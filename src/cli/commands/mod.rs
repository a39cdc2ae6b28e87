mod command_result;
pub mod init;
pub mod transform;

pub use command_result::*;
