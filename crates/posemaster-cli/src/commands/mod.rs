pub mod catalog;
pub mod init;
pub mod presets;
pub mod shoot;
