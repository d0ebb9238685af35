//! Infrastructure layer for PoseMaster: paths, secrets and local files.

pub mod export;
pub mod paths;
pub mod secret_service;
pub mod upload;

pub use crate::export::export_history;
pub use crate::paths::PoseMasterPaths;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::upload::read_uploaded_image;
