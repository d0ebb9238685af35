//! Remote boundaries for PoseMaster: the Gemini gateway, the HTTP image
//! fetcher and the preset catalogs.

pub mod gemini_gateway;
pub mod http_image_fetcher;
pub mod presets;

pub use gemini_gateway::GeminiGateway;
pub use http_image_fetcher::HttpImageFetcher;
