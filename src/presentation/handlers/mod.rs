mod health;
mod index;
mod upload;

pub use health::{HealthResponse, health_handler};
pub use index::index_handler;
pub use upload::{ErrorResponse, UploadResponse, upload_handler};
