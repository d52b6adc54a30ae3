pub mod content_client;
pub mod result_client;

pub use content_client::ContentClient;
pub use result_client::ResultClient;
