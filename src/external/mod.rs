pub mod analysis_backend;
pub mod http_backend;
pub mod proxy_client;

pub use analysis_backend::{AnalysisBackend, BackendError, UploadedFile};
pub use http_backend::HttpAnalysisBackend;
pub use proxy_client::HttpVisualizationSource;
