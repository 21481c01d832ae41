pub mod http_transport;
pub mod page_fetcher;

pub use http_transport::{HttpTransport, PostResponse, ReqwestTransport};
pub use page_fetcher::{PageFetcher, RenderingFetcher};
