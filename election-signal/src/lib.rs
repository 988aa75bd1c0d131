pub mod config;
pub mod dataset;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod scheduler;
pub mod scorer;
pub mod server;
pub mod store;
pub mod trainer;
pub mod traits;
pub mod types;

pub use types::*;
pub use config::Config;
pub use dataset::DatasetBuilder;
pub use fetcher::NewsApiClient;
pub use model::TextClassifier;
pub use pipeline::PipelineOrchestrator;
pub use scorer::Scorer;
pub use server::AppState;
pub use store::ArtifactStore;
pub use trainer::Trainer;
pub use traits::NewsSource;
