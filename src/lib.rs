pub mod algorithms;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use algorithms::recommend;
pub use config::Config;
pub use models::*;

use services::catalog::{CatalogService, InMemoryCatalog, MovieCatalog};
use services::metadata::{MetadataProvider, MovieResolver};
use services::ratings::{InMemoryRatings, RatingsSource};
use services::recommendation::RecommendationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ratings: Arc<dyn RatingsSource>,
    pub catalog: Arc<dyn MovieCatalog>,
    pub recommendation_service: Arc<RecommendationService>,
    pub catalog_service: Arc<CatalogService>,
    pub movie_resolver: Arc<MovieResolver>,
}

impl AppState {
    pub fn new(
        config: Config,
        ratings: Arc<dyn RatingsSource>,
        catalog: Arc<dyn MovieCatalog>,
        provider: Option<Arc<dyn MetadataProvider>>,
    ) -> Self {
        let config = Arc::new(config);

        let recommendation_service = Arc::new(RecommendationService::new(
            ratings.clone(),
            catalog.clone(),
            &config,
        ));

        let catalog_service = Arc::new(CatalogService::new(
            catalog.clone(),
            ratings.clone(),
            &config.catalog,
        ));

        let movie_resolver = Arc::new(MovieResolver::new(
            catalog.clone(),
            provider,
            config.metadata.clone(),
        ));

        Self {
            config,
            ratings,
            catalog,
            recommendation_service,
            catalog_service,
            movie_resolver,
        }
    }

    /// State backed by the in-process stores, seeded with the given data.
    pub fn in_memory(
        config: Config,
        ratings: Vec<Rating>,
        movies: Vec<Movie>,
        provider: Option<Arc<dyn MetadataProvider>>,
    ) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryRatings::with_ratings(ratings)),
            Arc::new(InMemoryCatalog::with_movies(movies)),
            provider,
        )
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
