use crate::config::MetadataConfig;
use crate::models::*;
use crate::services::catalog::MovieCatalog;
use crate::utils::year_from_date;
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Third-party movie metadata service. Implementations own their transport
/// and credentials.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn movie_details(&self, movie_id: MovieId) -> Result<Option<MovieDetails>>;
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>>;
}

/// Fixed set of provider records, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    details: HashMap<MovieId, MovieDetails>,
}

impl StaticMetadataProvider {
    pub fn new(details: impl IntoIterator<Item = MovieDetails>) -> Self {
        Self {
            details: details.into_iter().map(|d| (d.id, d)).collect(),
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for StaticMetadataProvider {
    async fn movie_details(&self, movie_id: MovieId) -> Result<Option<MovieDetails>> {
        Ok(self.details.get(&movie_id).cloned())
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let needle = query.to_lowercase();
        let mut hits: Vec<MovieSummary> = self
            .details
            .values()
            .filter(|d| d.title.to_lowercase().contains(&needle))
            .map(|d| MovieSummary {
                id: d.id,
                title: d.title.clone(),
                release_date: d.release_date.clone(),
                poster_path: d.poster_path.clone(),
            })
            .collect();
        hits.sort_by_key(|h| h.id);
        Ok(hits)
    }
}

/// Converts a provider record into a local catalog entry.
pub fn movie_from_details(details: &MovieDetails, config: &MetadataConfig) -> Movie {
    let genre = details
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let year = details.release_date.as_deref().and_then(year_from_date);
    let poster_url = details
        .poster_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", config.poster_base_url, p))
        .unwrap_or_default();

    Movie {
        id: details.id,
        title: details.title.clone(),
        genre,
        year,
        description: details.overview.clone().unwrap_or_default(),
        poster_url,
        release_year: year,
    }
}

/// Where a resolved movie came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Already in the local catalog.
    Local(Movie),
    /// Fetched from the metadata provider and written into the catalog.
    Imported(Movie),
}

impl Resolved {
    pub fn movie(&self) -> &Movie {
        match self {
            Resolved::Local(movie) | Resolved::Imported(movie) => movie,
        }
    }

    pub fn into_movie(self) -> Movie {
        match self {
            Resolved::Local(movie) | Resolved::Imported(movie) => movie,
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, Resolved::Imported(_))
    }
}

/// Looks movies up locally first and falls back to the metadata provider,
/// caching whatever the provider returns into the local catalog.
pub struct MovieResolver {
    catalog: Arc<dyn MovieCatalog>,
    provider: Option<Arc<dyn MetadataProvider>>,
    config: MetadataConfig,
}

impl MovieResolver {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        provider: Option<Arc<dyn MetadataProvider>>,
        config: MetadataConfig,
    ) -> Self {
        Self {
            catalog,
            provider,
            config,
        }
    }

    pub async fn resolve(&self, movie_id: MovieId) -> Result<Option<Movie>> {
        Ok(self.resolve_tracked(movie_id).await?.map(Resolved::into_movie))
    }

    /// Same lookup as `resolve`, but reports whether the catalog changed.
    pub async fn resolve_tracked(&self, movie_id: MovieId) -> Result<Option<Resolved>> {
        if let Some(movie) = self.catalog.get(movie_id).await? {
            return Ok(Some(Resolved::Local(movie)));
        }

        let Some(provider) = &self.provider else {
            return Ok(None);
        };

        let Some(details) = provider
            .movie_details(movie_id)
            .await
            .with_context(|| format!("Failed to fetch metadata for movie {}", movie_id))?
        else {
            warn!("Movie {} not found locally or at metadata provider", movie_id);
            return Ok(None);
        };

        let mut movie = movie_from_details(&details, &self.config);
        movie.id = movie_id;
        self.catalog.insert(movie.clone()).await?;

        info!("Cached movie {} ({}) from metadata provider", movie.id, movie.title);
        Ok(Some(Resolved::Imported(movie)))
    }

    /// Local title matches plus provider hits, with provider hits whose
    /// title already appears locally removed.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }

        let local = self.catalog.search_title(query).await?;
        let external = match &self.provider {
            Some(provider) => provider
                .search(query)
                .await
                .with_context(|| format!("Metadata search failed for {:?}", query))?,
            None => Vec::new(),
        };

        let local_titles: HashSet<String> = local.iter().map(|m| m.title.to_lowercase()).collect();
        let external = external
            .into_iter()
            .filter(|hit| !local_titles.contains(&hit.title.to_lowercase()))
            .collect();

        Ok(SearchResults {
            query: query.to_string(),
            local,
            external,
        })
    }
}
