use crate::config::CatalogConfig;
use crate::models::*;
use crate::services::ratings::RatingsSource;
use crate::utils::pagination::{Page, Paginator};
use crate::utils::average_scores;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Local movie records.
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn get(&self, movie_id: MovieId) -> Result<Option<Movie>>;
    /// The subset of `ids` that exist, in no particular order.
    async fn find_many(&self, ids: &[MovieId]) -> Result<Vec<Movie>>;
    async fn all(&self) -> Result<Vec<Movie>>;
    /// Case-insensitive title substring match.
    async fn search_title(&self, query: &str) -> Result<Vec<Movie>>;
    async fn insert(&self, movie: Movie) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryCatalog {
    movies: RwLock<BTreeMap<MovieId, Movie>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(movies: impl IntoIterator<Item = Movie>) -> Self {
        Self {
            movies: RwLock::new(movies.into_iter().map(|m| (m.id, m)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.movies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl MovieCatalog for InMemoryCatalog {
    async fn get(&self, movie_id: MovieId) -> Result<Option<Movie>> {
        Ok(self.movies.read().get(&movie_id).cloned())
    }

    async fn find_many(&self, ids: &[MovieId]) -> Result<Vec<Movie>> {
        let movies = self.movies.read();
        Ok(ids.iter().filter_map(|id| movies.get(id).cloned()).collect())
    }

    async fn all(&self) -> Result<Vec<Movie>> {
        Ok(self.movies.read().values().cloned().collect())
    }

    async fn search_title(&self, query: &str) -> Result<Vec<Movie>> {
        let needle = query.to_lowercase();
        Ok(self
            .movies
            .read()
            .values()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert(&self, movie: Movie) -> Result<()> {
        self.movies.write().insert(movie.id, movie);
        Ok(())
    }
}

/// Filtered, paginated browsing of the catalog with average ratings.
pub struct CatalogService {
    catalog: Arc<dyn MovieCatalog>,
    ratings: Arc<dyn RatingsSource>,
    paginator: Paginator,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn MovieCatalog>, ratings: Arc<dyn RatingsSource>, config: &CatalogConfig) -> Self {
        Self {
            catalog,
            ratings,
            paginator: Paginator::new(config.page_size),
        }
    }

    pub async fn filter_movies(&self, filter: &MovieFilter, page: Option<&str>) -> Result<Page<MovieWithAverage>> {
        let (movies, ratings) = futures::try_join!(self.catalog.all(), self.ratings.all_ratings())
            .context("Failed to load catalog for browsing")?;

        let averages = average_scores(&ratings);
        let genre = filter
            .genre
            .as_deref()
            .filter(|g| !g.is_empty() && *g != "All")
            .map(str::to_lowercase);
        let query = filter.query.as_deref().filter(|q| !q.is_empty()).map(str::to_lowercase);

        let matched: Vec<MovieWithAverage> = movies
            .into_iter()
            .filter(|m| genre.as_ref().map_or(true, |g| m.genre.to_lowercase().contains(g)))
            .filter(|m| filter.year.map_or(true, |y| m.release_year == Some(y)))
            .filter(|m| query.as_ref().map_or(true, |q| m.title.to_lowercase().contains(q)))
            .map(|movie| {
                let avg_rating = averages.get(&movie.id).copied();
                MovieWithAverage { movie, avg_rating }
            })
            .filter(|m| match filter.min_rating {
                Some(min) => m.avg_rating.map_or(false, |avg| avg >= min),
                None => true,
            })
            .collect();

        info!("Browse matched {} movies for filter {:?}", matched.len(), filter);

        Ok(self.paginator.get_page(matched, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ratings::InMemoryRatings;

    fn service() -> CatalogService {
        let catalog = InMemoryCatalog::with_movies(vec![
            Movie::new(1, "Alien").with_genre("Horror, Science Fiction").with_release_year(1979),
            Movie::new(2, "Aliens").with_genre("Action, Science Fiction").with_release_year(1986),
            Movie::new(3, "Heat").with_genre("Crime, Drama").with_release_year(1995),
            Movie::new(4, "Ronin").with_genre("Action, Crime").with_release_year(1998),
        ]);
        let ratings = InMemoryRatings::with_ratings(vec![
            Rating::new(1, 1, 5.0),
            Rating::new(2, 1, 4.0),
            Rating::new(1, 2, 3.0),
            Rating::new(1, 3, 2.0),
        ]);
        CatalogService::new(Arc::new(catalog), Arc::new(ratings), &CatalogConfig { page_size: 2 })
    }

    #[tokio::test]
    async fn test_find_many_skips_missing() {
        let catalog = InMemoryCatalog::with_movies(vec![Movie::new(1, "Alien")]);
        let found = catalog.find_many(&[1, 99]).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_search_title_is_case_insensitive() {
        let catalog = InMemoryCatalog::with_movies(vec![Movie::new(1, "Alien"), Movie::new(2, "Heat")]);
        let found = catalog.search_title("ALI").await.unwrap();
        assert_eq!(found, vec![Movie::new(1, "Alien")]);
    }

    #[tokio::test]
    async fn test_filter_by_genre_and_year() {
        let service = service();

        let filter = MovieFilter {
            genre: Some("science".to_string()),
            year: Some(1986),
            ..MovieFilter::default()
        };
        let page = service.filter_movies(&filter, None).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].movie.id, 2);
    }

    #[tokio::test]
    async fn test_genre_all_disables_filter() {
        let service = service();

        let filter = MovieFilter {
            genre: Some("All".to_string()),
            ..MovieFilter::default()
        };
        let page = service.filter_movies(&filter, Some("2")).await.unwrap();
        assert_eq!(page.total_items, 4);
        assert_eq!(page.number, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_min_rating_excludes_unrated() {
        let service = service();

        let filter = MovieFilter {
            min_rating: Some(3.0),
            ..MovieFilter::default()
        };
        let page = service.filter_movies(&filter, None).await.unwrap();
        let ids: Vec<MovieId> = page.items.iter().map(|m| m.movie.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.items[0].avg_rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_title_query() {
        let service = service();

        let filter = MovieFilter {
            query: Some("alien".to_string()),
            ..MovieFilter::default()
        };
        let page = service.filter_movies(&filter, Some("abc")).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.number, 1);
    }
}
