use anyhow::{Context, Result};
use cinerec::services::catalog::{InMemoryCatalog, MovieCatalog};
use cinerec::services::metadata::{MetadataProvider, StaticMetadataProvider};
use cinerec::services::ratings::{InMemoryRatings, RatingsSource};
use cinerec::utils::validation::{parse_min_rating, parse_year, validate_query};
use cinerec::{init_tracing, AppState, Config, Movie, MovieDetails, MovieFilter, Rating};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const MAX_QUERY_LENGTH: usize = 200;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// JSON file holding `ratings`, `movies` and optional `metadata` arrays
    #[arg(short, long, default_value = "data/corpus.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend movies for a user
    Recommend {
        #[arg(short, long)]
        user: i64,
    },
    /// Filter and page through the catalog
    Browse {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        min_rating: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Search local titles and the metadata records
    Search { query: String },
    /// Show one movie, importing it from the metadata records if needed
    Show { movie: i64 },
    /// Rate a movie and save the corpus
    Rate {
        #[arg(short, long)]
        user: i64,
        #[arg(short, long)]
        movie: i64,
        #[arg(short, long)]
        score: f64,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Corpus {
    #[serde(default)]
    ratings: Vec<Rating>,
    #[serde(default)]
    movies: Vec<Movie>,
    #[serde(default)]
    metadata: Vec<MovieDetails>,
}

impl Corpus {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Data file {} not found, starting with an empty corpus", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &args.log_level);
    }
    init_tracing();

    let config = if Path::new(&args.config).exists() {
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, using default configuration");
        Config::default()
    };

    let corpus = Corpus::load(&args.data)?;
    info!(
        "Loaded {} ratings, {} movies, {} metadata records",
        corpus.ratings.len(),
        corpus.movies.len(),
        corpus.metadata.len()
    );

    let provider: Option<Arc<dyn MetadataProvider>> = if corpus.metadata.is_empty() {
        None
    } else {
        Some(Arc::new(StaticMetadataProvider::new(corpus.metadata.clone())))
    };
    let ratings = InMemoryRatings::try_with_ratings(corpus.ratings.clone())
        .with_context(|| format!("Invalid rating in {}", args.data.display()))?;
    let state = AppState::new(
        config,
        Arc::new(ratings),
        Arc::new(InMemoryCatalog::with_movies(corpus.movies.clone())),
        provider,
    );

    match args.command {
        Command::Recommend { user } => {
            let response = state.recommendation_service.get_recommendations(user).await?;
            print_json(&response)?;
        }
        Command::Browse {
            genre,
            year,
            min_rating,
            query,
            page,
        } => {
            let filter = MovieFilter {
                genre,
                year: parse_year(year.as_deref()),
                min_rating: parse_min_rating(min_rating.as_deref()),
                query,
            };
            let page = state.catalog_service.filter_movies(&filter, page.as_deref()).await?;
            print_json(&page)?;
        }
        Command::Search { query } => {
            let query = validate_query(&query, MAX_QUERY_LENGTH)?;
            let results = state.movie_resolver.search(query).await?;
            print_json(&results)?;
        }
        Command::Show { movie } => match state.movie_resolver.resolve_tracked(movie).await? {
            Some(found) => {
                print_json(found.movie())?;
                if found.is_imported() {
                    save_state(&state, corpus, &args.data).await?;
                }
            }
            None => anyhow::bail!("Movie {} not found", movie),
        },
        Command::Rate { user, movie, score } => {
            let outcome = state.recommendation_service.rate(user, movie, score).await?;
            print_json(&outcome)?;
            save_state(&state, corpus, &args.data).await?;
        }
    }

    Ok(())
}

async fn save_state(state: &AppState, corpus: Corpus, path: &Path) -> Result<()> {
    let updated = Corpus {
        ratings: state.ratings.all_ratings().await?,
        movies: state.catalog.all().await?,
        metadata: corpus.metadata,
    };
    updated.save(path)
}
