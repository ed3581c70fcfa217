use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub recommendation: RecommendationConfig,
    pub catalog: CatalogConfig,
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Upper bound on the number of movies returned per request.
    pub max_results: usize,
    /// Neighbours must have a similarity strictly above this value.
    pub similarity_floor: f64,
    /// Lower bound substituted for a zero similarity sum during aggregation.
    pub denominator_epsilon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Prefix joined with a provider `poster_path` to build `Movie::poster_url`.
    pub poster_base_url: String,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            similarity_floor: 0.0,
            denominator_epsilon: 1e-9,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recommendation: RecommendationConfig::default(),
            catalog: CatalogConfig { page_size: 5 },
            metadata: MetadataConfig {
                poster_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let defaults = Config::default();
        let settings = config::Config::builder()
            .set_default("recommendation.max_results", defaults.recommendation.max_results as i64)?
            .set_default("recommendation.similarity_floor", defaults.recommendation.similarity_floor)?
            .set_default(
                "recommendation.denominator_epsilon",
                defaults.recommendation.denominator_epsilon,
            )?
            .set_default("catalog.page_size", defaults.catalog.page_size as i64)?
            .set_default("metadata.poster_base_url", defaults.metadata.poster_base_url)?
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CINEREC").prefix_separator("_").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recommendation.max_results == 0 {
            anyhow::bail!("recommendation.max_results must be greater than 0");
        }
        if !(self.recommendation.similarity_floor >= 0.0) {
            anyhow::bail!("recommendation.similarity_floor must be a non-negative number");
        }
        if !(self.recommendation.denominator_epsilon > 0.0) {
            anyhow::bail!("recommendation.denominator_epsilon must be positive");
        }
        if self.catalog.page_size == 0 {
            anyhow::bail!("catalog.page_size must be greater than 0");
        }
        Ok(())
    }
}
