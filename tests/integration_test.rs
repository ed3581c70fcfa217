use cinerec::algorithms::{similarity_matrix, CollaborativeFiltering, RatingMatrix, RecommendationAlgorithm};
use cinerec::services::metadata::{MetadataProvider, StaticMetadataProvider};
use cinerec::services::ratings::RatingsSource;
use cinerec::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;

fn random_corpus(rng: &mut StdRng, users: i64, movies: i64, density: f64) -> Vec<Rating> {
    let mut ratings = Vec::new();
    for user_id in 0..users {
        for movie_id in 0..movies {
            if rng.gen_bool(density) {
                ratings.push(Rating::new(user_id, movie_id, rng.gen_range(1..=5) as f64));
            }
        }
    }
    ratings
}

fn catalog(count: i64) -> Vec<Movie> {
    (0..count)
        .map(|id| {
            Movie::new(id, format!("Movie {}", id))
                .with_genre(if id % 2 == 0 { "Drama" } else { "Comedy" })
                .with_release_year(1990 + (id % 10) as i32)
        })
        .collect()
}

#[test]
fn test_random_corpora_hold_invariants() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let ratings = random_corpus(&mut rng, 12, 40, 0.3);
        let target = rng.gen_range(0..14);
        let rated: HashSet<MovieId> = ratings
            .iter()
            .filter(|r| r.user_id == target)
            .map(|r| r.movie_id)
            .collect();

        let rec = recommend(&ratings, target);

        assert!(rec.ranked.len() <= 10);
        assert!(rec.ranked.iter().all(|m| !rated.contains(&m.movie_id)));
        assert_eq!(rec.is_empty(), rec.reason.is_some());
        assert!(rec.ranked.iter().all(|m| m.score.is_finite()));
        assert_eq!(rec, recommend(&ratings, target));

        if rated.is_empty() && !ratings.is_empty() {
            assert_eq!(rec.reason, Some(ReasonCode::UserUnrated));
        }
    }
}

#[test]
fn test_similarity_is_symmetric_on_random_corpus() {
    let mut rng = StdRng::seed_from_u64(7);
    let ratings = random_corpus(&mut rng, 20, 30, 0.25);

    let matrix = RatingMatrix::from_ratings(&ratings);
    let sims = similarity_matrix(&matrix);

    for i in 0..matrix.num_users() {
        for j in 0..matrix.num_users() {
            assert_eq!(sims[[i, j]], sims[[j, i]]);
            assert!(!sims[[i, j]].is_nan());
        }
    }
}

#[test]
fn test_reason_codes_in_order() {
    assert_eq!(recommend(&[], 1).reason, Some(ReasonCode::NoData));

    let others_only = vec![Rating::new(2, 1, 4.0), Rating::new(3, 1, 5.0)];
    assert_eq!(recommend(&others_only, 1).reason, Some(ReasonCode::UserUnrated));

    let orthogonal = vec![Rating::new(1, 1, 4.0), Rating::new(2, 2, 5.0)];
    assert_eq!(recommend(&orthogonal, 1).reason, Some(ReasonCode::NoSimilarUsers));

    let nothing_new = vec![Rating::new(1, 1, 4.0), Rating::new(1, 2, 2.0), Rating::new(2, 2, 5.0)];
    assert_eq!(recommend(&nothing_new, 1).reason, Some(ReasonCode::NoNewRecommendations));
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = Arc::new(CollaborativeFiltering::default());
    let ratings = Arc::new(vec![
        Rating::new(1, 1, 5.0),
        Rating::new(1, 2, 4.0),
        Rating::new(2, 1, 5.0),
        Rating::new(2, 2, 4.0),
        Rating::new(2, 3, 5.0),
        Rating::new(3, 2, 4.0),
        Rating::new(3, 4, 2.0),
    ]);

    let handles: Vec<_> = (1..=3)
        .map(|user| {
            let engine = engine.clone();
            let ratings = ratings.clone();
            std::thread::spawn(move || engine.recommend(&ratings, user))
        })
        .collect();

    let results: Vec<Recommendation> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (user, result) in (1..=3).zip(results) {
        assert_eq!(result, engine.recommend(&ratings, user));
    }
}

#[tokio::test]
async fn test_rate_then_recommend_flow() {
    let state = AppState::in_memory(Config::default(), Vec::new(), catalog(6), None);
    let service = &state.recommendation_service;

    let response = service.get_recommendations(1).await.unwrap();
    assert_eq!(response.reason, Some(ReasonCode::NoData));

    service.rate(1, 0, 5.0).await.unwrap();
    service.rate(1, 1, 4.0).await.unwrap();
    let response = service.get_recommendations(2).await.unwrap();
    assert_eq!(response.reason, Some(ReasonCode::UserUnrated));
    assert_eq!(response.message.as_deref(), Some("You have not rated any movies yet."));

    service.rate(2, 0, 5.0).await.unwrap();
    service.rate(2, 1, 4.0).await.unwrap();
    service.rate(2, 2, 5.0).await.unwrap();

    let response = service.get_recommendations(1).await.unwrap();
    assert_eq!(response.reason, None);
    let ids: Vec<MovieId> = response.recommendations.iter().map(|r| r.movie.id).collect();
    assert_eq!(ids, vec![2]);
    assert!((response.recommendations[0].score - 5.0).abs() < 1e-9);

    // re-rating replaces the earlier score rather than adding a row
    assert_eq!(service.rate(1, 0, 1.0).await.unwrap(), UpsertOutcome::Updated);
    assert_eq!(state.ratings.all_ratings().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_browse_and_resolve_flow() {
    let provider: Arc<dyn MetadataProvider> = Arc::new(StaticMetadataProvider::new(vec![MovieDetails {
        id: 603,
        title: "The Matrix".to_string(),
        genres: vec![Genre {
            id: 878,
            name: "Science Fiction".to_string(),
        }],
        release_date: Some("1999-03-31".to_string()),
        overview: None,
        poster_path: Some("/matrix.jpg".to_string()),
    }]));
    let state = AppState::in_memory(Config::default(), Vec::new(), catalog(12), Some(provider));

    let filter = MovieFilter {
        genre: Some("drama".to_string()),
        ..MovieFilter::default()
    };
    let page = state.catalog_service.filter_movies(&filter, Some("2")).await.unwrap();
    assert_eq!(page.total_items, 6);
    assert_eq!(page.num_pages, 2);
    assert_eq!(page.items.len(), 1);

    let movie = state.movie_resolver.resolve(603).await.unwrap().unwrap();
    assert_eq!(movie.release_year, Some(1999));

    let filter = MovieFilter {
        year: Some(1999),
        ..MovieFilter::default()
    };
    let page = state.catalog_service.filter_movies(&filter, None).await.unwrap();
    let ids: Vec<MovieId> = page.items.iter().map(|m| m.movie.id).collect();
    assert_eq!(ids, vec![9, 603]);

    let results = state.movie_resolver.search("matrix").await.unwrap();
    assert_eq!(results.local.len(), 1);
    assert!(results.external.is_empty());
}

#[test]
fn test_service_from_sync_context() {
    let state = AppState::in_memory(
        Config::default(),
        vec![Rating::new(1, 1, 5.0), Rating::new(2, 1, 4.0), Rating::new(2, 2, 3.0)],
        catalog(3),
        None,
    );

    let response = tokio_test::block_on(state.recommendation_service.get_recommendations(1)).unwrap();
    assert_eq!(response.recommendations.len(), 1);
    assert_eq!(response.recommendations[0].movie.id, 2);
}
