use serde::Deserialize;

pub mod movie;
pub mod rating;
pub mod user;

pub use movie::{
    CastMember, Genre, MovieDetail, MovieSummary, Recommendation, TOP_BILLED, UNKNOWN_DIRECTOR,
};
pub use rating::{valid_stars, Rating, MAX_REVIEW_LEN, MAX_STARS, MIN_STARS};
pub use user::{normalize_movie_id, MovieList, User};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from GET /movie/{id}?append_to_response=credits
///
/// TMDB may send `null` for any field, so everything past `id` is optional
/// and defaulted when converted.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Option<Vec<TmdbCastMember>>,
    #[serde(default)]
    pub crew: Option<Vec<TmdbCrewMember>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCastMember {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
}

/// Paged listing response (popular, recommendations)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Option<Vec<TmdbListMovie>>,
}

impl TmdbPage {
    pub fn into_summaries(self) -> Vec<MovieSummary> {
        self.results
            .unwrap_or_default()
            .into_iter()
            .map(MovieSummary::from)
            .collect()
    }
}

/// Movie entry inside a paged listing
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub adult: Option<bool>,
}

// TMDB sends empty strings and zero runtimes for unknown values
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn known_runtime(runtime: Option<u32>) -> Option<u32> {
    runtime.filter(|minutes| *minutes > 0)
}

impl From<TmdbMovie> for MovieDetail {
    fn from(movie: TmdbMovie) -> Self {
        let credits = movie.credits.unwrap_or_default();

        let director = credits
            .crew
            .unwrap_or_default()
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .and_then(|member| non_empty(member.name));

        MovieDetail {
            id: movie.id.to_string(),
            title: non_empty(movie.title),
            poster_path: movie.poster_path,
            release_date: non_empty(movie.release_date),
            genres: movie
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name.unwrap_or_default(),
                })
                .collect(),
            director,
            // nameless cast entries can never match a profile
            cast: credits
                .cast
                .unwrap_or_default()
                .into_iter()
                .filter_map(|c| non_empty(c.name))
                .map(|name| CastMember { name })
                .collect(),
            rating: movie.vote_average,
            runtime: known_runtime(movie.runtime),
            adult: movie.adult.unwrap_or_default(),
        }
    }
}

impl From<TmdbListMovie> for MovieSummary {
    fn from(movie: TmdbListMovie) -> Self {
        MovieSummary {
            id: movie.id.to_string(),
            title: non_empty(movie.title),
            poster_path: movie.poster_path,
            release_date: non_empty(movie.release_date),
            rating: movie.vote_average,
            runtime: known_runtime(movie.runtime),
            adult: movie.adult.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_movie_to_detail_picks_first_director() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/inception.jpg",
            "release_date": "2010-07-15",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "vote_average": 8.4,
            "runtime": 148,
            "adult": false,
            "credits": {
                "cast": [{"name": "Leonardo DiCaprio"}, {"name": "Joseph Gordon-Levitt"}],
                "crew": [
                    {"name": "Hans Zimmer", "job": "Original Music Composer"},
                    {"name": "Christopher Nolan", "job": "Director"},
                    {"name": "Someone Else", "job": "Director"}
                ]
            }
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let detail: MovieDetail = movie.into();

        assert_eq!(detail.id, "27205");
        assert_eq!(detail.director.as_deref(), Some("Christopher Nolan"));
        assert_eq!(detail.genres.len(), 2);
        assert_eq!(detail.genres[0].id, 28);
        assert_eq!(detail.cast[0].name, "Leonardo DiCaprio");
        assert_eq!(detail.runtime, Some(148));
        assert_eq!(detail.rating, Some(8.4));
    }

    #[test]
    fn test_tmdb_movie_without_credits_has_no_director() {
        let json = r#"{"id": 1, "title": "", "release_date": "", "runtime": 0}"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let detail: MovieDetail = movie.into();

        assert_eq!(detail.director, None);
        assert!(detail.cast.is_empty());
        assert_eq!(detail.title, None);
        assert_eq!(detail.release_date, None);
        assert_eq!(detail.runtime, None);
        assert_eq!(detail.rating, None);
        assert!(!detail.adult);
    }

    #[test]
    fn test_tmdb_page_to_summaries() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "vote_average": 8.4, "adult": false},
                {"id": 13, "title": "Forrest Gump", "vote_average": 8.5, "adult": true}
            ]
        }"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        let summaries = page.into_summaries();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "550");
        assert_eq!(summaries[0].runtime, None);
        assert!(summaries[1].adult);
    }

    #[test]
    fn test_tmdb_page_missing_results_is_empty() {
        let page: TmdbPage = serde_json::from_str(r#"{"page": 1}"#).unwrap();
        assert!(page.into_summaries().is_empty());

        let page: TmdbPage = serde_json::from_str(r#"{"page": 1, "results": null}"#).unwrap();
        assert!(page.into_summaries().is_empty());
    }

    #[test]
    fn test_tmdb_movie_tolerates_null_fields() {
        let json = r#"{
            "id": 1,
            "title": null,
            "genres": null,
            "adult": null,
            "vote_average": null,
            "runtime": null,
            "credits": {
                "cast": [{"name": null}, {"name": "Tilda Swinton"}],
                "crew": null
            }
        }"#;

        let movie: TmdbMovie = serde_json::from_str(json).unwrap();
        let detail: MovieDetail = movie.into();

        assert!(!detail.adult);
        assert!(detail.genres.is_empty());
        assert_eq!(detail.director, None);
        assert_eq!(detail.cast.len(), 1);
        assert_eq!(detail.cast[0].name, "Tilda Swinton");
    }

    #[test]
    fn test_tmdb_list_movie_null_adult_is_not_adult() {
        let json = r#"{"results": [{"id": 7, "adult": null, "genre_ids": null}]}"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        let summaries = page.into_summaries();

        assert_eq!(summaries.len(), 1);
        assert!(!summaries[0].adult);
    }
}
