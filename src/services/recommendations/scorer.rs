use crate::models::MovieDetail;

use super::profile::TasteProfile;

/// A shared director counts double a shared genre or actor
pub const DIRECTOR_WEIGHT: u32 = 2;

/// Affinity of a candidate against the user's taste profile
///
/// Sum of the profile counts of each candidate genre, [`DIRECTOR_WEIGHT`]
/// times the count of its director, and the counts of its top-billed cast.
pub fn affinity(profile: &TasteProfile, candidate: &MovieDetail) -> u32 {
    let genres: u32 = candidate.genres.iter().map(|g| profile.genre(g.id)).sum();

    let director = candidate
        .director
        .as_deref()
        .map_or(0, |name| DIRECTOR_WEIGHT * profile.director(name));

    let actors: u32 = candidate.top_billed().map(|name| profile.actor(name)).sum();

    genres + director + actors
}
