use maud::{Markup, html};
use reelview_core::{CurrencyFormat, MoviePage, MovieRecord, TmdbClient};

use super::{layout, movie_grid, pagination};

pub fn home(page: &MoviePage, recent: &[MovieRecord], tmdb: &TmdbClient) -> Markup {
    let content = html! {
        @if !recent.is_empty() {
            section class="recently-viewed" {
                h2 { "Recently viewed" }
                (movie_grid(recent, tmdb))
            }
        }
        h2 { "Popular movies" }
        @if page.results.is_empty() {
            p class="empty" { "No movies to show right now." }
        } @else {
            (movie_grid(&page.results, tmdb))
        }
        (pagination(page, "/?"))
    };

    layout("Popular movies", "", content)
}

pub fn search_results(query: &str, page: &MoviePage, tmdb: &TmdbClient) -> Markup {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();

    let content = html! {
        h2 { "Results for \u{201c}" (query) "\u{201d}" }
        @if page.results.is_empty() {
            p class="empty" { "No movies matched your search." }
        } @else {
            (movie_grid(&page.results, tmdb))
        }
        (pagination(page, &format!("/search?query={encoded}&")))
    };

    layout(&format!("Search: {query}"), query, content)
}

/// Detail view. Money fields go through `currency`.
pub fn movie_detail(
    movie: &MovieRecord,
    tmdb: &TmdbClient,
    currency: &CurrencyFormat,
) -> Markup {
    let title = movie.title().unwrap_or("Untitled");
    let id = movie.id().unwrap_or_default();

    let mut facts: Vec<(&str, String)> = Vec::new();
    if let Some(date) = movie.release_date() {
        facts.push(("Released", date.to_string()));
    }
    if let Some(runtime) = movie.runtime() {
        facts.push(("Runtime", format!("{runtime} min")));
    }
    if let Some(rating) = movie.vote_average() {
        facts.push(("Rating", format!("{rating:.1}/10")));
    }
    let genres = movie.genres();
    if !genres.is_empty() {
        facts.push(("Genres", genres.join(", ")));
    }
    if let Some(budget) = movie.budget() {
        facts.push(("Budget", currency.format_value(budget)));
    }
    if let Some(revenue) = movie.revenue() {
        facts.push(("Revenue", currency.format_value(revenue)));
    }
    facts.retain(|(_, value)| !value.is_empty());

    let content = html! {
        article class="movie-detail" {
            @if let Some(poster) = tmdb.poster_url(movie.poster_path()) {
                img class="poster" src=(poster) alt=(title);
            }
            h1 { (title) }
            @if let Some(tagline) = movie.tagline() {
                p class="tagline" { (tagline) }
            }
            dl class="facts" {
                @for (label, value) in &facts {
                    dt { (label) }
                    dd { (value) }
                }
            }
            @if let Some(overview) = movie.overview() {
                p class="overview" { (overview) }
            }
            a class="play" href=(format!("/movie/{id}/play")) { "Play" }
        }
    };

    layout(title, "", content)
}

pub fn player(movie: &MovieRecord, player_url: &str) -> Markup {
    let title = movie.title().unwrap_or("Untitled");
    let content = html! {
        section class="player" {
            h1 { (title) }
            iframe src=(player_url) allowfullscreen {}
        }
    };
    layout(title, "", content)
}

pub fn error_page(message: &str) -> Markup {
    let content = html! {
        section class="error" {
            h1 { (message) }
            p { a href="/" { "Back to popular movies" } }
        }
    };
    layout(message, "", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tmdb() -> TmdbClient {
        TmdbClient::new("k").unwrap()
    }

    #[test]
    fn detail_formats_money_with_the_given_currency() {
        let movie = MovieRecord::new(json!({
            "id": 550,
            "title": "Fight Club",
            "budget": 63000000,
            "revenue": 100853753
        }));

        let us = movie_detail(&movie, &tmdb(), &CurrencyFormat::en_us()).into_string();
        assert!(us.contains("$63,000,000.00"));
        assert!(us.contains("$100,853,753.00"));

        let de = CurrencyFormat::for_locale("de-DE").unwrap();
        let html = movie_detail(&movie, &tmdb(), &de).into_string();
        assert!(html.contains("63.000.000,00 €"));
        assert!(html.contains("href=\"/movie/550/play\""));
    }

    #[test]
    fn detail_escapes_upstream_text() {
        let movie = MovieRecord::new(json!({
            "id": 1,
            "title": "Alien",
            "overview": "<script>alert(1)</script>",
            "budget": "<b>lots</b>"
        }));

        let html = movie_detail(&movie, &tmdb(), &CurrencyFormat::en_us()).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;lots&lt;/b&gt;"));
    }

    #[test]
    fn search_pagination_encodes_the_query() {
        let page = MoviePage::from_response(1, &json!({ "results": [], "total_pages": 2 }));
        let html = search_results("star wars", &page, &tmdb()).into_string();
        assert!(html.contains("/search?query=star+wars&amp;page=2"));
        assert!(html.contains("No movies matched"));
    }

    #[test]
    fn home_shows_recent_strip_only_when_present() {
        let page = MoviePage::from_response(1, &json!({}));
        let without = home(&page, &[], &tmdb()).into_string();
        assert!(!without.contains("Recently viewed"));

        let recent = [MovieRecord::new(json!({ "id": 1, "title": "Alien" }))];
        let with = home(&page, &recent, &tmdb()).into_string();
        assert!(with.contains("Recently viewed"));
        assert!(with.contains("Alien"));
    }

    #[test]
    fn player_embeds_the_url() {
        let movie = MovieRecord::new(json!({ "id": 1, "title": "Alien" }));
        let html = player(&movie, "https://moviesapi.club/movie/1").into_string();
        assert!(html.contains("<iframe src=\"https://moviesapi.club/movie/1\""));
    }
}
