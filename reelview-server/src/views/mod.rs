//! Server-rendered HTML.
//!
//! Pages are compile-time `maud` templates; every interpolated value is
//! escaped by maud.

mod pages;

pub use pages::{error_page, home, movie_detail, player, search_results};

use maud::{DOCTYPE, Markup, PreEscaped, html};
use reelview_core::{MoviePage, MovieRecord, TmdbClient};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#141414;color:#eee}\
header{display:flex;gap:1rem;align-items:center;padding:1rem 2rem;background:#000}\
header a{color:#e50914;font-weight:bold;text-decoration:none;font-size:1.4rem}\
main{padding:1rem 2rem}\
.movie-grid{display:flex;flex-wrap:wrap;gap:1rem}\
.movie-card{width:160px;color:inherit;text-decoration:none}\
.movie-card img{width:160px;border-radius:4px}\
.pagination{display:flex;gap:1rem;margin:1.5rem 0}\
.pagination a{color:#e50914}\
.player iframe{width:100%;aspect-ratio:16/9;border:0}";

/// Shared document shell with the search bar.
pub(crate) fn layout(page_title: &str, query: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page_title) " - Reelview" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    a href="/" { "Reelview" }
                    form action="/search" method="get" {
                        input type="search" name="query" value=(query) placeholder="Search movies";
                        button type="submit" { "Search" }
                    }
                }
                main { (content) }
            }
        }
    }
}

/// Card linking to the detail page. Records without an id render nothing.
pub(crate) fn movie_card(movie: &MovieRecord, tmdb: &TmdbClient) -> Markup {
    let Some(id) = movie.id() else {
        return html! {};
    };
    let title = movie.title().unwrap_or("Untitled");

    html! {
        a class="movie-card" href=(format!("/movie/{id}")) {
            @if let Some(poster) = tmdb.poster_url(movie.poster_path()) {
                img src=(poster) alt=(title) loading="lazy";
            }
            div class="movie-title" { (title) }
            @if let Some(date) = movie.release_date() {
                div class="movie-date" { (date) }
            }
        }
    }
}

pub(crate) fn movie_grid<'a>(
    movies: impl IntoIterator<Item = &'a MovieRecord>,
    tmdb: &TmdbClient,
) -> Markup {
    html! {
        section class="movie-grid" {
            @for movie in movies {
                (movie_card(movie, tmdb))
            }
        }
    }
}

/// "Page X of Y" with previous/next links. `base` is the path plus any
/// query string that precedes the page parameter, e.g. `/search?query=alien&`.
pub(crate) fn pagination(page: &MoviePage, base: &str) -> Markup {
    html! {
        nav class="pagination" {
            @if page.has_previous() {
                a rel="prev" href=(format!("{base}page={}", page.page - 1)) { "Previous" }
            }
            span class="page-status" { "Page " (page.page) " of " (page.total_pages) }
            @if page.has_next() {
                a rel="next" href=(format!("{base}page={}", page.page + 1)) { "Next" }
            }
        }
    }
}
