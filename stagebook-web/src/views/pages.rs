//! Home page

use super::{layout, Notice};

pub fn home(notice: Option<&Notice>) -> String {
    layout(
        "Home",
        notice,
        r#"<h1>Stagebook</h1>
    <p>Find venues and artists, and book shows between them.</p>
    <ul>
        <li><a href="/venues/create">List a new venue</a></li>
        <li><a href="/artists/create">List a new artist</a></li>
        <li><a href="/shows/create">Post a show</a></li>
    </ul>
    <form method="post" action="/venues/search">
        <input type="search" name="search_term" placeholder="Find a venue">
        <button type="submit">Search venues</button>
    </form>
    <form method="post" action="/artists/search">
        <input type="search" name="search_term" placeholder="Find an artist">
        <button type="submit">Search artists</button>
    </form>"#,
    )
}
