//! Error pages

use super::layout;

pub fn not_found_page() -> String {
    layout(
        "Not Found",
        None,
        r#"<h1>404 Not Found</h1>
    <p>The page you were looking for does not exist.</p>
    <p><a href="/">Back to home</a></p>"#,
    )
}

pub fn server_error_page() -> String {
    layout(
        "Server Error",
        None,
        r#"<h1>500 Server Error</h1>
    <p>Something went wrong. Please try again later.</p>
    <p><a href="/">Back to home</a></p>"#,
    )
}
