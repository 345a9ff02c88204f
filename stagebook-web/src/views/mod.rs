//! HTML rendering
//!
//! Pages are plain `format!` templates wrapped in a shared layout. Every
//! dynamic value goes through [`escape`].

pub mod artists;
pub mod errors;
pub mod forms;
pub mod pages;
pub mod shows;
pub mod venues;

/// One-off message shown at the top of a page after a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(text) => ("notice success", text),
            Notice::Error(text) => ("notice error", text),
        };
        format!(r#"<div class="{}">{}</div>"#, class, escape(text))
    }
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an optional value, or an empty string
pub(crate) fn escape_opt(raw: Option<&str>) -> String {
    raw.map(escape).unwrap_or_default()
}

pub(crate) fn genre_tags(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| format!(r#"<span class="genre">{}</span>"#, escape(g)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap page content in the site layout
pub fn layout(title: &str, notice: Option<&Notice>, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Stagebook</title>
    <style>
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            line-height: 1.6;
        }}
        nav a {{ margin-right: 16px; }}
        h1 {{
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }}
        .notice {{ padding: 10px; border-radius: 4px; margin: 10px 0; }}
        .notice.success {{ background: #e6f4ea; }}
        .notice.error {{ background: #fdecea; }}
        .genre {{ background: #eef; padding: 2px 6px; border-radius: 4px; }}
        .field-error {{ color: #b00020; }}
        .show-card {{ display: inline-block; width: 280px; margin: 8px; vertical-align: top; }}
        .show-card img {{ max-width: 100%; }}
    </style>
</head>
<body>
    <nav>
        <a href="/">Stagebook</a>
        <a href="/venues">Venues</a>
        <a href="/artists">Artists</a>
        <a href="/shows">Shows</a>
    </nav>
    {notice}
    {content}
</body>
</html>
"#,
        title = escape(title),
        notice = notice.map(Notice::render).unwrap_or_default(),
        content = content,
    )
}
