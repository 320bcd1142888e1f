use crate::router::{PathParams, Router, RouterError};
use crate::store::Post;

// Route names for the post resource (registered by `server::post_routes`)
const SHOW_ROUTE: &str = "post";

// HTML tag constants
const TAG_H1_OPEN: &str = "<h1>";
const TAG_H1_CLOSE: &str = "</h1>";
const TAG_P_OPEN: &str = "<p>";
const TAG_P_CLOSE: &str = "</p>";
const TAG_UL_OPEN: &str = "<ul>";
const TAG_UL_CLOSE: &str = "</ul>";
const TAG_LI_OPEN: &str = "<li>";
const TAG_LI_CLOSE: &str = "</li>";
const TAG_A_OPEN: &str = "<a href=\"";
const TAG_A_MIDDLE: &str = "\">";
const TAG_A_CLOSE: &str = "</a>";

const INDEX_HEADING: &str = "Posts";
const ID_PARAM: &str = "id";

// ============================================================================
// RESOURCE LINKS
// ============================================================================

/// Lazily maps posts to `(display_text, href)` link pairs
///
/// The href is produced by reverse lookup against the post's detail route,
/// never by string concatenation; the display text is the post's title. Pure
/// transformation, evaluated as the iterator is consumed.
pub fn post_links<'a>(
    posts: &'a [Post],
    router: &'a Router,
) -> impl Iterator<Item = Result<(String, String), RouterError>> + 'a {
    posts.iter().map(|post| {
        let params = PathParams::new().with(ID_PARAM, post);
        let href = router.path_for(SHOW_ROUTE, &params)?;
        Ok((post.title().to_string(), href))
    })
}

// ============================================================================
// PAGE RENDERING
// ============================================================================

/// Renders the list page body: one anchor per post inside a `<ul>`
///
/// # Arguments
/// * `posts` - Posts in the order they should appear
/// * `router` - Route table used for reverse lookup of each href
///
/// # Returns
/// * `Ok(String)` - HTML body fragment
/// * `Err(RouterError)` - If the detail route is missing from the table
pub fn render_index(posts: &[Post], router: &Router) -> Result<String, RouterError> {
    let mut output = String::new();

    output.push_str(TAG_H1_OPEN);
    output.push_str(INDEX_HEADING);
    output.push_str(TAG_H1_CLOSE);

    output.push_str(TAG_UL_OPEN);
    for link in post_links(posts, router) {
        let (text, href) = link?;

        output.push_str(TAG_LI_OPEN);
        output.push_str(TAG_A_OPEN);
        output.push_str(&escape_html_attr(&href));
        output.push_str(TAG_A_MIDDLE);
        output.push_str(&escape_html_text(&text));
        output.push_str(TAG_A_CLOSE);
        output.push_str(TAG_LI_CLOSE);
    }
    output.push_str(TAG_UL_CLOSE);

    Ok(output)
}

/// Renders the detail page body: title in an `<h1>`, description in a `<p>`
pub fn render_show(post: &Post) -> String {
    let mut output = String::new();

    output.push_str(TAG_H1_OPEN);
    output.push_str(&escape_html_text(post.title()));
    output.push_str(TAG_H1_CLOSE);

    output.push_str(TAG_P_OPEN);
    output.push_str(&escape_html_text(post.description()));
    output.push_str(TAG_P_CLOSE);

    output
}

// ============================================================================
// HTML ESCAPING
// ============================================================================

/// Escapes HTML entities in attribute values (hrefs)
pub fn escape_html_attr(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escapes HTML entities in text content (titles, descriptions)
pub fn escape_html_text(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ============================================================================
// TESTS
// ============================================================================
