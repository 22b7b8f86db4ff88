//! Page templates (`templates/*.html`, compiled in by askama).

use askama::Template;

use super::{alert::Alert, page::Page};

/// Everything the base layout and the individual pages read.
#[derive(Clone, Debug)]
pub struct PageContext {
    pub page: Page,
    pub csrf_token: String,
    pub alert: Option<Alert>,
    pub rsvped: Option<String>,
    pub google_api_key: Option<String>,
    pub days_left: i64,
    pub photos: Vec<String>,
    pub redirect: String,
}

impl PageContext {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            page,
            csrf_token: String::new(),
            alert: None,
            rsvped: None,
            google_api_key: None,
            days_left: 0,
            photos: Vec::new(),
            redirect: Page::Index.path().to_string(),
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.page.name() == name
    }

    pub fn title(&self) -> &'static str {
        self.page.title()
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "about-us.html")]
struct AboutUsTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "the-wedding.html")]
struct TheWeddingTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "chicago.html")]
struct ChicagoTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "accommodations.html")]
struct AccommodationsTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "photos.html")]
struct PhotosTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "rsvp.html")]
struct RsvpTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "about-website.html")]
struct AboutWebsiteTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "rsvp-submitted.html")]
struct RsvpSubmittedTemplate<'a> {
    ctx: &'a PageContext,
}

#[derive(Template)]
#[template(path = "rsvp-error.html")]
struct RsvpErrorTemplate<'a> {
    ctx: &'a PageContext,
    error: &'a str,
}

/// Render one of the named pages.
///
/// # Errors
/// Returns the template engine's error.
pub fn render_page(ctx: &PageContext) -> askama::Result<String> {
    match ctx.page {
        Page::Index => IndexTemplate { ctx }.render(),
        Page::Login => LoginTemplate { ctx }.render(),
        Page::AboutUs => AboutUsTemplate { ctx }.render(),
        Page::TheWedding => TheWeddingTemplate { ctx }.render(),
        Page::Chicago => ChicagoTemplate { ctx }.render(),
        Page::Accommodations => AccommodationsTemplate { ctx }.render(),
        Page::Photos => PhotosTemplate { ctx }.render(),
        Page::Rsvp => RsvpTemplate { ctx }.render(),
        Page::AboutWebsite => AboutWebsiteTemplate { ctx }.render(),
    }
}

/// # Errors
/// Returns the template engine's error.
pub fn render_rsvp_submitted(ctx: &PageContext) -> askama::Result<String> {
    RsvpSubmittedTemplate { ctx }.render()
}

/// # Errors
/// Returns the template engine's error.
pub fn render_rsvp_error(ctx: &PageContext, error: &str) -> askama::Result<String> {
    RsvpErrorTemplate { ctx, error }.render()
}
