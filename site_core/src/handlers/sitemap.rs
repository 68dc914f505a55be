use crate::{sitemap::SitemapGenerator, AppState};
use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::IntoResponse,
};

pub async fn handle_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let generator = SitemapGenerator::new(&state.config.site.sitemap_base_url);
    let xml = generator.render(chrono::Utc::now().date_naive());

    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/xml; charset=utf-8"),
        )],
        xml,
    )
}
