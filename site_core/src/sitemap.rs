//! sitemap.xml generation for the public site

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://bpsdynamic.com";
pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteRoute {
    pub path: &'static str,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

const fn route(path: &'static str, change_frequency: ChangeFrequency, priority: f32) -> SiteRoute {
    SiteRoute {
        path,
        change_frequency,
        priority,
    }
}

pub const SITE_ROUTES: &[SiteRoute] = &[
    // Main pages
    route("/", ChangeFrequency::Monthly, 1.0),
    route("/about", ChangeFrequency::Monthly, 0.8),
    route("/contact", ChangeFrequency::Monthly, 0.8),
    route("/book-consultation", ChangeFrequency::Monthly, 0.8),
    // Services
    route("/services", ChangeFrequency::Monthly, 0.8),
    route("/services/cloud-migration", ChangeFrequency::Monthly, 0.7),
    route("/services/managed-services", ChangeFrequency::Monthly, 0.7),
    route("/services/application-development", ChangeFrequency::Monthly, 0.7),
    route("/services/cloud-consulting", ChangeFrequency::Monthly, 0.7),
    // Training
    route("/training", ChangeFrequency::Weekly, 0.8),
    route("/training/aws", ChangeFrequency::Weekly, 0.7),
    route("/training/gcp", ChangeFrequency::Weekly, 0.7),
    route("/training/azure", ChangeFrequency::Weekly, 0.7),
    route("/training/linux", ChangeFrequency::Weekly, 0.7),
    route("/training/openshift", ChangeFrequency::Weekly, 0.7),
    route("/training/automation", ChangeFrequency::Weekly, 0.7),
    // Events
    route("/events", ChangeFrequency::Weekly, 0.7),
    route("/events/aws-bootcamp", ChangeFrequency::Weekly, 0.6),
    route("/events/hackathon", ChangeFrequency::Weekly, 0.6),
    // Content
    route("/blog", ChangeFrequency::Weekly, 0.7),
    route("/resources", ChangeFrequency::Monthly, 0.6),
    // Policies
    route("/privacy-policy", ChangeFrequency::Yearly, 0.3),
    route("/terms-of-service", ChangeFrequency::Yearly, 0.3),
];

/// Comment emitted before the first route of each section.
const PAGE_GROUPS: &[(&str, &str)] = &[
    ("/", "Homepage"),
    ("/about", "About Us Page"),
    ("/services", "Services Pages"),
    ("/training", "Training Pages"),
    ("/book-consultation", "Consultation Booking"),
    ("/events", "Events/Programs"),
    ("/blog", "Blog/Resources"),
    ("/contact", "Contact Page"),
    ("/privacy-policy", "Policy Pages"),
];

fn group_label(path: &str) -> Option<&'static str> {
    PAGE_GROUPS
        .iter()
        .find(|(group_path, _)| *group_path == path)
        .map(|(_, label)| *label)
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[derive(Debug, Clone)]
pub struct SitemapGenerator<'a> {
    base_url: String,
    routes: &'a [SiteRoute],
}

impl Default for SitemapGenerator<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SitemapGenerator<'static> {
    pub fn new(base_url: &str) -> Self {
        Self::with_routes(base_url, SITE_ROUTES)
    }
}

impl<'a> SitemapGenerator<'a> {
    pub fn with_routes(base_url: &str, routes: &'a [SiteRoute]) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            routes,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_count(&self) -> usize {
        self.routes.len()
    }

    /// A route is a leaf when no other route lives below it.
    fn is_leaf(&self, route: &SiteRoute) -> bool {
        !self
            .routes
            .iter()
            .any(|other| other.path != route.path && other.path.starts_with(route.path))
    }

    pub fn render(&self, lastmod: NaiveDate) -> String {
        let lastmod = lastmod.format("%Y-%m-%d").to_string();
        let mut xml = String::new();

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n");
        xml.push_str("        xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
        xml.push_str("        xsi:schemaLocation=\"http://www.sitemaps.org/schemas/sitemap/0.9\n");
        xml.push_str("        http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd\">\n\n");

        let mut current_group: Option<&str> = None;

        for route in self.routes {
            if let Some(label) = group_label(route.path) {
                if current_group != Some(label) {
                    current_group = Some(label);
                    let _ = writeln!(xml, "  <!-- {} -->", label);
                }
            }

            let loc = escape_xml(&format!("{}{}", self.base_url, route.path));
            xml.push_str("  <url>\n");
            let _ = writeln!(xml, "    <loc>{}</loc>", loc);
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod);
            let _ = writeln!(xml, "    <changefreq>{}</changefreq>", route.change_frequency.as_str());
            let _ = writeln!(xml, "    <priority>{:.1}</priority>", route.priority);
            xml.push_str("  </url>\n");

            if current_group.is_some() && self.is_leaf(route) {
                xml.push('\n');
            }
        }

        xml.push_str("</urlset>");
        xml
    }

    /// Writes `sitemap.xml` into `public_dir`, creating the directory if needed.
    pub fn write_to(&self, public_dir: &Path, lastmod: NaiveDate) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(public_dir)?;

        let path = public_dir.join(SITEMAP_FILE_NAME);
        std::fs::write(&path, self.render(lastmod))?;

        tracing::info!(
            path = %path.display(),
            pages = self.page_count(),
            lastmod = %lastmod,
            "Sitemap written"
        );

        Ok(path)
    }
}
