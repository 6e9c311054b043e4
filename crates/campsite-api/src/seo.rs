use std::fmt::Write;

use axum::{extract::State, http::header, response::IntoResponse};

use crate::auth::AppState;

pub const LANGUAGES: [&str; 5] = ["fr", "en", "es", "de", "nl"];

/// Public pages listed in the sitemap, relative to the language prefix.
pub const PAGES: [&str; 9] = [
    "/",
    "/a-propos/",
    "/infos-pratiques/",
    "/services/",
    "/hebergements/",
    "/activites/",
    "/reservations/reservation/",
    "/mentions-legales/",
    "/politique-de-confidentialite/",
];

pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.site_url),
    )
}

pub async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.site_url),
    )
}

pub fn render_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Disallow: /admin/\n\
         Disallow: /accounts/\n\
         Disallow: /private/\n\
         Disallow: /media/private/\n\
         Allow: /static/\n\
         Allow: /media/\n\
         Sitemap: {}/sitemap.xml\n",
        site_url
    )
}

/// One `<url>` per page and language, each listing every translation as an
/// `xhtml:link` alternate.
pub fn render_sitemap(site_url: &str) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );

    for lang in LANGUAGES {
        for page in PAGES {
            let _ = writeln!(xml, "  <url>");
            let _ = writeln!(xml, "    <loc>{}/{}{}</loc>", site_url, lang, page);
            for alt in LANGUAGES {
                let _ = writeln!(
                    xml,
                    "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}/{}{}\"/>",
                    alt, site_url, alt, page
                );
            }
            let _ = writeln!(xml, "    <changefreq>monthly</changefreq>");
            let _ = writeln!(xml, "    <priority>0.8</priority>");
            let _ = writeln!(xml, "  </url>");
        }
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robots_points_at_the_sitemap() {
        let robots = render_robots("https://camping.example");
        assert!(robots.starts_with("User-agent: *\n"));
        assert!(robots.contains("Disallow: /admin/\n"));
        assert!(robots.ends_with("Sitemap: https://camping.example/sitemap.xml\n"));
    }

    #[test]
    fn sitemap_lists_every_page_in_every_language() {
        let xml = render_sitemap("https://camping.example");
        assert_eq!(xml.matches("<url>").count(), PAGES.len() * LANGUAGES.len());
        assert!(xml.contains("<loc>https://camping.example/nl/hebergements/</loc>"));
        assert!(xml.contains(
            "<xhtml:link rel=\"alternate\" hreflang=\"de\" href=\"https://camping.example/de/activites/\"/>"
        ));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
