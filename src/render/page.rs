// src/render/page.rs
// =============================================================================
// Assembles the widgets into a complete, self-contained HTML page.
//
// Layout:
//   header                      "GitHub Contributions"
//   notice                      development notice or "last updated" line
//   user stats
//   left column                 top repositories, languages
//   right column                OSS contributions, recent activity
//   summary line
//
// When loading fails outside a local context the page body is the error
// panel instead.
// =============================================================================

use maud::{html, Markup, DOCTYPE};

use super::text::format_date;
use super::widgets;
use crate::loader::{DataOrigin, DeployContext, Loaded};

pub const CONTAINER_ID: &str = "github-contributions";
const PAGE_TITLE: &str = "GitHub Contributions";

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif; margin: 0; padding: 2rem; color: #24292f; background: #fff; }
.github-contributions { max-width: 1100px; margin: 0 auto; }
.contributions-header p { color: #57606a; }
.github-stats { display: flex; gap: 2rem; margin: 1.5rem 0; }
.stat-item { display: flex; flex-direction: column; align-items: center; }
.stat-number { font-size: 1.6rem; font-weight: 600; }
.stat-label { color: #57606a; font-size: 0.9rem; }
.contributions-content { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
@media (max-width: 800px) { .contributions-content { grid-template-columns: 1fr; } }
.repos-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1rem; }
.repo-card { border: 1px solid #d0d7de; border-radius: 6px; padding: 1rem; }
.repo-card h4 { margin: 0 0 0.5rem; }
.repo-description { color: #57606a; font-size: 0.9rem; }
.repo-stats { display: flex; gap: 1rem; font-size: 0.85rem; }
.repo-language { margin-left: auto; color: #57606a; }
.language-bar { margin-bottom: 0.75rem; }
.language-info { display: flex; justify-content: space-between; font-size: 0.9rem; }
.language-progress { background: #eaeef2; border-radius: 4px; height: 8px; }
.language-fill { background: #2da44e; border-radius: 4px; height: 8px; }
.contribution-item, .activity-item { border-bottom: 1px solid #eaeef2; padding: 0.6rem 0; }
.contribution-meta, .activity-date { color: #57606a; font-size: 0.85rem; }
.contribution-meta { display: flex; gap: 1rem; }
.contribution-body { font-size: 0.85rem; margin-top: 0.3rem; }
.activity-item { display: flex; justify-content: space-between; gap: 1rem; }
.dev-notice { background: #fff8c5; border: 1px solid #d4a72c; border-radius: 6px; padding: 0.75rem 1rem; }
.static-data-notice { color: #57606a; font-size: 0.85rem; }
.error { background: #ffebe9; border: 1px solid #ff8182; border-radius: 6px; padding: 0.75rem 1rem; }
.github-summary { margin-top: 2rem; border-top: 1px solid #d0d7de; padding-top: 1rem; }
"#;

/// Renders the full page for a loaded document
pub fn render_page(loaded: &Loaded, context: DeployContext) -> Markup {
    let data = &loaded.document;

    let content = html! {
        div.github-contributions {
            div.contributions-header {
                h2 { "GitHub Contributions" }
                p { "Showcasing open source contributions and personal projects" }
            }

            (notice(loaded, context))

            (widgets::user_stats(&data.user))

            div.contributions-content {
                div.left-column {
                    (widgets::top_repositories(&data.repositories))
                    (widgets::language_stats(&data.repositories))
                }
                div.right-column {
                    (widgets::oss_contributions(&data.oss_contributions))
                    (widgets::recent_activity(&data.recent_activity))
                }
            }

            (widgets::summary(&data.stats))
        }
    };

    base_document(content)
}

/// Renders the page shown when the data could not be loaded
pub fn render_error_page(message: &str) -> Markup {
    let content = html! {
        div.error {
            p { "Failed to load GitHub data: " (message) }
            p { "Please try again later." }
        }
    };

    base_document(content)
}

fn notice(loaded: &Loaded, context: DeployContext) -> Markup {
    match loaded.origin {
        DataOrigin::Sample if context.is_local() => html! {
            div.dev-notice {
                h3 { "🚧 Development Mode" }
                p {
                    "Using sample data for demonstration. "
                    "Real GitHub data will be displayed when deployed."
                }
            }
        },
        DataOrigin::Sample => html! {},
        DataOrigin::StaticFile | DataOrigin::Live => html! {
            div.static-data-notice {
                p {
                    em {
                        "GitHub contributions data last updated: "
                        (format_date(loaded.document.generated_at))
                    }
                }
            }
        },
    }
}

fn base_document(content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (PAGE_TITLE) }
                style { (maud::PreEscaped(CSS)) }
            }
            body {
                div id=(CONTAINER_ID) {
                    (content)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributions::{build_document, sample_document};
    use crate::test_helpers::{raw_data, USERNAME};
    use chrono::{DateTime, Utc};
    use scraper::{Html, Selector};

    fn count(html: &str, selector: &str) -> usize {
        let document = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).count()
    }

    fn loaded(origin: DataOrigin) -> Loaded {
        let generated_at: DateTime<Utc> = "2024-03-04T00:00:00Z".parse().unwrap();
        let document = match origin {
            DataOrigin::Sample => sample_document(generated_at),
            _ => build_document(USERNAME, raw_data(), generated_at),
        };
        Loaded { document, origin }
    }

    #[test]
    fn test_page_structure() {
        let html = render_page(&loaded(DataOrigin::StaticFile), DeployContext::Deployed)
            .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>GitHub Contributions</title>"));
        assert_eq!(count(&html, "#github-contributions .github-contributions"), 1);
        assert_eq!(count(&html, ".left-column .top-repositories"), 1);
        assert_eq!(count(&html, ".left-column .language-stats"), 1);
        assert_eq!(count(&html, ".right-column .oss-contributions"), 1);
        assert_eq!(count(&html, ".right-column .recent-activity"), 1);
        assert_eq!(count(&html, ".github-summary"), 1);
        assert_eq!(count(&html, ".repo-card"), 3);
    }

    #[test]
    fn test_static_data_notice() {
        let html = render_page(&loaded(DataOrigin::StaticFile), DeployContext::Local)
            .into_string();

        assert_eq!(count(&html, ".static-data-notice"), 1);
        assert_eq!(count(&html, ".dev-notice"), 0);
        assert!(html.contains("last updated: Mar 4, 2024"));
    }

    #[test]
    fn test_live_data_gets_updated_notice() {
        let html = render_page(&loaded(DataOrigin::Live), DeployContext::Deployed).into_string();
        assert_eq!(count(&html, ".static-data-notice"), 1);
    }

    #[test]
    fn test_sample_data_gets_dev_notice_locally() {
        let html = render_page(&loaded(DataOrigin::Sample), DeployContext::Local).into_string();

        assert_eq!(count(&html, ".dev-notice"), 1);
        assert_eq!(count(&html, ".static-data-notice"), 0);
        // The sample has no contributions, so that widget is omitted
        assert_eq!(count(&html, ".oss-contributions"), 0);
        assert_eq!(count(&html, ".repo-card"), 6);
    }

    #[test]
    fn test_error_page() {
        let html = render_error_page("HTTP 503 <Service Unavailable>").into_string();

        assert_eq!(count(&html, "#github-contributions .error"), 1);
        assert!(html.contains("Failed to load GitHub data: HTTP 503 &lt;Service Unavailable&gt;"));
        assert!(html.contains("Please try again later."));
    }
}
