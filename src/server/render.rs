// html rendering for browse pages

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::app::STATIC_PREFIX;
use crate::browse::BrowsePage;
use crate::utils::{
    format::{escape_html, format_bytes, format_timestamp, DEFAULT_PRECISION},
    paths::last_segment,
};

// everything but unreserved characters is escaped, "/" included
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// link to the browser page for a prefix
pub fn prefix_href(prefix: &str) -> String {
    format!("?prefix={}", utf8_percent_encode(prefix, QUERY_VALUE))
}

/// render a folder/file listing
pub fn render_listing(bucket: &str, page: &BrowsePage) -> String {
    let mut html = String::new();
    push_head(&mut html, &format!("{bucket} | /{}", page.path));

    html.push_str("<main>");
    html.push_str(&format!(
        "<h1>Browsing Bucket: <code>{}</code></h1>",
        escape_html(bucket)
    ));

    if !page.path.is_empty() {
        html.push_str(&format!(
            "<p class=\"crumb\"><code>/{}</code></p>",
            escape_html(&page.path)
        ));
        html.push_str(&format!(
            "<a class=\"back\" href=\"{}\">&larr; Back</a>",
            escape_html(&prefix_href(&page.parent))
        ));
    }

    html.push_str("<ul class=\"list\">");

    for folder in &page.listing.folders {
        let modified = folder
            .last_modified
            .map(format_timestamp)
            .unwrap_or_else(|| "unknown".to_string());

        html.push_str(&format!(
            "<li class=\"folder\"><a href=\"{}\">{}/</a><small>Last Modified: {}</small></li>",
            escape_html(&prefix_href(&folder.prefix)),
            escape_html(&folder.name),
            modified
        ));
    }

    for file in &page.listing.files {
        html.push_str(&format!(
            "<li class=\"file\"><span>{}</span><small>{} &bull; Last Modified: {}</small></li>",
            escape_html(last_segment(&file.key)),
            format_bytes(file.size, DEFAULT_PRECISION),
            format_timestamp(file.last_modified)
        ));
    }

    if page.listing.is_empty() {
        html.push_str("<li class=\"empty\">No files or folders found.</li>");
    }

    html.push_str("</ul></main>");
    push_footer(&mut html);
    html
}

/// page shown when direct access to a reserved folder is refused
pub fn render_forbidden() -> String {
    render_message(
        "403 Forbidden",
        "You cannot access this folder directly.",
    )
}

/// page shown when the listing could not be produced
pub fn render_failure() -> String {
    render_message(
        "Something went wrong",
        "The bucket could not be listed right now. Please try again later.",
    )
}

fn render_message(title: &str, message: &str) -> String {
    let mut html = String::new();
    push_head(&mut html, title);
    html.push_str(&format!(
        "<main class=\"message\"><h1>{}</h1><p>{}</p><a href=\"?prefix=\">Bucket root</a></main>",
        escape_html(title),
        escape_html(message)
    ));
    push_footer(&mut html);
    html
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>");
    html.push_str("<html lang=\"en\"><head>");
    html.push_str("<meta charset=\"utf-8\">");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    html.push_str(&format!(
        "<meta name=\"generator\" content=\"s3browse v{}\">",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str(&format!(
        "<link rel=\"icon\" href=\"{STATIC_PREFIX}/icon.svg\">"
    ));
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{STATIC_PREFIX}/style.css\">"
    ));
    html.push_str("</head><body><div class=\"wrapper\">");
}

fn push_footer(html: &mut String) {
    html.push_str(&format!(
        "<footer><p>Generated by <code>s3browse v{}</code></p></footer>",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("</div></body></html>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{FolderEntry, ListingResult};
    use crate::store::ObjectSummary;
    use chrono::{TimeZone, Utc};

    fn page(path: &str, listing: ListingResult) -> BrowsePage {
        BrowsePage {
            path: path.to_string(),
            parent: crate::utils::paths::parent(path),
            listing,
        }
    }

    #[test]
    fn test_prefix_href_encoding() {
        assert_eq!(prefix_href(""), "?prefix=");
        assert_eq!(prefix_href("a/b c/"), "?prefix=a%2Fb%20c%2F");
        assert_eq!(prefix_href("x&y=z/"), "?prefix=x%26y%3Dz%2F");
    }

    #[test]
    fn test_renders_folders_and_files() {
        let ts = Utc.with_ymd_and_hms(2024, 4, 5, 6, 7, 8).unwrap();
        let listing = ListingResult {
            folders: vec![
                FolderEntry {
                    name: "fresh".to_string(),
                    prefix: "docs/fresh/".to_string(),
                    last_modified: Some(ts),
                },
                FolderEntry {
                    name: "stale".to_string(),
                    prefix: "docs/stale/".to_string(),
                    last_modified: None,
                },
            ],
            files: vec![ObjectSummary {
                key: "docs/<report>.pdf".to_string(),
                size: 1536,
                last_modified: ts,
            }],
        };

        let html = render_listing("media", &page("docs/", listing));

        assert!(html.contains("Browsing Bucket: <code>media</code>"));
        assert!(html.contains("href=\"?prefix=\">&larr; Back"));
        assert!(html.contains("href=\"?prefix=docs%2Ffresh%2F\">fresh/</a>"));
        assert!(html.contains("Last Modified: 2024-04-05 06:07:08"));
        assert!(html.contains("Last Modified: unknown"));
        assert!(html.contains("&lt;report&gt;.pdf"));
        assert!(html.contains("1.5 KB &bull; Last Modified: 2024-04-05 06:07:08"));
        assert!(!html.contains("No files or folders found."));
    }

    #[test]
    fn test_root_has_no_back_link() {
        let html = render_listing("media", &page("", ListingResult::default()));

        assert!(!html.contains("Back"));
        assert!(html.contains("No files or folders found."));
    }

    #[test]
    fn test_forbidden_page() {
        let html = render_forbidden();
        assert!(html.contains("403 Forbidden"));
        assert!(html.contains("You cannot access this folder directly."));
    }
}
