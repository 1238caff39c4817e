//! Directory listing module
//!
//! Renders the HTML index generated for directories that have no index
//! document of their own.

use std::io;
use std::path::Path;
use tokio::fs;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Relative link target, percent-encoded, directories keep a trailing slash
    fn href(&self) -> String {
        let encoded = urlencoding::encode(&self.name);
        if self.is_dir {
            format!("{encoded}/")
        } else {
            encoded.into_owned()
        }
    }

    fn display_name(&self) -> String {
        let mut name = escape_html(&self.name);
        if self.is_symlink {
            name.push('@');
        } else if self.is_dir {
            name.push('/');
        }
        name
    }
}

/// Read a directory and return its entries sorted case-insensitively
///
/// Symlinks are reported as such, but count as directories when they point at one.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };

        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `display_path` (the decoded request path)
pub fn render(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);

    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.href(),
            entry.display_name()
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
