//! Student page generation.
//!
//! Renders the page template with the assignment prompt embedded and writes
//! the result into the deployable site directory. The prompt lands in two
//! contexts: the visible assignment line, where the HTML auto-escaper
//! applies, and the page script, where `tojson` encodes it as a JSON string
//! literal. Neither context lets caller text break out into markup.

use std::path::{Path, PathBuf};

use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use easel_core::{defaults, Error, Result};

const STUDENT_PAGE_TEMPLATE: &str = include_str!("templates/student.html");

// The ".html" template name switches minijinja's HTML auto-escaping on.
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("student.html", STUDENT_PAGE_TEMPLATE)
        .expect("student page template parses");
    env
});

/// Render the student page with the assignment prompt embedded.
pub fn render_student_page(prompt: &str) -> Result<String> {
    let template = TEMPLATES
        .get_template("student.html")
        .map_err(|e| Error::Template(format!("Student page template missing: {}", e)))?;
    template
        .render(context! { prompt })
        .map_err(|e| Error::Template(format!("Failed to render student page: {}", e)))
}

/// Write the rendered page into the site directory, creating it if needed.
///
/// Returns the path of the written page.
pub async fn write_site(site_dir: &Path, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(site_dir).await.map_err(|e| {
        warn!(dir = %site_dir.display(), error = %e, "site: create_dir_all failed");
        e
    })?;

    let full_path = site_dir.join(defaults::STUDENT_PAGE_FILENAME);

    // Atomic write: temp file + rename
    let temp_path = full_path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).await.map_err(|e| {
        warn!(temp_path = %temp_path.display(), error = %e, "site: File::create failed");
        e
    })?;
    file.write_all(html.as_bytes()).await.map_err(|e| {
        warn!(error = %e, "site: write_all failed");
        e
    })?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&temp_path, &full_path).await.map_err(|e| {
        warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "site: rename failed");
        e
    })?;

    // Set permissions to 0644 (rw-r--r--, no execute)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
    }

    debug!(path = %full_path.display(), size = html.len(), "site: student page written");
    Ok(full_path)
}
