//! Console summary of fetched stars

use std::fmt::Write;

use crate::core::models::StarRecord;

const MISSING: &str = "N/A";

/// Render the per-repository listing printed after a successful fetch
pub fn format_star_summary(username: &str, records: &[StarRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nFound {} starred repositories for user '{}':\n",
        records.len(),
        username
    );

    for record in records {
        let repo = &record.repo;
        let stars = repo
            .star_count()
            .map(|s| s.to_string())
            .unwrap_or_else(|| MISSING.to_string());

        let _ = writeln!(out, "  - {}", repo.full_name);
        let _ = writeln!(out, "    Language: {}", repo.language_name().unwrap_or(MISSING));
        let _ = writeln!(out, "    Stars: {}", stars);
        let _ = writeln!(
            out,
            "    Starred At: {}\n",
            record.starred_at_str().unwrap_or(MISSING)
        );
    }

    out
}
