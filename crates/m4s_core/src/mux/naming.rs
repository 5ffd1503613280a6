//! Output file naming: title sanitization and collision-free paths.

use std::path::{Path, PathBuf};

/// Maximum length of the sanitized output title, in characters.
pub const MAX_TITLE_LEN: usize = 150;

/// Title used when both the descriptor and the folder name come up empty.
pub const FALLBACK_TITLE: &str = "converted_video";

/// Extension of the merged output artifact.
const OUTPUT_EXTENSION: &str = "mp4";

/// Sanitize a raw title for filesystem use.
///
/// Characters illegal in file names become underscores, whitespace runs
/// collapse to a single space, the result is trimmed and truncated to
/// [`MAX_TITLE_LEN`] characters. May return an empty string; the caller
/// is responsible for the fallback chain.
pub fn sanitize_title(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    // split_whitespace both collapses runs and trims the ends.
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TITLE_LEN).collect()
}

/// Compute a free output path `<dir>/<title>.mp4`.
///
/// On collision, `_1`, `_2`, ... suffixes are tried until a name is
/// free, so unrelated pre-existing files are never overwritten.
pub fn unique_output_path(dir: &Path, title: &str) -> PathBuf {
    let first = dir.join(format!("{}.{}", title, OUTPUT_EXTENSION));
    if !first.exists() {
        return first;
    }

    let mut count = 1u32;
    loop {
        let candidate = dir.join(format!("{}_{}.{}", title, count, OUTPUT_EXTENSION));
        if !candidate.exists() {
            return candidate;
        }
        count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn illegal_characters_become_underscores() {
        assert_eq!(sanitize_title("My:Video<1>"), "My_Video_1_");
        assert_eq!(sanitize_title(r#"a\b/c*d?e"f|g"#), "a_b_c_d_e_f_g");
    }

    #[test]
    fn whitespace_collapses_and_trims() {
        assert_eq!(sanitize_title("  a   title \t with\n gaps  "), "a title with gaps");
    }

    #[test]
    fn long_titles_truncate_to_limit() {
        let long = "x".repeat(400);
        assert_eq!(sanitize_title(&long).chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "你".repeat(200);
        assert_eq!(sanitize_title(&long).chars().count(), MAX_TITLE_LEN);
    }

    #[test]
    fn all_illegal_input_sanitizes_to_underscores() {
        assert_eq!(sanitize_title(":::"), "___");
        assert_eq!(sanitize_title("   "), "");
    }

    #[test]
    fn collision_appends_counter() {
        let dir = tempdir().unwrap();

        let first = unique_output_path(dir.path(), "Title");
        assert_eq!(first, dir.path().join("Title.mp4"));
        File::create(&first).unwrap();

        let second = unique_output_path(dir.path(), "Title");
        assert_eq!(second, dir.path().join("Title_1.mp4"));
        File::create(&second).unwrap();

        let third = unique_output_path(dir.path(), "Title");
        assert_eq!(third, dir.path().join("Title_2.mp4"));
    }
}
