//! Output filename derivation for rendered panels.

use std::sync::LazyLock;

use regex::Regex;
use storyboard_core::panel::Panel;

const MAX_SLUG_LEN: usize = 40;

static NON_ALPHANUMERIC_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z0-9]+").expect("slug pattern is valid"));

/// Lowercases `title` and collapses every run of other characters into a
/// single hyphen, capped at 40 characters.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let hyphenated = NON_ALPHANUMERIC_RUN.replace_all(&lowered, "-");
    let truncated: String = hyphenated
        .trim_matches('-')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    truncated.trim_end_matches('-').to_owned()
}

/// Filename for a rendered panel: `{n:02}-{slug}.png`.
#[must_use]
pub fn panel_filename(panel: &Panel) -> String {
    let slug = slugify(&panel.title);
    let slug = if slug.is_empty() {
        format!("panel-{}", panel.n)
    } else {
        slug
    };
    format!("{:02}-{slug}.png", panel.n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_filename_slugifies_title() {
        let panel = Panel::new(3, "The Big Chase!!", "run");
        assert_eq!(panel_filename(&panel), "03-the-big-chase.png");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  --Hello,   World!--  "), "hello-world");
    }

    #[test]
    fn test_slugify_truncates_to_forty_without_trailing_hyphen() {
        let title = "abcdefghij abcdefghij abcdefghij abcdefgh xyz";
        let slug = slugify(title);
        assert_eq!(slug, "abcdefghij-abcdefghij-abcdefghij-abcdefg");
        assert_eq!(slug.len(), 40);

        let slug = slugify("abcdefghij abcdefghij abcdefghij abcdefg hij");
        assert_eq!(slug, "abcdefghij-abcdefghij-abcdefghij-abcdefg");

        let slug = slugify("abcdefghij abcdefghij abcdefghij abcdef ghij");
        assert_eq!(slug, "abcdefghij-abcdefghij-abcdefghij-abcdef");
    }

    #[test]
    fn test_panel_filename_falls_back_when_slug_is_empty() {
        let panel = Panel::new(12, "!!!", "x");
        assert_eq!(panel_filename(&panel), "12-panel-12.png");
    }

    #[test]
    fn test_non_ascii_titles_become_hyphens() {
        let panel = Panel::new(1, "Über café", "x");
        assert_eq!(panel_filename(&panel), "01-ber-caf.png");
    }
}
