use regex::Regex;
use std::sync::OnceLock;

/// Characters never allowed in generated file names.
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_STEM_CHARS: usize = 80;
const DEFAULT_STEM: &str = "link_preview";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

fn whitespace_runs() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").ok()).as_ref()
}

fn underscore_runs() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").ok()).as_ref()
}

/// Turn a page title into a safe, lower-case file name with the format's
/// extension.
///
/// ```
/// use linkpreview_render::export::{sanitize_filename, OutputFormat};
///
/// assert_eq!(
///     sanitize_filename("Hello: World / Again?", OutputFormat::Png),
///     "hello_world_again.png"
/// );
/// assert_eq!(sanitize_filename("***", OutputFormat::Pdf), "link_preview.pdf");
/// ```
pub fn sanitize_filename(title: &str, format: OutputFormat) -> String {
    let stripped: String = title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect();

    let spaced = match whitespace_runs() {
        Some(re) => re.replace_all(&stripped, "_").into_owned(),
        None => stripped.split_whitespace().collect::<Vec<_>>().join("_"),
    };
    let collapsed = match underscore_runs() {
        Some(re) => re.replace_all(&spaced, "_").into_owned(),
        None => spaced,
    };

    // Lower-casing can change the character count, so it happens before the cap.
    let limited: String = collapsed.to_lowercase().chars().take(MAX_STEM_CHARS).collect();
    let trimmed = limited.trim_end_matches('_');
    let stem = if trimmed.is_empty() { DEFAULT_STEM } else { trimmed };
    format!("{stem}.{}", format.extension())
}

/// Make a user-supplied file name end in the format's extension, replacing
/// the last `.suffix` when it is something else.
///
/// ```
/// use linkpreview_render::export::{enforce_extension, OutputFormat};
///
/// assert_eq!(enforce_extension("card.PNG", OutputFormat::Png), "card.PNG");
/// assert_eq!(enforce_extension("card.png", OutputFormat::Pdf), "card.pdf");
/// assert_eq!(enforce_extension("card", OutputFormat::Png), "card.png");
/// ```
pub fn enforce_extension(name: &str, format: OutputFormat) -> String {
    let ext = format.extension();
    if name.to_lowercase().ends_with(&format!(".{ext}")) {
        return name.to_string();
    }
    let stem = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
    format!("{stem}.{ext}")
}

/// File name of the preview: the user's choice with the right extension, or
/// one derived from the title.
pub fn output_file_name(user_choice: Option<&str>, title: &str, format: OutputFormat) -> String {
    match user_choice {
        Some(name) => enforce_extension(name, format),
        None => sanitize_filename(title, format),
    }
}

/// `<stem>_og_data.json` next to an image file name.
pub fn json_file_name(image_file_name: &str) -> String {
    let stem = image_file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(image_file_name);
    format!("{stem}_og_data.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NASTY: &[&str] = &[
        "",
        "   ",
        "<>:\"/\\|?*",
        "A perfectly normal title",
        "Tabs\tand\nnewlines   everywhere",
        "____leading and trailing____",
        "Ünïcödé — títle with émojis 🚀🚀🚀",
        "What? Why: because/when*never|ever<>",
    ];

    #[test]
    fn never_empty_never_forbidden_never_too_long() {
        let long = "word ".repeat(100);
        for title in NASTY.iter().copied().chain([long.as_str()]) {
            for format in [OutputFormat::Png, OutputFormat::Pdf] {
                let name = sanitize_filename(title, format);
                assert!(!name.is_empty(), "{title:?}");
                assert!(name.chars().count() <= 84, "{title:?} -> {name}");
                assert!(!name.contains(FORBIDDEN_CHARS), "{title:?} -> {name}");
                assert!(name.ends_with(&format!(".{}", format.extension())));
            }
        }
    }

    #[test]
    fn whitespace_and_underscores_collapse() {
        assert_eq!(
            sanitize_filename("a   b__c \t d", OutputFormat::Png),
            "a_b_c_d.png"
        );
        assert_eq!(sanitize_filename("trail   ", OutputFormat::Png), "trail.png");
    }

    #[test]
    fn stem_is_capped_at_eighty_characters() {
        let name = sanitize_filename(&"x".repeat(200), OutputFormat::Pdf);
        assert_eq!(name, format!("{}.pdf", "x".repeat(80)));
    }

    #[test]
    fn extension_replacement_only_touches_last_suffix() {
        assert_eq!(enforce_extension("my.card.txt", OutputFormat::Png), "my.card.png");
        assert_eq!(enforce_extension("out.PDF", OutputFormat::Pdf), "out.PDF");
    }

    #[test]
    fn json_name_follows_image_stem() {
        assert_eq!(json_file_name("hello_world.png"), "hello_world_og_data.json");
        assert_eq!(json_file_name("noext"), "noext_og_data.json");
    }

    #[test]
    fn output_name_prefers_user_choice() {
        assert_eq!(
            output_file_name(Some("mine.jpg"), "Ignored", OutputFormat::Png),
            "mine.png"
        );
        assert_eq!(
            output_file_name(None, "Derived Title", OutputFormat::Png),
            "derived_title.png"
        );
    }
}
