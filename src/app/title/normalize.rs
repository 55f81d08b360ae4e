//! Display titles derived from file names
//!
//! Used to name manifests after their file and as the fallback title for
//! filter lists that do not declare one.

/// Words whose casing is fixed regardless of title-casing
const CASING_CORRECTIONS: &[(&str, &str)] = &[
    ("ublock", "uBlock"),
    ("adblock", "AdBlock"),
    ("adguard", "AdGuard"),
    ("url", "URL"),
];

/// Turn a file name (without extension) into a display title
///
/// The name is split on every character that is neither a letter nor a
/// digit, each word is title-cased and the words are joined with single
/// spaces. Known brand names keep their customary casing.
///
/// # Examples
///
/// ```
/// use filterlist_index::app::title::make_list_title;
///
/// assert_eq!(make_list_title("bromite-extended"), "Bromite Extended");
/// assert_eq!(make_list_title("ublock"), "uBlock");
/// ```
pub fn make_list_title(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if let Some((_, fixed)) = CASING_CORRECTIONS
        .iter()
        .find(|(plain, _)| *plain == lower)
    {
        return (*fixed).to_string();
    }

    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last segment of a path with its final extension removed
///
/// `"lists/bromite-extended.txt"` becomes `"bromite-extended"`. A name that
/// is nothing but an extension (`".txt"`) becomes empty.
pub fn strip_extension(path: &str) -> &str {
    let name = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}
