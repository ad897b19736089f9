//! Prompt construction and response cleanup for file name suggestions.

use chrono::{NaiveDate, Utc};

/// Extension every suggested name ends with.
pub const OUTPUT_EXTENSION: &str = ".pdf";

/// Prefix of the date-based fallback name.
pub const FALLBACK_PREFIX: &str = "merged_";

/// Build the instruction sent to the model for `filenames`.
pub fn build_prompt<S: AsRef<str>>(filenames: &[S]) -> String {
    let listing = filenames
        .iter()
        .map(|name| format!("- {}", name.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I have a list of PDF filenames that I am merging into a single document.\n\
         Based on these filenames, suggest a concise, professional, and descriptive \
         filename for the merged file.\n\
         \n\
         Filenames:\n\
         {listing}\n\
         \n\
         Rules:\n\
         1. Return ONLY the filename.\n\
         2. Ensure it ends with \"{OUTPUT_EXTENSION}\".\n\
         3. Use Korean if the input filenames are mostly Korean, otherwise use English.\n\
         4. Do not include any explanations or markdown.\n"
    )
}

/// Clean a raw model response into a file name.
///
/// Trims whitespace, removes backticks and emphasis asterisks, strips
/// surrounding quotes and a leading `pdf` code-fence language tag. Returns
/// `None` when nothing usable is left.
pub fn clean_response(raw: &str) -> Option<String> {
    let unmarked: String = raw.trim().chars().filter(|c| !matches!(c, '`' | '*')).collect();

    let body = unmarked
        .strip_prefix("pdf\n")
        .or_else(|| unmarked.strip_prefix("pdf\r\n"))
        .unwrap_or(&unmarked)
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”'))
        .trim();

    if body.is_empty() || body == OUTPUT_EXTENSION {
        None
    } else {
        Some(body.to_string())
    }
}

/// Fallback name for `date`: `merged_YYYY-MM-DD.pdf`.
pub fn fallback_name_for(date: NaiveDate) -> String {
    format!("{FALLBACK_PREFIX}{}{OUTPUT_EXTENSION}", date.format("%Y-%m-%d"))
}

/// Fallback name for today's UTC date.
pub fn fallback_name() -> String {
    fallback_name_for(Utc::now().date_naive())
}
