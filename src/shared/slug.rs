//! URL slugs for catalog entries.
//!
//! Russian Cyrillic is transliterated to Latin first, other non-ASCII letters
//! are folded to their closest ASCII form (`é` → `e`), then the text is
//! reduced to `[a-z0-9_-]` with single hyphens between words. Collisions get
//! a numeric suffix: `alpha-tour`, `alpha-tour-1`, `alpha-tour-2`, ...

use std::future::Future;

use deunicode::deunicode_char;

use crate::shared::types::{DomainError, DomainResult};

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'ю' => "ju",
        'я' => "ja",
        _ => return None,
    };
    Some(latin)
}

/// Build the base slug for `source`. Returns an empty string when nothing
/// survives the filtering.
pub fn slugify(source: &str) -> String {
    let mut filtered = String::with_capacity(source.len());
    for c in source.chars().flat_map(char::to_lowercase) {
        if let Some(latin) = transliterate(c) {
            filtered.push_str(latin);
        } else if c.is_ascii() || c.is_whitespace() {
            keep_slug_char(&mut filtered, c);
        } else if let Some(folded) = deunicode_char(c) {
            for f in folded.chars() {
                keep_slug_char(&mut filtered, f.to_ascii_lowercase());
            }
        }
    }

    let mut slug = String::with_capacity(filtered.len());
    let mut pending_separator = false;
    for c in filtered.chars() {
        if c == '-' || c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }

    slug
}

fn keep_slug_char(out: &mut String, c: char) {
    if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
        out.push(c);
    }
}

/// Produce a slug for `source` that `is_taken` reports as free.
///
/// `is_taken` is consulted for the base slug and then for each suffixed
/// candidate in order.
pub async fn unique_slug<F, Fut>(source: &str, mut is_taken: F) -> DomainResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = DomainResult<bool>>,
{
    let base = slugify(source);
    if base.is_empty() {
        return Err(DomainError::validation(
            "slug",
            format!("'{}' does not produce a usable slug", source),
        ));
    }

    if !is_taken(base.clone()).await? {
        return Ok(base);
    }
    let mut suffix: u32 = 1;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_latin_text() {
        assert_eq!(slugify("Alpha Tour"), "alpha-tour");
        assert_eq!(slugify("  Alpha -- Tour!  "), "alpha-tour");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn slugify_transliterates_russian() {
        assert_eq!(slugify("Горный Алтай"), "gornyj-altaj");
        assert_eq!(slugify("Щучье озеро"), "schuche-ozero");
        assert_eq!(slugify("Юг, 2024"), "jug-2024");
    }

    #[test]
    fn slugify_folds_accents_and_keeps_underscores() {
        assert_eq!(slugify("Café Tour"), "cafe-tour");
        assert_eq!(slugify("Zürich Lake"), "zurich-lake");
        assert_eq!(slugify("_hidden_"), "_hidden_");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(" -- "), "");
    }

    #[tokio::test]
    async fn unique_slug_appends_increasing_suffix() {
        let taken: HashSet<String> = ["alpha-tour", "alpha-tour-1"]
            .into_iter()
            .map(String::from)
            .collect();
        let slug = unique_slug("Alpha Tour", |s| {
            let hit = taken.contains(&s);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "alpha-tour-2");
    }

    #[tokio::test]
    async fn unique_slug_rejects_empty_source() {
        let err = unique_slug("???", |_| async { Ok(false) }).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "slug", .. }));
    }
}
