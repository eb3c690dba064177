//! # Identity Resolver
//!
//! Turns free text harvested from a product page into a [`ProductIdentity`].
//!
//! Each field is extracted independently and degrades to `None` on its own;
//! only [`resolve`] decides whether the listing is usable at all.

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};
use url::Url;

use super::patterns::{
    CAPACITY, DASH_SEPARATOR, MODEL, PAREN_GROUP, RAM_STORAGE, VARIANT_SEPARATOR,
};
use crate::domain::constants::catalog;
use crate::domain::product_identity::{ProductIdentity, collapse_whitespace};
use crate::infrastructure::parsing_error::{ResolutionError, ResolutionResult};

/// Longest label still accepted as a color
const MAX_COLOR_WORDS: usize = 4;

/// Resolves raw page text into a canonical identity.
///
/// `raw_title` drives the name; `raw_variant` is consulted first for storage
/// and color. When the title is unusable the name is derived from the last
/// path segment of `url_fallback`. Fails only when neither yields any text.
pub fn resolve(
    raw_title: &str,
    raw_variant: Option<&str>,
    url_fallback: &str,
) -> ResolutionResult<ProductIdentity> {
    let title = raw_title.trim();
    let variant = raw_variant.map(str::trim).filter(|v| !v.is_empty());

    let name = extract_model(title)
        .or_else(|| fallback_name(title))
        .or_else(|| name_from_url(url_fallback));
    let Some(name) = name else {
        warn!("✗ No usable product text (title empty, url {:?})", url_fallback);
        return Err(ResolutionError::unusable(None, url_fallback));
    };

    let storage = extract_storage(title, variant);
    let color = extract_color(title, variant);
    debug!(
        "Extracted product info - Model: {}, Storage: {:?}, Color: {:?}",
        name, storage, color
    );

    Ok(ProductIdentity::new(name, storage, color))
}

/// Product line + generation + qualifier, rewritten to canonical spacing/casing
pub fn extract_model(title: &str) -> Option<String> {
    let caps = MODEL.captures(title)?;
    let line = canonical_word(catalog::PRODUCT_LINES, &caps[1])?;
    let generation = canonical_word(catalog::NAMED_GENERATIONS, &caps[2])
        .unwrap_or_else(|| caps[2].to_string());

    let mut name = format!("{line} {generation}");
    if let Some(qualifier) = caps.get(3) {
        let squashed: String = qualifier
            .as_str()
            .split_whitespace()
            .collect::<String>()
            .to_lowercase();
        if let Some(canonical) = catalog::QUALIFIERS
            .iter()
            .find(|q| q.replace(' ', "").eq_ignore_ascii_case(&squashed))
        {
            name.push(' ');
            name.push_str(canonical);
        }
    }
    Some(name)
}

fn canonical_word(table: &[&str], word: &str) -> Option<String> {
    table
        .iter()
        .find(|canonical| canonical.eq_ignore_ascii_case(word))
        .map(|canonical| (*canonical).to_string())
}

/// Title without parenthesized segments, whitespace collapsed
pub fn fallback_name(title: &str) -> Option<String> {
    let mut stripped = title.to_string();
    while PAREN_GROUP.is_match(&stripped) {
        stripped = PAREN_GROUP.replace_all(&stripped, " ").into_owned();
    }
    let name = collapse_whitespace(&stripped);
    (!name.is_empty()).then_some(name)
}

/// Title-cased last path segment of a product URL.
///
/// `https://store.example/iphone-15-plus-blue` -> `Iphone 15 Plus Blue`
pub fn name_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segment = path.split('/').filter(|s| !s.trim().is_empty()).last()?;
    let words = percent_decode_str(segment)
        .decode_utf8_lossy()
        .replace(['-', '_', '+'], " ");
    let name = collapse_whitespace(&title_case(&words));
    (!name.is_empty()).then_some(name)
}

/// Upper-cases a letter not preceded by a letter, lower-cases the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

/// Capacity from variant text first, then title
pub fn extract_storage(title: &str, variant: Option<&str>) -> Option<String> {
    variant
        .and_then(storage_in)
        .or_else(|| storage_in(title))
}

fn storage_in(text: &str) -> Option<String> {
    // RAM / storage: the second token is the storage
    if let Some(caps) = RAM_STORAGE.captures(text) {
        return Some(format!("{}{}", &caps[2], caps[3].to_uppercase()));
    }

    CAPACITY.captures_iter(text).find_map(|caps| {
        let end = caps.get(0).map_or(text.len(), |m| m.end());
        if is_ram_marker(&text[end..]) {
            return None;
        }
        Some(format!("{}{}", &caps[1], caps[2].to_uppercase()))
    })
}

fn is_ram_marker(rest: &str) -> bool {
    rest.trim_start()
        .get(..3)
        .is_some_and(|word| word.eq_ignore_ascii_case("ram"))
}

/// Color label; variant text wins over the title
pub fn extract_color(title: &str, variant: Option<&str>) -> Option<String> {
    if let Some(color) = variant.and_then(color_in_variant) {
        return Some(color);
    }

    let combined = match variant {
        Some(variant) => format!("{title} | {variant}"),
        None => title.to_string(),
    };
    paren_color(title)
        .or_else(|| comma_color(&combined))
        .or_else(|| dash_color(title))
}

fn color_in_variant(variant: &str) -> Option<String> {
    paren_color(variant).or_else(|| {
        let outside = PAREN_GROUP.replace_all(variant, " ");
        VARIANT_SEPARATOR.split(&outside).find_map(color_candidate)
    })
}

/// First usable part of a parenthesized group: `(Blue, 128 GB)` -> `Blue`
fn paren_color(text: &str) -> Option<String> {
    PAREN_GROUP
        .captures_iter(text)
        .find_map(|caps| caps[1].split(',').find_map(color_candidate))
}

/// Trailing comma-delimited segment before any parenthesis
fn comma_color(text: &str) -> Option<String> {
    let before_paren = text.split('(').next().unwrap_or_default();
    let segments: Vec<&str> = before_paren.split(',').collect();
    segments
        .iter()
        .skip(1)
        .rev()
        .find_map(|segment| segment.split('|').find_map(color_candidate))
}

/// Trailing ` - <color>` segment of a title
fn dash_color(title: &str) -> Option<String> {
    let segments: Vec<&str> = DASH_SEPARATOR.split(title).collect();
    segments.iter().skip(1).rev().find_map(|segment| {
        let segment = segment.split('|').next().unwrap_or_default();
        let outside = PAREN_GROUP.replace_all(segment, " ");
        color_candidate(&outside)
    })
}

/// Accepts short free text that is not a capacity, RAM, model or listing marker
pub(super) fn color_candidate(raw: &str) -> Option<String> {
    let candidate =
        raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—'));
    let words: Vec<&str> = candidate.split_whitespace().collect();

    if words.is_empty()
        || words.len() > MAX_COLOR_WORDS
        || !candidate.chars().any(char::is_alphabetic)
        || CAPACITY.is_match(candidate)
        || MODEL.is_match(candidate)
        || words.iter().any(|w| w.eq_ignore_ascii_case("ram"))
        || catalog::NOISE_MARKERS
            .iter()
            .any(|marker| candidate.eq_ignore_ascii_case(marker))
    {
        return None;
    }

    Some(words.join(" "))
}
