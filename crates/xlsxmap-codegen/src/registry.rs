use std::collections::{BTreeMap, HashMap};
use std::fmt;

use sha2::{Digest, Sha256};
use xlsxmap_model::{StyleAttrs, StyleCategory};

use crate::{python, CodegenError};

/// Number of hex digits kept from the SHA-256 of a canonical style form.
pub const DIGEST_HEX_LEN: usize = 8;

/// Identifier of one shared style declaration (`FONT_001`, `ALIGN_012`, ...).
///
/// Ordering is flush order: by category (fonts, fills, borders, alignments), then by sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId {
    category: StyleCategory,
    seq: u32,
}

impl StyleId {
    pub const fn new(category: StyleCategory, seq: u32) -> Self {
        Self { category, seq }
    }

    pub const fn category(self) -> StyleCategory {
        self.category
    }

    /// 1-based position of this style within its category.
    pub const fn seq(self) -> u32 {
        self.seq
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{:03}", self.category.prefix(), self.seq)
    }
}

/// A minted identifier together with its rendered declaration expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleDeclaration {
    pub id: StyleId,
    pub declaration: String,
}

#[derive(Debug)]
struct Entry {
    id: StyleId,
    canonical: String,
}

/// Content-addressed style table for one generation run.
///
/// Equal attribute subsets always resolve to the same [`StyleId`]; identifiers are dense per
/// category, assigned in first-seen order and never renumbered.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    /// Entries keyed by truncated digest; a bucket holds more than one entry only when
    /// distinct canonical forms share a digest.
    style_map: HashMap<(StyleCategory, String), Vec<Entry>>,
    counters: BTreeMap<StyleCategory, u32>,
    declarations: BTreeMap<StyleId, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `attrs` to its identifier, minting a new one (and rendering its declaration) the
    /// first time the subset is seen.
    pub fn intern(&mut self, attrs: &StyleAttrs) -> Result<StyleId, CodegenError> {
        let category = attrs.category();
        let canonical = attrs.canonical_json()?;
        let digest = content_digest(&canonical);

        let bucket = self.style_map.entry((category, digest)).or_default();
        if let Some(entry) = bucket.iter().find(|entry| entry.canonical == canonical) {
            log::trace!("reusing {} for {canonical}", entry.id);
            return Ok(entry.id);
        }
        if let Some(first) = bucket.first() {
            log::debug!(
                "{category} digest shared by {} and {canonical}; minting a separate style",
                first.canonical
            );
        }

        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        let id = StyleId::new(category, *counter);

        let declaration = python::style_declaration(attrs);
        log::debug!("new style {id} = {declaration}");
        self.declarations.insert(id, declaration);
        bucket.push(Entry { id, canonical });
        Ok(id)
    }

    /// Every declaration, fonts first, then fills, borders and alignments; ascending within each.
    pub fn materialize(&self) -> Vec<StyleDeclaration> {
        self.declarations
            .iter()
            .map(|(id, declaration)| StyleDeclaration {
                id: *id,
                declaration: declaration.clone(),
            })
            .collect()
    }

    pub fn declaration(&self, id: StyleId) -> Option<&str> {
        self.declarations.get(&id).map(String::as_str)
    }

    /// Number of distinct styles minted for `category`.
    pub fn count(&self, category: StyleCategory) -> usize {
        self.counters.get(&category).copied().unwrap_or(0) as usize
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Truncated hex SHA-256 of a canonical style form.
pub fn content_digest(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(DIGEST_HEX_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use xlsxmap_model::{
        AlignmentAttrs, BorderAttrs, BorderSide, FillAttrs, FillPattern, FontAttrs,
    };

    fn font(bold: bool, size: Option<f64>) -> StyleAttrs {
        StyleAttrs::Font(FontAttrs {
            bold,
            size,
            ..Default::default()
        })
    }

    fn fill(color: &str) -> StyleAttrs {
        StyleAttrs::Fill(FillAttrs {
            color: color.to_string(),
            pattern: FillPattern::Solid,
        })
    }

    #[test]
    fn equal_subsets_share_an_identifier() {
        let mut registry = StyleRegistry::new();
        let a = registry.intern(&font(true, Some(12.0))).unwrap();
        let b = registry.intern(&font(true, Some(12.0))).unwrap();
        let c = registry.intern(&font(true, Some(11.0))).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "FONT_001");
        assert_eq!(c.to_string(), "FONT_002");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn categories_count_independently() {
        let mut registry = StyleRegistry::new();
        let fill_1 = registry.intern(&fill("FFFF00")).unwrap();
        let font_1 = registry.intern(&font(true, None)).unwrap();
        let border_1 = registry
            .intern(&StyleAttrs::Border(BorderAttrs {
                top: Some(BorderSide::new("thin", "FF000000")),
                ..Default::default()
            }))
            .unwrap();
        let fill_2 = registry.intern(&fill("00FF00")).unwrap();
        let align_1 = registry
            .intern(&StyleAttrs::Alignment(AlignmentAttrs {
                horizontal: Some("center".into()),
                ..Default::default()
            }))
            .unwrap();

        let ids: Vec<String> = [fill_1, font_1, border_1, fill_2, align_1]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            ids,
            vec!["FILL_001", "FONT_001", "BORDER_001", "FILL_002", "ALIGN_001"]
        );
        assert_eq!(registry.count(StyleCategory::Fill), 2);
        assert_eq!(registry.count(StyleCategory::Alignment), 1);
    }

    #[test]
    fn materialize_groups_by_category_in_flush_order() {
        let mut registry = StyleRegistry::new();
        registry.intern(&fill("FFFF00")).unwrap();
        registry.intern(&font(true, None)).unwrap();
        registry.intern(&fill("00FF00")).unwrap();
        registry.intern(&font(false, Some(9.0))).unwrap();

        let ids: Vec<String> = registry
            .materialize()
            .into_iter()
            .map(|decl| decl.id.to_string())
            .collect();
        assert_eq!(ids, vec!["FONT_001", "FONT_002", "FILL_001", "FILL_002"]);

        // Pure projection: calling again yields the same sequence.
        assert_eq!(registry.materialize().len(), 4);
    }

    #[test]
    fn declaration_is_rendered_at_intern_time() {
        let mut registry = StyleRegistry::new();
        let id = registry.intern(&font(true, Some(12.0))).unwrap();
        assert_eq!(registry.declaration(id), Some("Font(bold=True, size=12)"));
    }

    #[test]
    fn sequence_is_zero_padded_to_three_digits() {
        assert_eq!(StyleId::new(StyleCategory::Alignment, 7).to_string(), "ALIGN_007");
        assert_eq!(StyleId::new(StyleCategory::Border, 42).to_string(), "BORDER_042");
        assert_eq!(StyleId::new(StyleCategory::Font, 1234).to_string(), "FONT_1234");
    }

    #[test]
    fn digest_is_truncated_sha256() {
        // sha256("") = e3b0c442...
        assert_eq!(content_digest(""), "e3b0c442");
        assert_eq!(content_digest("{}").len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn shared_digest_still_mints_distinct_identifiers() {
        let named = |name: &str| {
            StyleAttrs::Font(FontAttrs {
                name: Some(name.to_string()),
                ..Default::default()
            })
        };
        let first = named("F79523");
        let second = named("F82954");
        assert_eq!(
            content_digest(&first.canonical_json().unwrap()),
            content_digest(&second.canonical_json().unwrap())
        );

        let mut registry = StyleRegistry::new();
        let a = registry.intern(&first).unwrap();
        let b = registry.intern(&second).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "FONT_001");
        assert_eq!(b.to_string(), "FONT_002");

        assert_eq!(registry.intern(&first).unwrap(), a);
        assert_eq!(registry.intern(&second).unwrap(), b);
        assert_eq!(registry.declaration(b), Some("Font(name='F82954')"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn non_finite_attributes_fail_fast() {
        let mut registry = StyleRegistry::new();
        let err = registry.intern(&font(false, Some(f64::INFINITY))).unwrap_err();
        assert!(matches!(err, CodegenError::Model(_)));
        assert!(registry.is_empty());
    }
}
