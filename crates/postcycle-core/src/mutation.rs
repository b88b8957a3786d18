//! Mutation applier
//!
//! Pure transformations of a post copy: set a policy field, and swap the
//! selection tag for another. Both compose before a single write-back.

use std::fmt;

use ghost_admin::{ContentItem, Tag};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value written to the policy field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Exactly `"true"` and `"false"` become booleans; every other string,
    /// numeric-looking ones included, is kept as text.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => FieldValue::Bool(true),
            "false" => FieldValue::Bool(false),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Set `field` on the post to `value`.
pub fn apply_field_mutation(
    mut item: ContentItem,
    field: &str,
    value: &FieldValue,
) -> ContentItem {
    item.set_field(field, value.to_json());
    item
}

/// Drop every tag with slug `remove`, then append `add` if given and non-empty.
///
/// An `add` slug already present among the retained tags is moved to the end
/// so it appears exactly once.
pub fn swap_tag(mut item: ContentItem, remove: &str, add: Option<&str>) -> ContentItem {
    item.tags.retain(|t| t.slug != remove);
    if let Some(slug) = add.filter(|s| !s.is_empty()) {
        let existing = item.tags.iter().position(|t| t.slug == slug);
        let tag = match existing {
            Some(idx) => item.tags.remove(idx),
            None => Tag::from_slug(slug),
        };
        item.tags.push(tag);
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tagged(slugs: &[&str]) -> ContentItem {
        let mut item = ContentItem::new("p", "P");
        item.tags = slugs.iter().map(|s| Tag::from_slug(s)).collect();
        item
    }

    fn slugs(item: &ContentItem) -> Vec<&str> {
        item.tags.iter().map(|t| t.slug.as_str()).collect()
    }

    #[test]
    fn test_coerce_literal_booleans() {
        assert_eq!(FieldValue::coerce("true"), FieldValue::Bool(true));
        assert_eq!(FieldValue::coerce("false"), FieldValue::Bool(false));
    }

    #[test]
    fn test_coerce_leaves_other_strings() {
        assert_eq!(FieldValue::coerce("7"), FieldValue::Text("7".to_string()));
        assert_eq!(
            FieldValue::coerce("True"),
            FieldValue::Text("True".to_string())
        );
        assert_eq!(FieldValue::coerce(""), FieldValue::Text(String::new()));
    }

    #[test]
    fn test_apply_field_mutation_sets_extension() {
        let item = apply_field_mutation(tagged(&[]), "featured", &FieldValue::Bool(true));
        assert_eq!(item.field("featured"), Some(json!(true)));

        let item = apply_field_mutation(item, "visibility", &FieldValue::coerce("public"));
        assert_eq!(item.field("visibility"), Some(json!("public")));
    }

    #[test]
    fn test_swap_removes_and_appends() {
        let item = swap_tag(tagged(&["a", "promo", "b", "promo"]), "promo", Some("live"));
        assert_eq!(slugs(&item), vec!["a", "b", "live"]);
    }

    #[test]
    fn test_swap_without_add_only_removes() {
        let item = swap_tag(tagged(&["a", "promo"]), "promo", None);
        assert_eq!(slugs(&item), vec!["a"]);
        let item = swap_tag(tagged(&["a", "promo"]), "promo", Some(""));
        assert_eq!(slugs(&item), vec!["a"]);
    }

    #[test]
    fn test_swap_tolerates_missing_remove() {
        let item = swap_tag(tagged(&["a"]), "promo", Some("live"));
        assert_eq!(slugs(&item), vec!["a", "live"]);
    }

    #[test]
    fn test_swap_add_appears_once() {
        let item = swap_tag(tagged(&["live", "a", "promo"]), "promo", Some("live"));
        assert_eq!(slugs(&item), vec!["a", "live"]);
    }
}
