use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Closed filter structure for one domain.
///
/// Every field is optional. A filter value doubles as a patch: merging
/// overwrites only the fields the patch sets.
pub trait Filter: Clone + Debug + Default + PartialEq + Serialize + Send + Sync + 'static {
    /// Overwrite every field that `patch` sets.
    fn merge(&mut self, patch: Self);
}

/// Restriction on an enumerated field. `All` lifts the restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Choice<S> {
    #[default]
    All,
    Only(S),
}

impl<S: PartialEq> Choice<S> {
    pub fn admits(&self, value: &S) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

/// Case-insensitive substring search across `fields`.
///
/// A missing or blank needle matches everything.
pub fn search_matches(needle: Option<&str>, fields: &[&str]) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Overwrite `slot` when the patch carries a value.
pub(crate) fn patch_field<V>(slot: &mut Option<V>, patch: Option<V>) {
    if patch.is_some() {
        *slot = patch;
    }
}

/// Whether an optional status restriction admits `value`.
pub(crate) fn choice_admits<S: PartialEq>(choice: &Option<Choice<S>>, value: &S) -> bool {
    choice.as_ref().map_or(true, |c| c.admits(value))
}

/// Whether an optional equality restriction admits `value`.
pub(crate) fn field_admits(wanted: &Option<String>, value: &str) -> bool {
    wanted.as_deref().map_or(true, |w| w == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_matches_everything() {
        assert!(search_matches(None, &["Anita Sharma"]));
        assert!(search_matches(Some("   "), &["Anita Sharma"]));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(search_matches(Some("SHARMA"), &["Anita Sharma", "anita@school.edu"]));
        assert!(search_matches(Some("school.edu"), &["Anita Sharma", "anita@school.edu"]));
        assert!(!search_matches(Some("sharma j"), &["Anita Sharma"]));
    }

    #[test]
    fn choice_all_admits_any_value() {
        assert!(Choice::<u8>::All.admits(&3));
        assert!(Choice::Only(3).admits(&3));
        assert!(!Choice::Only(3).admits(&4));
    }

    #[test]
    fn patch_field_keeps_value_when_patch_is_none() {
        let mut slot = Some("a".to_string());
        patch_field(&mut slot, None);
        assert_eq!(slot.as_deref(), Some("a"));
        patch_field(&mut slot, Some("b".to_string()));
        assert_eq!(slot.as_deref(), Some("b"));
    }

    #[test]
    fn choice_serializes_screaming_case() {
        let json = serde_json::to_string(&Choice::<u8>::All).unwrap();
        assert_eq!(json, "\"ALL\"");
    }
}
