//! Competitor and support categories per business type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sitewise_core::TagSet;

/// Business type used when a request names none.
pub const DEFAULT_BUSINESS_TYPE: &str = "restaurant";

/// Categories that compete with, or draw customers to, a business type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Tags of rival establishments.
    pub competitor: TagSet,
    /// Tags of facilities that generate foot traffic.
    pub support: TagSet,
}

impl BusinessProfile {
    /// Build a profile from tag slices.
    #[must_use]
    pub fn new(competitor: &[&str], support: &[&str]) -> Self {
        Self {
            competitor: competitor.iter().collect(),
            support: support.iter().collect(),
        }
    }
}

/// Business profiles keyed by type name.
///
/// # Examples
/// ```
/// use sitewise_scorer::BusinessCatalog;
///
/// let catalog = BusinessCatalog::default();
/// let pharmacy = catalog.get("pharmacy").expect("built-in profile");
/// assert!(pharmacy.support.contains("hospital"));
/// assert!(catalog.get("bakery").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessCatalog {
    profiles: BTreeMap<String, BusinessProfile>,
}

impl Default for BusinessCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(
            "restaurant",
            BusinessProfile::new(
                &["restaurant", "cafe", "fast_food"],
                &["office", "school", "university", "bank", "station", "mall"],
            ),
        );
        catalog.insert(
            "minimarket",
            BusinessProfile::new(
                &["convenience", "supermarket"],
                &["school", "residential", "bank", "station"],
            ),
        );
        catalog.insert(
            "workshop",
            BusinessProfile::new(&["car_repair", "tyres"], &["fuel", "parking"]),
        );
        catalog.insert(
            "pharmacy",
            BusinessProfile::new(&["pharmacy"], &["hospital", "clinic"]),
        );
        catalog.insert(
            "electronics",
            BusinessProfile::new(&["electronics", "mobile_phone"], &["mall", "atm"]),
        );
        catalog
    }
}

impl BusinessCatalog {
    /// A catalog with no profiles.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    /// Look up a profile by type name.
    #[must_use]
    pub fn get(&self, business_type: &str) -> Option<&BusinessProfile> {
        self.profiles.get(business_type)
    }

    /// Add or replace a profile.
    pub fn insert(&mut self, business_type: &str, profile: BusinessProfile) {
        self.profiles.insert(business_type.to_owned(), profile);
    }

    /// Known type names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_catalog_lists_five_types() {
        let catalog = BusinessCatalog::default();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["electronics", "minimarket", "pharmacy", "restaurant", "workshop"]
        );
    }

    #[rstest]
    #[case("restaurant", "fast_food", "university")]
    #[case("minimarket", "supermarket", "residential")]
    #[case("workshop", "tyres", "parking")]
    #[case("pharmacy", "pharmacy", "clinic")]
    #[case("electronics", "mobile_phone", "atm")]
    fn built_in_profiles_carry_tags(
        #[case] business_type: &str,
        #[case] competitor: &str,
        #[case] support: &str,
    ) {
        let catalog = BusinessCatalog::default();
        let profile = catalog.get(business_type).expect("built-in profile");
        assert!(profile.competitor.contains(competitor));
        assert!(profile.support.contains(support));
    }

    #[rstest]
    fn catalog_deserialises_from_map() {
        let catalog: BusinessCatalog = serde_json::from_str(
            r#"{"bakery": {"competitor": ["bakery"], "support": ["school", "office"]}}"#,
        )
        .expect("valid catalog");
        let bakery = catalog.get("bakery").expect("bakery profile");
        assert_eq!(bakery.support.len(), 2);
        assert!(catalog.get(DEFAULT_BUSINESS_TYPE).is_none());
    }
}
