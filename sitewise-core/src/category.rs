//! Tag matching over POI category attributes.
//!
//! A point matches a [`TagSet`] when its amenity or shop label equals any
//! tag in the set. Filtering is pure and yields each point at most once.

use std::collections::BTreeSet;

use crate::{Categories, PointOfInterest};

/// An ordered, deduplicated set of category tags.
///
/// # Examples
/// ```
/// use sitewise_core::TagSet;
///
/// let tags: TagSet = ["cafe", "restaurant", "cafe", " "].into_iter().collect();
/// assert_eq!(tags.len(), 2);
/// assert!(tags.contains("cafe"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<String>", into = "Vec<String>"))]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    /// Add a tag; blank tags are ignored.
    pub fn insert(&mut self, tag: &str) {
        let trimmed = tag.trim();
        if !trimmed.is_empty() {
            self.tags.insert(trimmed.to_owned());
        }
    }

    /// Report whether `tag` is in the set.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Report whether the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate tags in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// The tag matched by `categories`, checking amenity before shop.
    #[must_use]
    pub fn matching_tag<'a>(&'a self, categories: &Categories) -> Option<&'a str> {
        categories
            .labels()
            .find_map(|label| self.tags.get(label).map(String::as_str))
    }

    /// Report whether either category attribute matches a tag.
    #[must_use]
    pub fn matches(&self, categories: &Categories) -> bool {
        self.matching_tag(categories).is_some()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagSet> for Vec<String> {
    fn from(set: TagSet) -> Self {
        set.tags.into_iter().collect()
    }
}

/// Keep the points whose amenity or shop label is in `tags`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{Categories, PointOfInterest, TagSet, filter_by_tags};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let cafe = PointOfInterest::new(1, origin, Categories::amenity("cafe"));
/// let mall = PointOfInterest::new(2, origin, Categories::shop("mall"));
/// let points = vec![&cafe, &mall];
///
/// let tags: TagSet = ["mall"].into_iter().collect();
/// let matched = filter_by_tags(&points, &tags);
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].id, 2);
/// ```
#[must_use]
pub fn filter_by_tags<'a>(
    points: &[&'a PointOfInterest],
    tags: &TagSet,
) -> Vec<&'a PointOfInterest> {
    if tags.is_empty() {
        return Vec::new();
    }
    points
        .iter()
        .copied()
        .filter(|poi| tags.matches(&poi.categories))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn poi(id: u64, amenity: Option<&str>, shop: Option<&str>) -> PointOfInterest {
        PointOfInterest::new(
            id,
            Coord { x: 0.0, y: 0.0 },
            Categories::new(amenity, shop),
        )
    }

    #[fixture]
    fn sample() -> Vec<PointOfInterest> {
        vec![
            poi(1, Some("restaurant"), None),
            poi(2, None, Some("convenience")),
            poi(3, Some("cafe"), Some("coffee")),
            poi(4, None, None),
            // Both attributes carry the same tag; still one match.
            poi(5, Some("bank"), Some("bank")),
        ]
    }

    fn ids(points: &[&PointOfInterest]) -> Vec<u64> {
        points.iter().map(|poi| poi.id).collect()
    }

    #[rstest]
    #[case(&["restaurant"], &[1])]
    #[case(&["convenience"], &[2])]
    #[case(&["coffee"], &[3])]
    #[case(&["restaurant", "coffee", "convenience"], &[1, 2, 3])]
    #[case(&["bank"], &[5])]
    #[case(&["unknown"], &[])]
    #[case(&[], &[])]
    fn filters_on_either_attribute(
        sample: Vec<PointOfInterest>,
        #[case] tags: &[&str],
        #[case] expected: &[u64],
    ) {
        let refs: Vec<&PointOfInterest> = sample.iter().collect();
        let tag_set: TagSet = tags.iter().collect();
        assert_eq!(ids(&filter_by_tags(&refs, &tag_set)), expected);
    }

    #[rstest]
    fn independent_filters_may_share_points(sample: Vec<PointOfInterest>) {
        let refs: Vec<&PointOfInterest> = sample.iter().collect();
        let competitors: TagSet = ["cafe"].into_iter().collect();
        let supports: TagSet = ["coffee", "bank"].into_iter().collect();

        assert_eq!(ids(&filter_by_tags(&refs, &competitors)), vec![3]);
        assert_eq!(ids(&filter_by_tags(&refs, &supports)), vec![3, 5]);
    }

    #[rstest]
    fn matching_tag_prefers_amenity() {
        let tags: TagSet = ["cafe", "coffee"].into_iter().collect();
        let categories = Categories::new(Some("cafe"), Some("coffee"));
        assert_eq!(tags.matching_tag(&categories), Some("cafe"));
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn serialises_as_sorted_tag_list() {
        let tags: TagSet = ["school", "bank", "school"].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&tags).expect("serialise tags"),
            serde_json::json!(["bank", "school"])
        );

        let raw = serde_json::json!(["cafe", " ", "cafe", "mall "]);
        let decoded: TagSet = serde_json::from_value(raw).expect("deserialise tags");
        assert_eq!(decoded, ["cafe", "mall"].into_iter().collect());
    }
}
