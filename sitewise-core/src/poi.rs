//! Point-of-interest records held by a store.

use geo::Coord;

/// Category attributes a point of interest can be matched on.
///
/// Mirrors the two OpenStreetMap keys the engine inspects. Either may be
/// absent; an absent attribute never matches a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Categories {
    /// Amenity-like label (`restaurant`, `bank`, `school`, ...).
    pub amenity: Option<String>,
    /// Shop-like label (`convenience`, `supermarket`, `mall`, ...).
    pub shop: Option<String>,
}

impl Categories {
    /// Build categories from optional labels, dropping blank strings.
    ///
    /// # Examples
    /// ```
    /// use sitewise_core::Categories;
    ///
    /// let categories = Categories::new(Some("cafe"), Some("  "));
    /// assert_eq!(categories.amenity.as_deref(), Some("cafe"));
    /// assert!(categories.shop.is_none());
    /// ```
    #[must_use]
    pub fn new(amenity: Option<&str>, shop: Option<&str>) -> Self {
        Self {
            amenity: non_blank(amenity),
            shop: non_blank(shop),
        }
    }

    /// Categories with only an amenity label.
    #[must_use]
    pub fn amenity(label: &str) -> Self {
        Self::new(Some(label), None)
    }

    /// Categories with only a shop label.
    #[must_use]
    pub fn shop(label: &str) -> Self {
        Self::new(None, Some(label))
    }

    /// Present labels, amenity first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.amenity
            .as_deref()
            .into_iter()
            .chain(self.shop.as_deref())
    }
}

fn non_blank(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// A point of interest held by the store.
///
/// `location` is in EPSG:3857 meters (`x` = easting, `y` = northing); the
/// loader projects WGS84 input before constructing records.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitewise_core::{Categories, PointOfInterest};
///
/// let poi = PointOfInterest::new(7, Coord { x: 10.0, y: 20.0 }, Categories::amenity("bank"));
/// assert_eq!(poi.id, 7);
/// assert_eq!(poi.categories.amenity.as_deref(), Some("bank"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    /// Identifier from the source dataset.
    pub id: u64,
    /// Planar position in meters.
    pub location: Coord<f64>,
    /// Category labels used for tag matching.
    pub categories: Categories,
}

impl PointOfInterest {
    /// Construct a record at a planar position.
    #[must_use]
    pub const fn new(id: u64, location: Coord<f64>, categories: Categories) -> Self {
        Self {
            id,
            location,
            categories,
        }
    }

    /// Construct a record without any category labels.
    #[must_use]
    pub fn uncategorised(id: u64, location: Coord<f64>) -> Self {
        Self::new(id, location, Categories::default())
    }
}
