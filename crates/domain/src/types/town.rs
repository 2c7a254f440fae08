//! Publicly listed towns as shown on the join surface.

use serde::{Deserialize, Serialize};

use crate::value_objects::TownId;

/// One row of the public town listing.
///
/// `current_occupancy <= maximum_occupancy` is expected but not enforced here;
/// anything at or above capacity is treated as full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownSummary {
    pub id: TownId,
    pub display_name: String,
    pub is_public: bool,
    pub current_occupancy: u32,
    pub maximum_occupancy: u32,
}

impl TownSummary {
    pub fn is_full(&self) -> bool {
        self.current_occupancy >= self.maximum_occupancy
    }

    /// Whether the listing should offer a join control for this town.
    pub fn is_joinable(&self) -> bool {
        !self.is_full()
    }

    /// Occupancy as displayed in the activity column, e.g. `3/5`.
    pub fn occupancy_label(&self) -> String {
        format!("{}/{}", self.current_occupancy, self.maximum_occupancy)
    }
}

/// Listing of towns sorted by descending occupancy.
///
/// Always rebuilt wholesale from a directory response. Towns with equal occupancy
/// keep the order the directory returned them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TownListing(Vec<TownSummary>);

impl TownListing {
    pub fn from_towns(mut towns: Vec<TownSummary>) -> Self {
        towns.sort_by(|a, b| b.current_occupancy.cmp(&a.current_occupancy));
        Self(towns)
    }

    pub fn towns(&self) -> &[TownSummary] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TownSummary> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find(&self, id: &TownId) -> Option<&TownSummary> {
        self.0.iter().find(|town| &town.id == id)
    }
}

impl IntoIterator for TownListing {
    type Item = TownSummary;
    type IntoIter = std::vec::IntoIter<TownSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TownListing {
    type Item = &'a TownSummary;
    type IntoIter = std::slice::Iter<'a, TownSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn town(id: &str, current: u32, max: u32) -> TownSummary {
        TownSummary {
            id: TownId::new(id).unwrap(),
            display_name: format!("Town {id}"),
            is_public: true,
            current_occupancy: current,
            maximum_occupancy: max,
        }
    }

    #[test]
    fn listing_sorts_by_descending_occupancy() {
        let listing = TownListing::from_towns(vec![town("a", 3, 5), town("b", 5, 5)]);

        let ids: Vec<_> = listing.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn ties_keep_source_order() {
        let listing = TownListing::from_towns(vec![
            town("first", 2, 8),
            town("busy", 7, 8),
            town("second", 2, 8),
        ]);

        let ids: Vec<_> = listing.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["busy", "first", "second"]);
    }

    #[test]
    fn town_at_or_over_capacity_is_not_joinable() {
        assert!(!town("full", 5, 5).is_joinable());
        assert!(!town("over", 6, 5).is_joinable());
        assert!(town("open", 4, 5).is_joinable());
    }

    #[test]
    fn occupancy_label_formats_current_over_max() {
        assert_eq!(town("a", 3, 5).occupancy_label(), "3/5");
    }

    #[test]
    fn find_returns_matching_town() {
        let listing = TownListing::from_towns(vec![town("a", 1, 5), town("b", 2, 5)]);
        let id = TownId::new("a").unwrap();
        assert_eq!(listing.find(&id).map(|t| t.current_occupancy), Some(1));
    }
}
