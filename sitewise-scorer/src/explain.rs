//! Human-readable reasons and facility labels for a scored site.

use sitewise_core::ScoreResult;

/// Support categories and their display labels, in display order.
///
/// Several categories may share one label; each label appears once.
const FACILITY_LABELS: &[(&str, &str)] = &[
    ("school", "Education"),
    ("university", "Campus"),
    ("office", "Office district"),
    ("bank", "Banking"),
    ("atm", "ATM access"),
    ("mall", "Near a mall"),
    ("supermarket", "Daily shopping"),
    ("hospital", "Hospital or clinic"),
    ("clinic", "Hospital or clinic"),
    ("residential", "Residential area"),
    ("fuel", "Fuel station"),
    ("parking", "Parking"),
    ("bus_station", "Bus terminal"),
    ("station", "Train station"),
    ("train_station", "Train station"),
    ("airport", "Airport"),
    ("aerodrome", "Airport"),
];

const HOTSPOT_LABEL: &str = "Busy hotspot";
const GENERIC_LABEL: &str = "Public facilities nearby";
const HOTSPOT_SUPPORTS: u32 = 15;

/// Labels for the support categories present around a site.
///
/// A site with more than fifteen supports is also labelled a hotspot, ahead
/// of the category labels. A site with supports but no labelled category
/// gets a generic label instead.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use sitewise_core::ScoreResult;
/// use sitewise_scorer::facility_labels;
///
/// let score = ScoreResult {
///     closeness: 0.4,
///     support_count: 3,
///     competitor_distance: 800.0,
///     support_breakdown: BTreeMap::from([("clinic".to_owned(), 1), ("hospital".to_owned(), 2)]),
/// };
/// assert_eq!(facility_labels(&score), vec!["Hospital or clinic"]);
/// ```
#[must_use]
pub fn facility_labels(score: &ScoreResult) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for (category, label) in FACILITY_LABELS {
        let present = score
            .support_breakdown
            .get(*category)
            .is_some_and(|count| *count > 0);
        if present && !labels.iter().any(|existing| existing == label) {
            labels.push((*label).to_owned());
        }
    }

    if score.support_count > HOTSPOT_SUPPORTS {
        labels.insert(0, HOTSPOT_LABEL.to_owned());
    } else if score.support_count > 0 && labels.is_empty() {
        labels.push(GENERIC_LABEL.to_owned());
    }
    labels
}

/// Plain-language reasons behind a site's score.
///
/// One reason each for facility density and competition, then one for rent
/// when it is notably high or low, then one for sentiment when reviews are
/// clearly positive.
#[must_use]
pub fn explain(score: &ScoreResult, rent_cost: f64, sentiment: f64) -> Vec<String> {
    let supports = score.support_count;
    let mut reasons = vec![if supports > 20 {
        format!("Very strategic: surrounded by {supports} public facilities.")
    } else if supports > 5 {
        format!("Fairly strategic: {supports} supporting facilities nearby.")
    } else {
        format!("Quiet area: only {supports} public facilities found.")
    }];

    let distance = score.competitor_distance;
    reasons.push(if distance > 2_000.0 {
        "Monopoly opportunity: no competitor within 2 km.".to_owned()
    } else if distance > 500.0 {
        "Safe: the nearest competitor is a fair distance away.".to_owned()
    } else {
        format!(
            "Tight competition: the nearest competitor is only {:.0} meters away.",
            distance.trunc()
        )
    });

    if rent_cost > 150_000_000.0 {
        reasons.push("High capital: rent is expensive.".to_owned());
    } else if rent_cost < 50_000_000.0 {
        reasons.push("Cost saving: rent is affordable.".to_owned());
    }

    if sentiment > 0.7 {
        reasons.push("Good reputation: reviews of the area are positive.".to_owned());
    }
    reasons
}

#[cfg(test)]
#[expect(clippy::indexing_slicing, reason = "tests read reasons at known positions")]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use rstest::{fixture, rstest};

    fn site(support_count: u32, competitor_distance: f64, breakdown: &[(&str, u32)]) -> ScoreResult {
        ScoreResult {
            closeness: 0.5,
            support_count,
            competitor_distance,
            support_breakdown: breakdown
                .iter()
                .map(|(tag, count)| ((*tag).to_owned(), *count))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[fixture]
    fn busy() -> ScoreResult {
        site(22, 2_500.0, &[("school", 10), ("office", 8), ("station", 4)])
    }

    #[rstest]
    fn labels_follow_display_order(busy: ScoreResult) {
        assert_eq!(
            facility_labels(&busy),
            vec![HOTSPOT_LABEL, "Education", "Office district", "Train station"]
        );
    }

    #[rstest]
    fn unlabelled_supports_get_generic_label() {
        let score = site(2, 900.0, &[("library", 2)]);
        assert_eq!(facility_labels(&score), vec![GENERIC_LABEL]);
    }

    #[rstest]
    fn empty_site_has_no_labels() {
        assert!(facility_labels(&site(0, 5_000.0, &[])).is_empty());
    }

    #[rstest]
    fn exactly_fifteen_supports_is_not_a_hotspot() {
        let score = site(15, 900.0, &[("bank", 15)]);
        assert_eq!(facility_labels(&score), vec!["Banking"]);
    }

    #[rstest]
    fn explains_busy_cheap_well_reviewed_site(busy: ScoreResult) {
        let reasons = explain(&busy, 40_000_000.0, 0.8);
        assert_eq!(reasons.len(), 4);
        assert!(reasons[0].starts_with("Very strategic"));
        assert!(reasons[1].starts_with("Monopoly opportunity"));
        assert!(reasons[2].starts_with("Cost saving"));
        assert!(reasons[3].starts_with("Good reputation"));
    }

    #[rstest]
    #[case(6, "Fairly strategic")]
    #[case(5, "Quiet area")]
    #[case(21, "Very strategic")]
    #[case(20, "Fairly strategic")]
    fn facility_reason_thresholds(#[case] supports: u32, #[case] prefix: &str) {
        let reasons = explain(&site(supports, 1_000.0, &[]), 100_000_000.0, 0.5);
        assert!(reasons[0].starts_with(prefix));
    }

    #[rstest]
    fn tight_competition_reports_whole_meters() {
        let reasons = explain(&site(0, 123.9, &[]), 100_000_000.0, 0.5);
        assert_eq!(
            reasons[1],
            "Tight competition: the nearest competitor is only 123 meters away."
        );
        assert_eq!(reasons.len(), 2);
    }

    #[rstest]
    fn expensive_rent_is_flagged() {
        let reasons = explain(&site(0, 600.0, &[]), 200_000_000.0, 0.7);
        assert!(reasons[1].starts_with("Safe"));
        assert_eq!(reasons[2], "High capital: rent is expensive.");
        assert_eq!(reasons.len(), 3);
    }
}
