use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::bet::RaceBetSet;
use crate::category::RaceCategory;
use crate::code::CompetitorCode;
use crate::result::RaceResult;

/// Predicted competitor finished anywhere on the podium.
pub const IN_PODIUM_POINTS: f64 = 0.5;
/// Predicted competitor finished on the predicted step.
pub const EXACT_SLOT_POINTS: f64 = 0.5;
/// Extra for calling the winner exactly.
pub const WINNER_BONUS_POINTS: f64 = 1.0;
/// QUALI, SPRINT, FASTEST, SC and DRIVERDAY hit.
pub const EXACT_MATCH_POINTS: f64 = 1.0;
pub const BONUS_POINTS: f64 = 2.0;
pub const JOKER_MULTIPLIER: f64 = 2.0;

const EXACT_MATCH_CATEGORIES: [RaceCategory; 5] = [
    RaceCategory::Quali,
    RaceCategory::Sprint,
    RaceCategory::Fastest,
    RaceCategory::Sc,
    RaceCategory::DriverDay,
];

/// Points of one user at one race.
///
/// `categories` only lists categories that apply to the race: SPRINT is absent
/// on a normal weekend. `podium` holds the per-step points before the joker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceBreakdown {
    pub categories: BTreeMap<RaceCategory, f64>,
    pub podium: BTreeMap<u8, f64>,
    pub joker: bool,
    pub total: f64,
}

impl RaceBreakdown {
    pub fn points(&self, category: RaceCategory) -> Option<f64> {
        self.categories.get(&category).copied()
    }

    fn multiplier(&self) -> f64 {
        if self.joker { JOKER_MULTIPLIER } else { 1.0 }
    }

    /// Points owed to a single stored bet row, joker included.
    ///
    /// The podium category is split across its three rows; every other
    /// category maps to one row. Rows of absent categories get 0.
    pub fn bet_points(&self, category: RaceCategory, rank: Option<u8>) -> f64 {
        match category {
            RaceCategory::Race => rank
                .and_then(|rank| self.podium.get(&rank))
                .map_or(0.0, |points| points * self.multiplier()),
            other => self.points(other).unwrap_or(0.0),
        }
    }
}

/// Scores one user's bets against the official result of the race.
///
/// Slots whose official value is not loaded yet score 0. The function is total
/// and deterministic, so re-running it after a data reload simply replaces the
/// previous breakdown.
pub fn score_race(result: &RaceResult, bets: &RaceBetSet) -> RaceBreakdown {
    let joker = bets.joker_applied();
    let multiplier = if joker { JOKER_MULTIPLIER } else { 1.0 };

    let podium = score_podium(result, bets);
    let mut categories = BTreeMap::new();
    categories.insert(RaceCategory::Race, podium.values().sum::<f64>() * multiplier);

    for category in EXACT_MATCH_CATEGORIES {
        if category == RaceCategory::Sprint && !result.has_sprint() {
            continue;
        }
        categories.insert(category, score_exact_match(result, bets, category));
    }

    let bonus = if bets.bonus_correct() {
        BONUS_POINTS * multiplier
    } else {
        0.0
    };
    categories.insert(RaceCategory::Bonus, bonus);

    let total = categories.values().sum();
    debug!(?categories, joker, total, "race scored");

    RaceBreakdown {
        categories,
        podium,
        joker,
        total,
    }
}

fn score_podium(result: &RaceResult, bets: &RaceBetSet) -> BTreeMap<u8, f64> {
    let official = result.podium();

    (1..=3u8)
        .map(|rank| {
            let points = bets
                .bet(RaceCategory::Race, Some(rank))
                .and_then(|bet| bet.code())
                .map_or(0.0, |predicted| podium_slot_points(&official, rank, &predicted));
            (rank, points)
        })
        .collect()
}

/// Points for predicting `predicted` on podium step `rank`.
///
/// Exact winner is 2.0, exact second or third is 1.0, a podium finisher on
/// the wrong step is 0.5.
pub fn podium_slot_points(
    official: &[Option<CompetitorCode>; 3],
    rank: u8,
    predicted: &CompetitorCode,
) -> f64 {
    let mut points = 0.0;

    if official.iter().flatten().any(|code| code == predicted) {
        points += IN_PODIUM_POINTS;
    }

    let exact = usize::from(rank)
        .checked_sub(1)
        .and_then(|index| official.get(index))
        .and_then(Option::as_ref)
        .is_some_and(|code| code == predicted);

    if exact {
        points += EXACT_SLOT_POINTS;
        if rank == 1 {
            points += WINNER_BONUS_POINTS;
        }
    }

    points
}

fn score_exact_match(result: &RaceResult, bets: &RaceBetSet, category: RaceCategory) -> f64 {
    let Some(official) = result.value(category, None) else {
        return 0.0;
    };
    let Some(predicted) = bets.bet(category, None).and_then(|bet| bet.value()) else {
        return 0.0;
    };

    let hit = match category {
        RaceCategory::Sc => numeric_eq(predicted, official),
        _ => CompetitorCode::new(predicted) == CompetitorCode::new(official),
    };

    if hit { EXACT_MATCH_POINTS } else { 0.0 }
}

/// "12" equals "12.0"; anything non-numeric never matches.
fn numeric_eq(left: &str, right: &str) -> bool {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::RaceBet;

    fn podium_result() -> RaceResult {
        RaceResult::new(false)
            .with_competitor(RaceCategory::Race, Some(1), "VER")
            .with_competitor(RaceCategory::Race, Some(2), "LEC")
            .with_competitor(RaceCategory::Race, Some(3), "HAM")
    }

    fn podium_bets(first: &str, second: &str, third: &str) -> Vec<RaceBet> {
        vec![
            RaceBet::new(RaceCategory::Race, Some(1), first),
            RaceBet::new(RaceCategory::Race, Some(2), second),
            RaceBet::new(RaceCategory::Race, Some(3), third),
        ]
    }

    #[test]
    fn test_podium_wrong_slots() {
        let bets = RaceBetSet::new(podium_bets("LEC", "VER", "PER"));
        let breakdown = score_race(&podium_result(), &bets);

        assert_eq!(breakdown.podium[&1], 0.5);
        assert_eq!(breakdown.podium[&2], 0.5);
        assert_eq!(breakdown.podium[&3], 0.0);
        assert_eq!(breakdown.points(RaceCategory::Race), Some(1.0));
    }

    #[test]
    fn test_exact_podium() {
        let bets = RaceBetSet::new(podium_bets("VER", "LEC", "HAM"));
        let breakdown = score_race(&podium_result(), &bets);

        assert_eq!(breakdown.podium[&1], 2.0);
        assert_eq!(breakdown.podium[&2], 1.0);
        assert_eq!(breakdown.podium[&3], 1.0);
        assert_eq!(breakdown.points(RaceCategory::Race), Some(4.0));
    }

    #[test]
    fn test_winner_predicted_on_second_step() {
        let bets = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Race, Some(2), "VER")]);
        let breakdown = score_race(&podium_result(), &bets);
        assert_eq!(breakdown.podium[&2], 0.5);
    }

    #[test]
    fn test_joker_doubles_race_only() {
        let result = podium_result()
            .with_competitor(RaceCategory::Quali, None, "VER")
            .with_competitor(RaceCategory::Fastest, None, "NOR");

        let mut bets = podium_bets("VER", "HAM", "SAI");
        bets.push(RaceBet::new(RaceCategory::Quali, None, "VER"));
        bets.push(RaceBet::new(RaceCategory::Fastest, None, "NOR"));

        let plain = score_race(&result, &RaceBetSet::new(bets.clone()));
        bets[0] = bets[0].clone().with_joker();
        let joker = score_race(&result, &RaceBetSet::new(bets));

        assert_eq!(plain.points(RaceCategory::Race), Some(2.5));
        assert_eq!(joker.points(RaceCategory::Race), Some(5.0));
        assert_eq!(joker.points(RaceCategory::Quali), Some(1.0));
        assert_eq!(joker.points(RaceCategory::Fastest), Some(1.0));
        assert_eq!(joker.total - plain.total, 2.5);
        assert_eq!(joker.bet_points(RaceCategory::Race, Some(1)), 4.0);
        assert_eq!(joker.bet_points(RaceCategory::Race, Some(2)), 1.0);
    }

    #[test]
    fn test_joker_on_quali_is_ignored() {
        let result = RaceResult::new(false).with_competitor(RaceCategory::Quali, None, "ABC");
        let bets = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Quali, Some(1), "ABC").with_joker()]);
        let breakdown = score_race(&result, &bets);

        assert!(!breakdown.joker);
        assert_eq!(breakdown.points(RaceCategory::Quali), Some(1.0));
    }

    #[test]
    fn test_bonus_verdict_and_joker() {
        let result = podium_result();

        let plain = RaceBetSet::new(vec![]).with_bonus_verdict(true);
        assert_eq!(score_race(&result, &plain).points(RaceCategory::Bonus), Some(2.0));

        let joker = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Race, Some(1), "NOR").with_joker()])
            .with_bonus_verdict(true);
        assert_eq!(score_race(&result, &joker).points(RaceCategory::Bonus), Some(4.0));

        let wrong = RaceBetSet::new(vec![]).with_bonus_verdict(false);
        assert_eq!(score_race(&result, &wrong).points(RaceCategory::Bonus), Some(0.0));
    }

    #[test]
    fn test_safety_car_numeric_compare() {
        let result = RaceResult::new(false).with_text(RaceCategory::Sc, None, "2.0");

        let hit = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Sc, None, "2")]);
        assert_eq!(score_race(&result, &hit).points(RaceCategory::Sc), Some(1.0));

        let garbage = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Sc, None, "two")]);
        assert_eq!(score_race(&result, &garbage).points(RaceCategory::Sc), Some(0.0));
    }

    #[test]
    fn test_sprint_absent_on_normal_weekend() {
        let bets = RaceBetSet::new(vec![RaceBet::new(RaceCategory::Sprint, None, "VER")]);

        let normal = score_race(&podium_result(), &bets);
        assert_eq!(normal.points(RaceCategory::Sprint), None);
        assert_eq!(normal.bet_points(RaceCategory::Sprint, None), 0.0);

        let sprint_result = RaceResult::new(true).with_competitor(RaceCategory::Sprint, None, "VER");
        let sprint = score_race(&sprint_result, &bets);
        assert_eq!(sprint.points(RaceCategory::Sprint), Some(1.0));
    }

    #[test]
    fn test_unloaded_result_scores_zero() {
        let mut bets = podium_bets("VER", "LEC", "HAM");
        bets.push(RaceBet::new(RaceCategory::DriverDay, None, "VER"));
        let breakdown = score_race(&RaceResult::new(false), &RaceBetSet::new(bets));

        assert_eq!(breakdown.total, 0.0);
        assert_eq!(breakdown.points(RaceCategory::DriverDay), Some(0.0));
    }

    #[test]
    fn test_driver_of_the_day_exact_match() {
        let result = RaceResult::new(false).with_competitor(RaceCategory::DriverDay, None, "ALO");
        let bets = RaceBetSet::new(vec![RaceBet::new(RaceCategory::DriverDay, None, "alo")]);
        assert_eq!(score_race(&result, &bets).points(RaceCategory::DriverDay), Some(1.0));
    }

    #[test]
    fn test_total_is_sum_of_categories() {
        let result = podium_result().with_competitor(RaceCategory::Quali, None, "LEC");
        let mut bets = podium_bets("VER", "PIA", "LEC");
        bets.push(RaceBet::new(RaceCategory::Quali, None, "LEC"));
        let breakdown = score_race(&result, &RaceBetSet::new(bets).with_bonus_verdict(true));

        // 2.0 + 0 + 0.5 podium, 1 quali, 2 bonus
        assert_eq!(breakdown.total, 5.5);
        assert_eq!(breakdown.total, breakdown.categories.values().sum::<f64>());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const CODES: [&str; 6] = ["VER", "LEC", "HAM", "NOR", "PIA", "RUS"];

        fn code() -> impl Strategy<Value = &'static str> {
            proptest::sample::select(CODES.to_vec())
        }

        proptest! {
            #[test]
            fn score_race_is_deterministic(
                official in proptest::collection::vec(code(), 3),
                picks in proptest::collection::vec(code(), 3),
                bonus in any::<bool>(),
            ) {
                let mut result = RaceResult::new(false);
                for (rank, code) in (1u8..).zip(&official) {
                    result.insert(RaceCategory::Race, Some(rank), crate::result::ResultValue::competitor(*code));
                }
                let bets: Vec<RaceBet> = (1u8..)
                    .zip(&picks)
                    .map(|(rank, code)| RaceBet::new(RaceCategory::Race, Some(rank), *code))
                    .collect();
                let bets = RaceBetSet::new(bets).with_bonus_verdict(bonus);

                prop_assert_eq!(score_race(&result, &bets), score_race(&result, &bets));
            }

            #[test]
            fn joker_exactly_doubles_race_category(
                official in proptest::collection::vec(code(), 3),
                picks in proptest::collection::vec(code(), 3),
                quali in code(),
            ) {
                let mut result = RaceResult::new(false).with_competitor(RaceCategory::Quali, None, quali);
                for (rank, code) in (1u8..).zip(&official) {
                    result.insert(RaceCategory::Race, Some(rank), crate::result::ResultValue::competitor(*code));
                }
                let mut bets: Vec<RaceBet> = (1u8..)
                    .zip(&picks)
                    .map(|(rank, code)| RaceBet::new(RaceCategory::Race, Some(rank), *code))
                    .collect();
                bets.push(RaceBet::new(RaceCategory::Quali, None, "VER"));

                let plain = score_race(&result, &RaceBetSet::new(bets.clone()));
                bets[0] = bets[0].clone().with_joker();
                let joker = score_race(&result, &RaceBetSet::new(bets));

                prop_assert_eq!(
                    joker.points(RaceCategory::Race).unwrap(),
                    2.0 * plain.points(RaceCategory::Race).unwrap()
                );
                prop_assert_eq!(joker.points(RaceCategory::Quali), plain.points(RaceCategory::Quali));
            }
        }
    }
}
