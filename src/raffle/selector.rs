use super::models::{CustomerRoll, PickStrategy};
use std::cmp::Reverse;

/// Rank rolls by the strategy and keep the first `winner_count`.
///
/// The sort is stable, so tied values keep their chat order: whoever rolled
/// first wins the tie.
pub fn select(rolls: &[CustomerRoll], strategy: PickStrategy, winner_count: i64) -> Vec<CustomerRoll> {
    if rolls.is_empty() || winner_count <= 0 {
        return Vec::new();
    }

    let mut ranked = rolls.to_vec();
    match strategy {
        PickStrategy::Max => ranked.sort_by_key(|r| Reverse(r.roll_value)),
        PickStrategy::Min => ranked.sort_by_key(|r| r.roll_value),
    }

    let keep = usize::try_from(winner_count).unwrap_or(usize::MAX);
    ranked.truncate(keep);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roll(name: &str, value: u32) -> CustomerRoll {
        CustomerRoll::new(name, value)
    }

    #[test]
    fn first_roller_wins_a_tie() {
        let rolls = vec![roll("A", 50), roll("B", 90), roll("C", 90)];
        assert_eq!(select(&rolls, PickStrategy::Max, 1), vec![roll("B", 90)]);
    }

    #[test]
    fn min_strategy_picks_lowest() {
        let rolls = vec![roll("Alice", 672), roll("Bob", 127)];
        assert_eq!(select(&rolls, PickStrategy::Min, 1), vec![roll("Bob", 127)]);
    }

    #[test]
    fn empty_or_non_positive_count_selects_nobody() {
        let rolls = vec![roll("A", 1)];
        assert!(select(&[], PickStrategy::Max, 3).is_empty());
        assert!(select(&rolls, PickStrategy::Max, 0).is_empty());
        assert!(select(&rolls, PickStrategy::Min, -2).is_empty());
    }

    #[test]
    fn count_larger_than_field_returns_everyone_ranked() {
        let rolls = vec![roll("A", 3), roll("B", 9), roll("C", 1)];
        let picked = select(&rolls, PickStrategy::Max, 10);
        assert_eq!(picked, vec![roll("B", 9), roll("A", 3), roll("C", 1)]);
    }

    #[test]
    fn does_not_touch_input_order() {
        let rolls = vec![roll("A", 3), roll("B", 9)];
        let _ = select(&rolls, PickStrategy::Max, 1);
        assert_eq!(rolls, vec![roll("A", 3), roll("B", 9)]);
    }

    fn rolls_strategy() -> impl Strategy<Value = Vec<CustomerRoll>> {
        prop::collection::vec(("[a-e]{1,3}", 0u32..10_000), 1..30)
            .prop_map(|v| v.into_iter().map(|(n, r)| CustomerRoll::new(n, r)).collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
        #[test]
        fn selection_is_a_sized_subset(rolls in rolls_strategy(), count in 1i64..40, max in any::<bool>()) {
            let strategy = if max { PickStrategy::Max } else { PickStrategy::Min };
            let picked = select(&rolls, strategy, count);
            prop_assert_eq!(picked.len(), (count as usize).min(rolls.len()));
            for p in &picked {
                prop_assert!(rolls.contains(p));
            }
        }

        #[test]
        fn selection_is_monotone(rolls in rolls_strategy(), count in 1i64..40, max in any::<bool>()) {
            let strategy = if max { PickStrategy::Max } else { PickStrategy::Min };
            let picked = select(&rolls, strategy, count);
            let ranked = select(&rolls, strategy, rolls.len() as i64);
            let rest = &ranked[picked.len()..];
            for p in &picked {
                for r in rest {
                    match strategy {
                        PickStrategy::Max => prop_assert!(p.roll_value >= r.roll_value),
                        PickStrategy::Min => prop_assert!(p.roll_value <= r.roll_value),
                    }
                }
            }
        }
    }
}
