use crate::stats::year_stats::Rank;
use std::collections::BTreeMap;

/// Ranks the selected year's value at each position against every other year holding a
/// value at the same position. Positions where the selected year has no value get `None`.
pub(crate) fn rank_positions(
    series: &BTreeMap<i32, Vec<Option<f64>>>,
    selected_year: i32,
    len: usize,
) -> Vec<Option<Rank>> {
    let Some(selected) = series.get(&selected_year) else {
        return vec![None; len];
    };

    (0..len)
        .map(|pos| {
            let own = selected.get(pos).copied().flatten()?;
            let others = series
                .iter()
                .filter(|(year, _)| **year != selected_year)
                .filter_map(|(_, values)| values.get(pos).copied().flatten());

            let (compared, above) = others.fold((0usize, 0usize), |(n, a), v| {
                (n + 1, if v > own { a + 1 } else { a })
            });
            Some(Rank {
                position: above + 1,
                out_of: compared + 1,
            })
        })
        .collect()
}
