use std::cmp::Ordering;

use crate::{Config, Coordinates, Flare, PrimaryKey};

/// Most participants first. Ties go to the newest flare, which is the one with the
/// highest id. Flares without an id yet come last.
pub fn by_popularity(a: &Flare, b: &Flare) -> Ordering {
    b.participants()
        .cmp(&a.participants())
        .then_with(|| b.id.cmp(&a.id))
}

/// Returns the most popular flares, capped at `all_limit`
pub fn all_flares<'a>(flares: &'a [Flare], config: &Config) -> Vec<&'a Flare> {
    let mut result: Vec<_> = flares.iter().collect();

    result.sort_by(|a, b| by_popularity(a, b));
    result.truncate(config.all_limit);

    result
}

/// Returns the flares with more than `hot_min_participants` participants, most popular first.
///
/// Hot flares use the same ordering as [all_flares] and are never capped higher, so every
/// hot flare is also in the full list.
pub fn hot_flares<'a>(flares: &'a [Flare], config: &Config) -> Vec<&'a Flare> {
    let mut result: Vec<_> = flares
        .iter()
        .filter(|f| f.participants() > config.hot_min_participants)
        .collect();

    result.sort_by(|a, b| by_popularity(a, b));
    result.truncate(config.effective_hot_limit());

    result
}

/// Returns the flares within `radius_in_km` of a point, in their original order
pub fn flares_near<'a>(flares: &'a [Flare], point: Coordinates, radius_in_km: f64) -> Vec<&'a Flare> {
    flares
        .iter()
        .filter(|f| f.coordinates().is_within(&point, radius_in_km))
        .collect()
}

pub fn flare_by_id(flares: &[Flare], id: PrimaryKey) -> Option<&Flare> {
    flares.iter().find(|f| f.id == Some(id))
}

#[cfg(test)]
mod test {
    use super::*;

    fn ids(flares: &[&Flare]) -> Vec<Option<PrimaryKey>> {
        flares.iter().map(|f| f.id).collect()
    }

    fn counts(flares: &[&Flare]) -> Vec<u32> {
        flares.iter().map(|f| f.participants()).collect()
    }

    #[test]
    fn hot_flares_are_filtered_and_sorted() {
        let config = Config::default();
        let flares = vec![
            Flare::mock(1, 1),
            Flare::mock(2, 40),
            Flare::mock(3, 2),
            Flare::mock(4, 120),
            Flare::mock(5, 1),
        ];

        let hot = hot_flares(&flares, &config);

        assert_eq!(ids(&hot), vec![Some(4), Some(2), Some(3)]);
    }

    #[test]
    fn hot_flares_are_capped() {
        let config = Config::default();
        let flares: Vec<_> = (1..=12).map(|i| Flare::mock(i, i + 1)).collect();

        let hot = hot_flares(&flares, &config);

        assert_eq!(hot.len(), 5);
        assert_eq!(counts(&hot), vec![13, 12, 11, 10, 9]);
    }

    #[test]
    fn all_flares_break_ties_by_newest() {
        let config = Config::default();
        let mut provisional = Flare::mock(0, 3);
        provisional.id = None;

        let flares = vec![
            Flare::mock(1, 3),
            provisional,
            Flare::mock(9, 3),
            Flare::mock(4, 7),
        ];

        let all = all_flares(&flares, &config);

        assert_eq!(ids(&all), vec![Some(4), Some(9), Some(1), None]);
    }

    #[test]
    fn all_flares_are_capped() {
        let config = Config::default();
        let flares: Vec<_> = (1..=45).map(|i| Flare::mock(i, i % 7)).collect();

        assert_eq!(all_flares(&flares, &config).len(), 20);
        assert_eq!(all_flares(&flares[..3], &config).len(), 3);
    }

    #[test]
    fn hot_flares_are_always_in_all_flares() {
        // Plenty of ties around the cut-off
        let config = Config {
            hot_limit: 10,
            all_limit: 8,
            ..Default::default()
        };
        let flares: Vec<_> = (1..=30).map(|i| Flare::mock(i, 5 + i % 2)).collect();

        let all = ids(&all_flares(&flares, &config));
        let hot = ids(&hot_flares(&flares, &config));

        assert!(!hot.is_empty());
        assert!(hot.iter().all(|id| all.contains(id)));
    }

    #[test]
    fn deleted_flare_leaves_both_lists() {
        let config = Config::default();
        let mut flares = vec![Flare::mock(1, 5), Flare::mock(2, 50), Flare::mock(3, 1)];

        flares.retain(|f| f.id != Some(2));

        assert!(!ids(&hot_flares(&flares, &config)).contains(&Some(2)));
        assert!(!ids(&all_flares(&flares, &config)).contains(&Some(2)));
    }

    #[test]
    fn nearby_flares() {
        let mut far = Flare::mock(2, 1);
        far.latitude = 48.85;
        far.longitude = 2.35;

        let flares = vec![Flare::mock(1, 1), far];
        let near = flares_near(&flares, Coordinates::new(52.08, 4.31), 10.);

        assert_eq!(ids(&near), vec![Some(1)]);
        assert_eq!(flare_by_id(&flares, 2).map(|f| f.latitude), Some(48.85));
        assert!(flare_by_id(&flares, 3).is_none());
    }
}
