use rand::seq::SliceRandom;
use rand::Rng;
use time::Date;

use super::model::{DailyPick, Recipe};

/// Keeps `cached` when it was picked `today`, otherwise draws a new recipe
/// uniformly from `collection`. `None` when the collection is empty.
pub fn pick_daily_recipe<R: Rng + ?Sized>(
    collection: &[Recipe],
    cached: Option<DailyPick>,
    today: Date,
    rng: &mut R,
) -> Option<DailyPick> {
    if collection.is_empty() {
        return None;
    }
    if let Some(pick) = cached {
        if pick.date == today {
            return Some(pick);
        }
    }
    collection.choose(rng).map(|recipe| DailyPick {
        date: today,
        recipe: recipe.clone(),
    })
}

#[cfg(test)]
mod daily_tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::date;

    use super::*;
    use crate::recipes::catalog::catalog_tests::recipe;
    use crate::recipes::model::{Category, Difficulty};

    fn collection() -> Vec<Recipe> {
        vec![
            recipe(1, "Tortilla", Category::Primero, Difficulty::Baja),
            recipe(2, "Flan", Category::Postre, Difficulty::Media),
            recipe(3, "Paella", Category::Segundo, Difficulty::Alta),
        ]
    }

    #[test]
    fn empty_collection_has_no_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_daily_recipe(&[], None, date!(2024 - 05 - 01), &mut rng).is_none());
    }

    #[test]
    fn same_day_returns_cached_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = date!(2024 - 05 - 01);
        let first = pick_daily_recipe(&collection(), None, today, &mut rng).unwrap();
        for _ in 0..10 {
            let again = pick_daily_recipe(&collection(), Some(first.clone()), today, &mut rng);
            assert_eq!(again.as_ref(), Some(&first));
        }
    }

    #[test]
    fn new_day_restamps_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        let yesterday = date!(2024 - 05 - 01);
        let today = date!(2024 - 05 - 02);
        let old = pick_daily_recipe(&collection(), None, yesterday, &mut rng).unwrap();
        let fresh = pick_daily_recipe(&collection(), Some(old), today, &mut rng).unwrap();
        assert_eq!(fresh.date, today);
        assert!(collection().contains(&fresh.recipe));
    }

    #[test]
    fn cached_recipe_survives_even_if_edited_today() {
        let mut rng = StdRng::seed_from_u64(1);
        let today = date!(2024 - 05 - 01);
        let stale = DailyPick {
            date: today,
            recipe: recipe(77, "Borrada", Category::Postre, Difficulty::Baja),
        };
        let kept = pick_daily_recipe(&collection(), Some(stale.clone()), today, &mut rng);
        assert_eq!(kept, Some(stale));
    }
}
