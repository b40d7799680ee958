use rand::{seq::IndexedRandom, Rng};

use crate::api::{
    action::CharacterAction,
    map::Map,
    map_utility::{MapQuery, MapUtility},
};

/// Odds, in percent, that a wanderer keeps walking the way it already goes.
const KEEP_HEADING_PERCENTAGE: u32 = 80;

/// Arena filler: strolls around at random, preferring to walk straight.
pub struct Wanderer {
    id: String,
    name: String,
    heading: CharacterAction,
}

impl Wanderer {
    pub fn new(seat: usize) -> Self {
        Self {
            id: format!("wanderer-{seat}"),
            name: format!("Wanderer {seat}"),
            heading: CharacterAction::Stay,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn act<R: Rng + ?Sized>(&mut self, map: &Map, rng: &mut R) -> CharacterAction {
        let Some(map_util) = MapUtility::new(map, &self.id) else {
            return CharacterAction::Stay;
        };

        let legal: Vec<CharacterAction> = CharacterAction::MOVEMENTS
            .into_iter()
            .filter(|action| map_util.can_i_move_in_direction(*action))
            .collect();

        let keep = legal.contains(&self.heading)
            && rng.random_range(0..100) < KEEP_HEADING_PERCENTAGE;
        if !keep {
            self.heading = legal.choose(rng).copied().unwrap_or(CharacterAction::Stay);
        }

        self.heading
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::api::map::CharacterInfo;

    fn map_with(wanderer: &Wanderer, position: i32, obstacles: Vec<i32>) -> Map {
        Map {
            width: 3,
            height: 3,
            world_tick: 0,
            character_infos: vec![CharacterInfo {
                name: wanderer.name().to_string(),
                id: wanderer.id().to_string(),
                position,
                ..CharacterInfo::default()
            }],
            obstacle_positions: obstacles,
            power_up_positions: Vec::new(),
        }
    }

    #[test]
    fn test_only_takes_legal_moves() {
        let mut wanderer = Wanderer::new(1);
        let map = map_with(&wanderer, 4, vec![1, 3, 5]);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            assert_eq!(CharacterAction::Down, wanderer.act(&map, &mut rng));
        }
    }

    #[test]
    fn test_stays_when_boxed_in() {
        let mut wanderer = Wanderer::new(2);
        let map = map_with(&wanderer, 4, vec![1, 3, 5, 7]);
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(CharacterAction::Stay, wanderer.act(&map, &mut rng));
    }

    #[test]
    fn test_stays_when_not_on_the_map() {
        let mut wanderer = Wanderer::new(3);
        let map = Map::default();
        let mut rng = StdRng::seed_from_u64(5);

        assert_eq!(CharacterAction::Stay, wanderer.act(&map, &mut rng));
    }
}
