use std::collections::{HashMap, HashSet};

use rand::{
    rngs::StdRng,
    seq::{IndexedRandom, SliceRandom},
    Rng, SeedableRng,
};

use crate::api::{
    action::CharacterAction,
    coordinate::MapCoordinate,
    events::PlayerRank,
    map::{CharacterInfo, Map, PlayerId},
    settings::GameSettings,
};

const MAX_OBSTACLE_CLUSTER: u32 = 5;

type CharacterIndex = usize;

/// Engine side state of a character, including what the snapshot hides.
#[derive(Clone, Debug)]
struct Character {
    id: PlayerId,
    name: String,
    position: MapCoordinate,
    carrying_power_up: bool,
    stunned_for: u32,
    invulnerable_for: u32,
    stun_points: i32,
}

impl Character {
    fn new(id: PlayerId, name: String, position: MapCoordinate) -> Self {
        Self {
            id,
            name,
            position,
            carrying_power_up: false,
            stunned_for: 0,
            invulnerable_for: 0,
            stun_points: 0,
        }
    }

    fn can_be_stunned(&self) -> bool {
        self.stunned_for == 0 && self.invulnerable_for == 0
    }
}

/// A character got stunned while resolving a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stun {
    pub player_id: PlayerId,
    pub duration_in_ticks: u32,
}

/// The world a single game is played in.
pub struct Arena {
    characters: Vec<Character>,
    height: i32,
    obstacles: HashSet<MapCoordinate>,
    owners: HashMap<MapCoordinate, CharacterIndex>,
    power_ups: Vec<MapCoordinate>,
    rng: StdRng,
    settings: GameSettings,
    tick: u64,
    width: i32,
}

impl Arena {
    pub fn new(settings: GameSettings, width: i32, height: i32, seed: u64) -> Self {
        let mut arena = Self {
            characters: Vec::new(),
            height,
            obstacles: HashSet::new(),
            owners: HashMap::new(),
            power_ups: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            settings,
            tick: 0,
            width,
        };

        if arena.settings.obstacles_enabled {
            arena.generate_obstacles();
        }
        if arena.settings.power_ups_enabled {
            for _ in 0..arena.settings.start_power_ups {
                arena.add_power_up();
            }
        }

        arena
    }

    /// Places a new character on a random free tile and paints it. Returns
    /// `None` when the world has no room left.
    pub fn spawn_character(&mut self, id: &str, name: &str) -> Option<CharacterIndex> {
        let position = self.random_free_tile()?;
        let index = self.characters.len();

        self.characters
            .push(Character::new(id.to_string(), name.to_string(), position));
        self.owners.insert(position, index);

        Some(index)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_over(&self) -> bool {
        self.tick >= self.settings.duration_in_ticks()
    }

    pub fn snapshot(&self) -> Map {
        let mut coloured: Vec<Vec<i32>> = vec![Vec::new(); self.characters.len()];
        for (tile, owner) in &self.owners {
            coloured[*owner].push(tile.to_position(self.width));
        }

        let character_infos = self
            .characters
            .iter()
            .zip(coloured)
            .enumerate()
            .map(|(index, (character, mut coloured_positions))| {
                coloured_positions.sort_unstable();
                CharacterInfo {
                    name: character.name.clone(),
                    id: character.id.clone(),
                    points: self.points(index),
                    position: character.position.to_position(self.width),
                    coloured_positions,
                    stunned_for_game_ticks: character.stunned_for as i32,
                    carrying_power_up: character.carrying_power_up,
                }
            })
            .collect();

        let mut obstacle_positions: Vec<i32> = self
            .obstacles
            .iter()
            .map(|o| o.to_position(self.width))
            .collect();
        obstacle_positions.sort_unstable();

        Map {
            width: self.width,
            height: self.height,
            world_tick: self.tick,
            character_infos,
            obstacle_positions,
            power_up_positions: self
                .power_ups
                .iter()
                .map(|p| p.to_position(self.width))
                .collect(),
        }
    }

    /// Applies one action per character, in random order, and advances
    /// the world by one tick.
    pub fn resolve_tick(
        &mut self,
        mut actions: Vec<(CharacterIndex, CharacterAction)>,
    ) -> Vec<Stun> {
        let mut stuns = Vec::new();

        // nobody gets to always move first
        actions.shuffle(&mut self.rng);

        for (index, action) in actions {
            if index >= self.characters.len() || !self.count_down_timers(index) {
                continue;
            }

            match action {
                CharacterAction::Stay => {}
                CharacterAction::Explode => self.explode(index, &mut stuns),
                movement => self.move_character(index, movement, &mut stuns),
            }
        }

        if self.settings.power_ups_enabled {
            self.churn_power_ups();
        }
        self.tick += 1;

        stuns
    }

    pub fn points(&self, index: CharacterIndex) -> i32 {
        let Some(character) = self.characters.get(index) else {
            return 0;
        };
        let owned = self.owners.values().filter(|owner| **owner == index).count() as i32;

        owned * self.settings.points_per_tile_owned + character.stun_points
    }

    /// Ranking by points, equal points share a rank.
    pub fn ranks(&self) -> Vec<PlayerRank> {
        let mut scored: Vec<(CharacterIndex, i32)> = (0..self.characters.len())
            .map(|index| (index, self.points(index)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let mut rank = 0;
        let mut previous = None;
        scored
            .into_iter()
            .map(|(index, points)| {
                if previous != Some(points) {
                    rank += 1;
                    previous = Some(points);
                }

                let character = &self.characters[index];
                PlayerRank {
                    player_name: character.name.clone(),
                    player_id: character.id.clone(),
                    rank,
                    points,
                }
            })
            .collect()
    }
}

// Private functions
impl Arena {
    /// Returns whether the character may act this tick.
    fn count_down_timers(&mut self, index: CharacterIndex) -> bool {
        let invulnerable_after_stun = self.settings.no_of_ticks_invulnerable_after_stun;
        let character = &mut self.characters[index];

        if character.stunned_for > 0 {
            character.stunned_for -= 1;
            if character.stunned_for == 0 {
                character.invulnerable_for = invulnerable_after_stun;
            }
            return false;
        }

        character.invulnerable_for = character.invulnerable_for.saturating_sub(1);
        true
    }

    fn move_character(
        &mut self,
        index: CharacterIndex,
        movement: CharacterAction,
        stuns: &mut Vec<Stun>,
    ) {
        let target = self.characters[index].position.translate_by_action(movement);

        let blocked = target.is_out_of_bounds(self.width, self.height)
            || self.obstacles.contains(&target)
            || self.character_at(&target).is_some();
        if blocked {
            self.stun(index, stuns);
            return;
        }

        self.characters[index].position = target;
        self.owners.insert(target, index);

        if !self.characters[index].carrying_power_up {
            if let Some(found) = self.power_ups.iter().position(|p| *p == target) {
                self.power_ups.remove(found);
                self.characters[index].carrying_power_up = true;
            }
        }
    }

    fn explode(&mut self, index: CharacterIndex, stuns: &mut Vec<Stun>) {
        if !self.characters[index].carrying_power_up {
            return;
        }
        self.characters[index].carrying_power_up = false;

        let centre = self.characters[index].position;
        let range = self.settings.explosion_range as i32;

        for y in centre.y - range..=centre.y + range {
            for x in centre.x - range..=centre.x + range {
                let tile = MapCoordinate::new(x, y);
                if centre.manhattan_distance(&tile) as i32 > range
                    || tile.is_out_of_bounds(self.width, self.height)
                    || self.obstacles.contains(&tile)
                {
                    continue;
                }
                self.owners.insert(tile, index);
            }
        }

        let victims: Vec<CharacterIndex> = self
            .characters
            .iter()
            .enumerate()
            .filter(|(other, character)| {
                *other != index
                    && character.can_be_stunned()
                    && centre.manhattan_distance(&character.position) as i32 <= range
            })
            .map(|(other, _)| other)
            .collect();

        for victim in victims {
            self.stun(victim, stuns);
            self.characters[index].stun_points += self.settings.points_per_caused_stun;
        }
    }

    fn stun(&mut self, index: CharacterIndex, stuns: &mut Vec<Stun>) {
        let duration = self.settings.no_of_ticks_stunned;
        let character = &mut self.characters[index];

        if !character.can_be_stunned() || duration == 0 {
            return;
        }

        character.stunned_for = duration;
        stuns.push(Stun {
            player_id: character.id.clone(),
            duration_in_ticks: duration,
        });
    }

    fn churn_power_ups(&mut self) {
        if self.rng.random_range(0..100) < self.settings.add_power_up_likelihood {
            self.add_power_up();
        }

        if self.power_ups.len() > self.settings.min_no_of_powerups as usize
            && self.rng.random_range(0..100) < self.settings.remove_power_up_likelihood
        {
            let index = self.rng.random_range(0..self.power_ups.len());
            self.power_ups.remove(index);
        }

        while self.power_ups.len() < self.settings.min_no_of_powerups as usize {
            if !self.add_power_up() {
                break;
            }
        }
    }

    fn add_power_up(&mut self) -> bool {
        match self.random_free_tile() {
            Some(tile) => {
                self.power_ups.push(tile);
                true
            }
            None => false,
        }
    }

    fn generate_obstacles(&mut self) {
        let mut remaining = self.settings.start_obstacles;

        while remaining > 0 {
            let Some(mut current) = self.random_free_tile() else {
                break;
            };
            let cluster = self.rng.random_range(1..=MAX_OBSTACLE_CLUSTER).min(remaining);

            for _ in 0..cluster {
                self.obstacles.insert(current);
                remaining -= 1;

                match self.adjacent_free_tile(&current) {
                    Some(next) => current = next,
                    None => break,
                }
            }
        }
    }

    fn adjacent_free_tile(&mut self, from: &MapCoordinate) -> Option<MapCoordinate> {
        let mut directions_bag = CharacterAction::MOVEMENTS.to_vec();

        while !directions_bag.is_empty() {
            let index = self.rng.random_range(0..directions_bag.len());
            let next = from.translate_by_action(directions_bag.remove(index));
            if self.is_tile_free(&next) {
                return Some(next);
            }
        }

        None
    }

    fn random_free_tile(&mut self) -> Option<MapCoordinate> {
        let free: Vec<MapCoordinate> = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| MapCoordinate::new(x, y)))
            .filter(|tile| self.is_tile_free(tile))
            .collect();

        free.choose(&mut self.rng).copied()
    }

    fn is_tile_free(&self, tile: &MapCoordinate) -> bool {
        !tile.is_out_of_bounds(self.width, self.height)
            && !self.obstacles.contains(tile)
            && !self.power_ups.contains(tile)
            && self.character_at(tile).is_none()
    }

    fn character_at(&self, tile: &MapCoordinate) -> Option<CharacterIndex> {
        self.characters.iter().position(|c| c.position == *tile)
    }
}

impl std::fmt::Display for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            let mut line = String::new();
            for x in 0..self.width {
                let tile = MapCoordinate::new(x, y);
                let symbol = if let Some(index) = self.character_at(&tile) {
                    char::from_digit(index as u32 % 10, 10).unwrap_or('?')
                } else if self.obstacles.contains(&tile) {
                    '#'
                } else if self.power_ups.contains(&tile) {
                    '*'
                } else if self.owners.contains_key(&tile) {
                    '~'
                } else {
                    '.'
                };
                line.push(symbol);
            }

            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}
