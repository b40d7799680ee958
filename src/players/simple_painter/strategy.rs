use std::collections::HashSet;

use rand::{seq::IndexedRandom, Rng};

use crate::api::{action::CharacterAction, coordinate::MapCoordinate, map_utility::MapQuery};

/// Minimum number of ticks that must pass between two detonations,
/// exclusive.
pub const EXPLOSION_COOLDOWN_TICKS: u64 = 7;

/// The only memory the painter carries from one tick to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BotState {
    pub last_explosion_tick: u64,
    pub last_direction: CharacterAction,
}

/// Chooses the action for `game_tick` and records it in `state`.
///
/// Detonations only move `last_explosion_tick`, every other action becomes
/// the new `last_direction`.
pub fn choose_action<M, R>(
    map: &M,
    game_tick: u64,
    state: &mut BotState,
    rng: &mut R,
) -> CharacterAction
where
    M: MapQuery + ?Sized,
    R: Rng + ?Sized,
{
    let action = decide(map, game_tick, state, rng);

    match action {
        CharacterAction::Explode => state.last_explosion_tick = game_tick,
        other => state.last_direction = other,
    }

    action
}

fn decide<M, R>(map: &M, game_tick: u64, state: &BotState, rng: &mut R) -> CharacterAction
where
    M: MapQuery + ?Sized,
    R: Rng + ?Sized,
{
    let legal: Vec<CharacterAction> = CharacterAction::MOVEMENTS
        .into_iter()
        .filter(|action| map.can_i_move_in_direction(*action))
        .collect();
    let unvisited = unvisited_directions(map);

    if should_explode(map, game_tick, state, &legal, &unvisited) {
        return CharacterAction::Explode;
    }

    if let Some(action) = chase_power_up(map, &legal, &unvisited, rng) {
        return action;
    }

    let exploring = retain_legal(&unvisited, &legal);
    if !exploring.is_empty() {
        return keep_or_pick(state.last_direction, &exploring, rng);
    }

    if !legal.is_empty() {
        return keep_or_pick(state.last_direction, &legal, rng);
    }

    CharacterAction::Stay
}

fn should_explode<M: MapQuery + ?Sized>(
    map: &M,
    game_tick: u64,
    state: &BotState,
    legal: &[CharacterAction],
    unvisited: &[CharacterAction],
) -> bool {
    map.is_carrying_power_up()
        && game_tick.saturating_sub(state.last_explosion_tick) > EXPLOSION_COOLDOWN_TICKS
        && !unvisited.is_empty()
        && legal.len() == CharacterAction::MOVEMENTS.len()
}

fn chase_power_up<M, R>(
    map: &M,
    legal: &[CharacterAction],
    unvisited: &[CharacterAction],
    rng: &mut R,
) -> Option<CharacterAction>
where
    M: MapQuery + ?Sized,
    R: Rng + ?Sized,
{
    let target = closest_power_up(map)?;
    let towards = directions_towards(&map.my_coordinate(), &target);

    let reachable = retain_legal(&towards, legal);
    if !reachable.is_empty() {
        return prefer_unvisited(&reachable, unvisited, rng);
    }

    // something is in the way, try to walk around it
    let detour = if towards.iter().any(|a| a.is_horizontal()) {
        [CharacterAction::Up, CharacterAction::Down]
    } else if towards.iter().any(|a| a.is_vertical()) {
        [CharacterAction::Right, CharacterAction::Left]
    } else {
        return None;
    };

    prefer_unvisited(&retain_legal(&detour, legal), unvisited, rng)
}

/// Nearest power-up by manhattan distance, the first one listed wins ties.
fn closest_power_up<M: MapQuery + ?Sized>(map: &M) -> Option<MapCoordinate> {
    let me = map.my_coordinate();

    map.coordinates_containing_power_ups()
        .into_iter()
        .min_by_key(|coordinate| me.manhattan_distance(coordinate))
}

/// At most one horizontal and one vertical direction, each reducing the
/// distance between `from` and `to`.
fn directions_towards(from: &MapCoordinate, to: &MapCoordinate) -> Vec<CharacterAction> {
    let mut directions = Vec::with_capacity(2);

    if from.x < to.x {
        directions.push(CharacterAction::Right);
    } else if from.x > to.x {
        directions.push(CharacterAction::Left);
    }

    if from.y < to.y {
        directions.push(CharacterAction::Down);
    } else if from.y > to.y {
        directions.push(CharacterAction::Up);
    }

    directions
}

/// Directions leading to an adjacent tile this bot has not painted yet.
fn unvisited_directions<M: MapQuery + ?Sized>(map: &M) -> Vec<CharacterAction> {
    let coloured: HashSet<MapCoordinate> = map.my_coloured_coordinates().into_iter().collect();
    let me = map.my_coordinate();

    CharacterAction::MOVEMENTS
        .into_iter()
        .filter(|action| {
            let next = me.translate_by_action(*action);
            !map.is_coordinate_out_of_bounds(&next) && !coloured.contains(&next)
        })
        .collect()
}

fn retain_legal(candidates: &[CharacterAction], legal: &[CharacterAction]) -> Vec<CharacterAction> {
    candidates
        .iter()
        .filter(|action| legal.contains(action))
        .copied()
        .collect()
}

fn prefer_unvisited<R: Rng + ?Sized>(
    candidates: &[CharacterAction],
    unvisited: &[CharacterAction],
    rng: &mut R,
) -> Option<CharacterAction> {
    let preferred: Vec<CharacterAction> = candidates
        .iter()
        .filter(|action| unvisited.contains(action))
        .copied()
        .collect();

    if preferred.is_empty() {
        candidates.choose(rng).copied()
    } else {
        preferred.choose(rng).copied()
    }
}

fn keep_or_pick<R: Rng + ?Sized>(
    previous: CharacterAction,
    candidates: &[CharacterAction],
    rng: &mut R,
) -> CharacterAction {
    if candidates.contains(&previous) {
        previous
    } else {
        candidates
            .choose(rng)
            .copied()
            .unwrap_or(CharacterAction::Stay)
    }
}
