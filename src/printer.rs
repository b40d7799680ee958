use std::collections::HashMap;

use crossterm::style::{Color, Stylize};

use crate::{api::events::MapUpdateEvent, terminal::Terminal};

const OWN_SYMBOL: char = '@';
const OBSTACLE_SYMBOL: char = '#';
const POWER_UP_SYMBOL: char = '*';
const EMPTY_SYMBOL: char = '.';

const PALETTE: [Color; 6] = [
    Color::DarkRed,
    Color::DarkGreen,
    Color::DarkBlue,
    Color::DarkMagenta,
    Color::DarkCyan,
    Color::DarkYellow,
];

/// Prints the game world every tick, when active.
pub struct AnsiPrinter {
    active: bool,
    terminal: Terminal,
}

impl AnsiPrinter {
    pub fn new(active: bool, clear_screen: bool) -> Self {
        let mut terminal = Terminal::new(clear_screen);
        if active {
            terminal.clear_screen();
        }

        Self { active, terminal }
    }

    pub fn print_map(&mut self, event: &MapUpdateEvent) {
        if !self.active {
            return;
        }

        self.terminal.move_caret_to_origin();
        self.terminal.println(render(event, true));
    }
}

fn symbol_of(index: usize, is_me: bool) -> char {
    if is_me {
        OWN_SYMBOL
    } else {
        (b'A' + (index % 26) as u8) as char
    }
}

/// Renders the snapshot as one text row per map row followed by a legend.
/// `styled` paints every coloured tile with its owner's background.
pub fn render(event: &MapUpdateEvent, styled: bool) -> String {
    let map = &event.map;

    let mut owners = HashMap::new();
    let mut occupants = HashMap::new();
    for (index, character) in map.character_infos.iter().enumerate() {
        let is_me = character.id == event.receiving_player_id;
        for position in &character.coloured_positions {
            owners.insert(*position, index);
        }
        occupants.insert(character.position, symbol_of(index, is_me));
    }

    let mut text = format!("tick {} of game {}\n", event.game_tick, event.game_id);
    for y in 0..map.height {
        for x in 0..map.width {
            let position = x + y * map.width;
            let symbol = if let Some(occupant) = occupants.get(&position) {
                *occupant
            } else if map.obstacle_positions.contains(&position) {
                OBSTACLE_SYMBOL
            } else if map.power_up_positions.contains(&position) {
                POWER_UP_SYMBOL
            } else {
                EMPTY_SYMBOL
            };

            match owners.get(&position) {
                Some(owner) if styled => {
                    let background = PALETTE[owner % PALETTE.len()];
                    text.push_str(&format!("{}", symbol.with(Color::White).on(background)));
                }
                _ => text.push(symbol),
            }
        }
        text.push('\n');
    }

    for (index, character) in map.character_infos.iter().enumerate() {
        let is_me = character.id == event.receiving_player_id;
        let stunned = if character.is_stunned() {
            format!(" (stunned {})", character.stunned_for_game_ticks)
        } else {
            String::new()
        };
        let power_up = if character.carrying_power_up {
            " [power-up]"
        } else {
            ""
        };

        text.push_str(&format!(
            "{} {:<24} {:>4} pts{power_up}{stunned}\n",
            symbol_of(index, is_me),
            character.name,
            character.points
        ));
    }

    text
}
