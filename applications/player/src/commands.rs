//! Terminal input
//!
//! Each stdin line is one command. Most map straight to a `PlayerEvent`;
//! a few are handled by the host itself.

use crate::error::{PlayerAppError, Result};
use story_playback::{Direction, Key, PlayerEvent};

/// Commands understood on stdin
#[derive(Debug, Clone)]
pub enum Command {
    /// Feed an event to the controller
    Event(PlayerEvent),

    /// Simulated horizontal swipe across the slide surface
    Swipe(Direction),

    /// Print the catalog
    List,

    /// Print phase, theme and title
    Status,

    Help,

    Quit,
}

pub const HELP: &str = "\
Commands:
  next | n            next theme
  prev | p            previous theme
  left | right        arrow keys
  swipe left|right    swipe across the slide
  go <n>              jump to theme n (1-based)
  theme <name>        select a theme by name
  play | pause        toggle playback
  story | s           another story in the current theme
  shuffle             another random story in the selected theme
  vol <0-100>         set volume
  mute                toggle mute
  seek <0-100>        jump to a position in percent
  list                show themes and stories
  status              show what is playing
  help                this text
  quit | q            stop and exit";

/// Parse one input line
///
/// `current_theme` is the focused theme index, used by `story`.
/// Empty lines yield `Ok(None)`.
pub fn parse(line: &str, current_theme: Option<usize>) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "next" | "n" => Command::Event(PlayerEvent::Navigate(Direction::Next)),
        "prev" | "p" => Command::Event(PlayerEvent::Navigate(Direction::Previous)),
        "left" => Command::Event(PlayerEvent::KeyPressed(Key::ArrowLeft)),
        "right" => Command::Event(PlayerEvent::KeyPressed(Key::ArrowRight)),
        "swipe" => match rest {
            // Dragging left reveals the next slide
            "left" => Command::Swipe(Direction::Next),
            "right" => Command::Swipe(Direction::Previous),
            _ => return Err(unknown(line)),
        },
        "go" => {
            let position: usize = parse_number(rest, line)?;
            if position == 0 {
                return Err(unknown(line));
            }
            Command::Event(PlayerEvent::IndicatorTapped {
                index: position - 1,
            })
        }
        "theme" | "t" if !rest.is_empty() => Command::Event(PlayerEvent::ThemeSelected {
            theme: rest.to_string(),
        }),
        "play" | "pause" => Command::Event(PlayerEvent::PlayPauseClicked),
        "story" | "s" => Command::Event(PlayerEvent::NextClicked {
            theme_index: current_theme.unwrap_or(0),
        }),
        "shuffle" => Command::Event(PlayerEvent::ShuffleClicked),
        "vol" | "volume" => {
            let level: u8 = parse_number(rest, line)?;
            Command::Event(PlayerEvent::VolumeInput {
                level: level.min(100),
            })
        }
        "mute" => Command::Event(PlayerEvent::MuteClicked),
        "seek" => {
            let percent: f32 = parse_number(rest, line)?;
            Command::Event(PlayerEvent::SeekInput {
                percent: percent.clamp(0.0, 100.0),
            })
        }
        "list" | "ls" => Command::List,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(unknown(line)),
    };

    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(value: &str, line: &str) -> Result<T> {
    value.parse().map_err(|_| unknown(line))
}

fn unknown(line: &str) -> PlayerAppError {
    PlayerAppError::UnknownCommand(line.to_string())
}
