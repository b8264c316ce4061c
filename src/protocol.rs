//! Line-oriented text protocol for playing against the engine.
//!
//! The framing follows GTP: each command may start with a numeric id, and
//! each response is `=[id] message` on success or `?[id] message` on failure,
//! followed by a blank line. Coordinates are `a1`..`f6`, file first, rank 1
//! at Black's side.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`,
//!   `known_command <cmd>`, `quit`
//! - `new <black|white>` - start a game, the human playing the given color
//! - `showboard` - render the board with the current markers
//! - `turn`, `winner`, `movable` - query the game
//! - `moves <pos>` - destinations of the piece on `pos`
//! - `select <pos>` - select a piece and mark its destinations
//! - `click <pos>` - move the selected piece to `pos`
//! - `play <from> <to>` - apply a move directly
//! - `genmove` - let the engine make its move
//! - `stats` - diagnostics of the last engine search
//!
//! Once a game is started with `new`, the human commands (`select`, `click`,
//! `play`) are refused on the engine's turn and `genmove` on the human's.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::board::{Color, MoveKind, Point, parse_point, str_point};
use crate::config::EngineConfig;
use crate::game::GameState;
use crate::search::{SearchEngine, SearchStats, Termination};
use crate::worker::spawn_search;

const KNOWN_COMMANDS: &[&str] = &[
    "click",
    "genmove",
    "known_command",
    "list_commands",
    "movable",
    "moves",
    "name",
    "new",
    "play",
    "protocol_version",
    "quit",
    "select",
    "showboard",
    "stats",
    "turn",
    "version",
    "winner",
];

type Response = (bool, String);

pub struct ProtocolEngine {
    state: GameState,
    /// Lent to the worker thread while a search runs
    engine: Option<SearchEngine>,
    config: EngineConfig,
    last_search: Option<(SearchStats, Termination)>,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ProtocolEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: GameState::empty(),
            engine: Some(SearchEngine::new(config.clone())),
            config,
            last_search: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(stdout, "{prefix}{id_str} {message}\n\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command id off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Moves from the command line are refused while the engine is on move.
    fn human_may_move(&self) -> Result<(), String> {
        if self.state.is_engine_turn() {
            Err("engine is to move".to_string())
        } else {
            Ok(())
        }
    }

    fn point_arg(args: &[&str], i: usize) -> Result<Point, String> {
        let arg = args.get(i).ok_or("missing argument")?;
        parse_point(arg).map_err(|e| e.to_string())
    }

    /// Execute one command and return `(success, response)`.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Response {
        let result = match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "protocol_version" => Ok("2".to_string()),
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "known_command" => match args.first() {
                Some(cmd) => Ok(KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str()).to_string()),
                None => Err("missing argument".to_string()),
            },
            "quit" => Ok(String::new()),
            "new" => self.cmd_new(args),
            "showboard" => Ok(format!("\n{}", self.state)),
            "turn" => Ok(color_or_none(self.state.turn)),
            "winner" => Ok(color_or_none(self.state.winner)),
            "movable" => Ok(points(self.state.movable().iter().copied())),
            "moves" => Self::point_arg(args, 0).map(|pt| self.destinations(pt)),
            "select" => self.cmd_select(args),
            "click" => self.cmd_click(args),
            "play" => self.cmd_play(args),
            "genmove" => self.cmd_genmove(),
            "stats" => self.cmd_stats(),
            _ => Err(format!("unknown command: {command}")),
        };
        match result {
            Ok(msg) => (true, msg),
            Err(msg) => (false, msg),
        }
    }

    fn cmd_new(&mut self, args: &[&str]) -> Result<String, String> {
        let human = match args.first() {
            Some(arg) => arg.parse::<Color>().map_err(|e| e.to_string())?,
            None => Color::Black,
        };
        self.state = GameState::new(human);
        if let Some(engine) = self.engine.as_mut() {
            engine.reset();
        }
        self.last_search = None;
        Ok(String::new())
    }

    fn destinations(&self, pt: Point) -> String {
        self.state
            .legal_destinations(pt)
            .into_iter()
            .map(|(dest, kind)| match kind {
                MoveKind::Move => str_point(dest),
                MoveKind::Jump => format!("x{}", str_point(dest)),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn cmd_select(&mut self, args: &[&str]) -> Result<String, String> {
        let pt = Self::point_arg(args, 0)?;
        self.human_may_move()?;
        if self.state.select_piece(pt) {
            Ok(self.destinations(pt))
        } else {
            Err("no movable piece there".to_string())
        }
    }

    fn cmd_click(&mut self, args: &[&str]) -> Result<String, String> {
        let dest = Self::point_arg(args, 0)?;
        self.human_may_move()?;
        let Some(origin) = self.state.active() else {
            return Err("no piece selected".to_string());
        };
        let mv = self
            .state
            .piece_at(origin)
            .and_then(|p| p.legal_moves().iter().find(|m| m.destination == dest))
            .cloned();
        match mv {
            Some(mv) if self.state.select_tile(dest) => Ok(mv.to_string()),
            _ => Err("illegal move".to_string()),
        }
    }

    fn cmd_play(&mut self, args: &[&str]) -> Result<String, String> {
        let from = Self::point_arg(args, 0)?;
        let to = Self::point_arg(args, 1)?;
        self.human_may_move()?;
        let mv = self
            .state
            .legal_moves()
            .into_iter()
            .find(|m| m.origin == from && m.destination == to)
            .ok_or("illegal move")?;
        if self.state.play(&mv) {
            Ok(mv.to_string())
        } else {
            Err("illegal move".to_string())
        }
    }

    fn cmd_genmove(&mut self) -> Result<String, String> {
        if self.state.winner.is_some() {
            return Err("game is over".to_string());
        }
        if self.state.turn.is_none() {
            return Err("no game in progress".to_string());
        }
        if self.state.is_human_turn() {
            return Err("human is to move".to_string());
        }

        let engine = self
            .engine
            .take()
            .unwrap_or_else(|| SearchEngine::new(self.config.clone()));
        let pending = spawn_search(engine, &self.state);
        debug!("search started");
        let (engine, outcome) = pending.wait();
        self.engine = Some(engine);

        let outcome = outcome.ok_or("no legal move")?;
        if !self.state.play(&outcome.best) {
            return Err("engine produced an illegal move".to_string());
        }
        info!("engine plays {}", outcome.best);
        self.last_search = Some((outcome.stats, outcome.termination));
        Ok(outcome.best.to_string())
    }

    fn cmd_stats(&self) -> Result<String, String> {
        let (stats, termination) = self.last_search.as_ref().ok_or("no search yet")?;
        let adjustment = self.engine.as_ref().map_or(0, SearchEngine::depth_adjustment);
        Ok(format!(
            "{termination:?} nodes {} depth {}/{} pruned {}/{} value {} time {:.3}s next adjustment {adjustment}",
            stats.nodes,
            stats.max_depth,
            stats.cutoff_depth,
            stats.max_pruned,
            stats.min_pruned,
            stats.value,
            stats.elapsed.as_secs_f64(),
        ))
    }
}

fn color_or_none(color: Option<Color>) -> String {
    color.map_or_else(|| "none".to_string(), |c| c.to_string().to_lowercase())
}

fn points(pts: impl Iterator<Item = Point>) -> String {
    pts.map(str_point).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> ProtocolEngine {
        ProtocolEngine::new(EngineConfig {
            base_cutoff: 3,
            move_delay_ms: 0,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_known_command() {
        let mut engine = quick();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["komi"]), (true, "false".to_string()));
        assert!(!engine.execute("known_command", &[]).0);
        assert!(!engine.execute("komi", &["7.5"]).0);
    }

    #[test]
    fn test_new_game_queries() {
        let mut engine = quick();
        assert_eq!(engine.execute("turn", &[]), (true, "none".to_string()));
        assert!(engine.execute("new", &["white"]).0);
        assert_eq!(engine.execute("turn", &[]), (true, "black".to_string()));
        assert_eq!(engine.execute("winner", &[]), (true, "none".to_string()));
        assert_eq!(engine.execute("movable", &[]), (true, "b2 d2 f2".to_string()));
        assert_eq!(engine.execute("moves", &["b2"]), (true, "a3 c3".to_string()));
        assert!(!engine.execute("new", &["red"]).0);
    }

    #[test]
    fn test_select_and_click() {
        let mut engine = quick();
        engine.execute("new", &["black"]);
        assert!(!engine.execute("click", &["c3"]).0);
        assert!(!engine.execute("select", &["a1"]).0);
        assert_eq!(engine.execute("select", &["b2"]), (true, "a3 c3".to_string()));
        assert!(!engine.execute("click", &["b3"]).0);
        assert_eq!(engine.execute("click", &["c3"]), (true, "b2-c3".to_string()));
        assert_eq!(engine.execute("turn", &[]), (true, "white".to_string()));
    }

    #[test]
    fn test_play_rejects_illegal_moves() {
        let mut engine = quick();
        engine.execute("new", &["black"]);
        assert!(!engine.execute("play", &["a1", "b2"]).0);
        assert!(!engine.execute("play", &["b2", "z9"]).0);
        assert!(!engine.execute("play", &["b2"]).0);
        assert_eq!(engine.execute("play", &["d2", "e3"]), (true, "d2-e3".to_string()));
    }

    #[test]
    fn test_each_side_moves_only_on_its_turn() {
        let mut engine = quick();
        engine.execute("new", &["black"]);
        assert_eq!(engine.execute("genmove", &[]), (false, "human is to move".to_string()));
        assert_eq!(engine.state().turn, Some(Color::Black));

        assert_eq!(engine.execute("play", &["b2", "c3"]), (true, "b2-c3".to_string()));
        let before = engine.state().clone();
        assert_eq!(engine.execute("play", &["a5", "b4"]), (false, "engine is to move".to_string()));
        assert!(!engine.execute("select", &["a5"]).0);
        assert!(!engine.execute("click", &["b4"]).0);
        assert_eq!(engine.state(), &before);

        assert!(engine.execute("genmove", &[]).0);
        assert_eq!(engine.state().turn, Some(Color::Black));
    }

    #[test]
    fn test_genmove_plays_for_side_to_move() {
        let mut engine = quick();
        assert!(!engine.execute("genmove", &[]).0);
        assert!(!engine.execute("stats", &[]).0);
        engine.execute("new", &["white"]);
        let (ok, mv) = engine.execute("genmove", &[]);
        assert!(ok);
        assert_eq!(mv.len(), 5);
        assert_eq!(engine.state().turn, Some(Color::White));
        let (ok, stats) = engine.execute("stats", &[]);
        assert!(ok);
        assert!(stats.starts_with("ReachedCutoff"));
    }
}
