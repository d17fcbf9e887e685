//! Minimal xboard/CECP front end for running the engine as an external
//! engine under a tournament manager or GUI (cutechess-cli, xboard itself).
//!
//! Only the subset of the protocol needed to play a game is implemented:
//! `xboard`, `protover`, `new`, `setboard`, `force`, `go`, `usermove`,
//! `level`, `st`, `sd`, `time`, `otim`, `ping`, `undo`/`remove`, `quit`.
//! Pondering, analyze mode and the engine-to-engine `result` bookkeeping
//! are accepted but ignored.

use corvid::board::{Board, Piece};
use corvid::moves::execute::{generate_legal, make_move_basic};
use corvid::moves::magic::MagicTables;
use corvid::moves::magic::loader::load_magic_tables;
use corvid::moves::types::Move;
use corvid::search::{TimeManager, search};
use std::io::{self, BufRead};
use std::str::FromStr;
use std::time::Duration;

struct Session {
    board: Board,
    history: Vec<Board>,
    forced: bool,
    depth_limit: i32,
    fixed_move_time: Option<Duration>,
    moves_to_go: u64,
    increment: Duration,
    my_time: Duration,
}

impl Session {
    fn new() -> Self {
        Self {
            board: Board::new(),
            history: Vec::new(),
            forced: false,
            depth_limit: 64,
            fixed_move_time: None,
            moves_to_go: 0,
            increment: Duration::ZERO,
            my_time: Duration::from_secs(300),
        }
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.history.clear();
        self.forced = false;
    }

    fn time_manager(&self) -> TimeManager {
        match self.fixed_move_time {
            Some(t) => TimeManager::new(Some(t)),
            None => TimeManager::from_level(self.moves_to_go, self.my_time, self.increment),
        }
    }
}

fn main() {
    let tables = load_magic_tables();
    let mut session = Session::new();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "xboard" => {}
            "protover" => print_features(),
            "new" => session.reset(),
            "setboard" => {
                let fen = parts[1..].join(" ");
                match Board::from_str(&fen) {
                    Ok(b) => {
                        session.board = b;
                        session.history.clear();
                    }
                    Err(e) => println!("Illegal position: {}", e),
                }
            }
            "force" => session.forced = true,
            "go" => {
                session.forced = false;
                engine_move(&mut session, &tables);
            }
            "usermove" => {
                if let Some(mv_str) = parts.get(1) {
                    if let Some(mv) = parse_coordinate_move(&session.board, mv_str, &tables) {
                        session.history.push(session.board.clone());
                        make_move_basic(&mut session.board, mv);
                        if !session.forced {
                            engine_move(&mut session, &tables);
                        }
                    } else {
                        println!("Illegal move: {}", mv_str);
                    }
                }
            }
            "level" => {
                if parts.len() >= 4 {
                    session.moves_to_go = parts[1].parse().unwrap_or(0);
                    session.my_time = parse_level_time(parts[2]);
                    session.increment = Duration::from_secs(parts[3].parse().unwrap_or(0));
                    session.fixed_move_time = None;
                }
            }
            "st" => {
                if let Some(secs) = parts.get(1).and_then(|s| s.parse::<u64>().ok()) {
                    session.fixed_move_time = Some(Duration::from_secs(secs));
                }
            }
            "sd" => {
                if let Some(d) = parts.get(1).and_then(|s| s.parse::<i32>().ok()) {
                    session.depth_limit = d;
                }
            }
            "time" => {
                if let Some(centis) = parts.get(1).and_then(|s| s.parse::<u64>().ok()) {
                    session.my_time = Duration::from_millis(centis * 10);
                }
            }
            "otim" => {}
            "ping" => {
                if let Some(n) = parts.get(1) {
                    println!("pong {}", n);
                }
            }
            "undo" => {
                if let Some(prev) = session.history.pop() {
                    session.board = prev;
                }
            }
            "remove" => {
                session.history.pop();
                if let Some(prev) = session.history.pop() {
                    session.board = prev;
                }
            }
            "result" | "post" | "nopost" | "hard" | "easy" | "computer" | "random" | "?" => {}
            "fen" => println!("{}", session.board.to_fen()),
            "d" | "display" => println!("{}", session.board),
            "quit" => break,
            _ => {}
        }
    }
}

fn print_features() {
    println!("feature myname=\"corvid\"");
    println!("feature ping=1 setboard=1 usermove=1 time=1 sigint=0 sigterm=0 done=1");
}

fn parse_level_time(field: &str) -> Duration {
    if let Some((minutes, seconds)) = field.split_once(':') {
        let m: u64 = minutes.parse().unwrap_or(0);
        let s: u64 = seconds.parse().unwrap_or(0);
        Duration::from_secs(m * 60 + s)
    } else {
        let m: u64 = field.parse().unwrap_or(0);
        Duration::from_secs(m * 60)
    }
}

fn engine_move(session: &mut Session, tables: &MagicTables) {
    let limit = session.time_manager().allocated_time();
    let (_score, best_move) = search(&mut session.board, tables, session.depth_limit, limit);

    match best_move {
        Some(m) => {
            session.history.push(session.board.clone());
            make_move_basic(&mut session.board, m);
            println!("move {}", m.to_uci());
        }
        None => println!("resign"),
    }
}

fn parse_coordinate_move(board: &Board, move_str: &str, tables: &MagicTables) -> Option<Move> {
    if move_str.len() < 4 {
        return None;
    }
    let chars: Vec<char> = move_str.chars().collect();

    let from_file = (chars[0] as u8).wrapping_sub(b'a');
    let from_rank = (chars[1] as u8).wrapping_sub(b'1');
    let to_file = (chars[2] as u8).wrapping_sub(b'a');
    let to_rank = (chars[3] as u8).wrapping_sub(b'1');
    if from_file > 7 || from_rank > 7 || to_file > 7 || to_rank > 7 {
        return None;
    }

    let from_square = (from_rank * 8 + from_file) as usize;
    let to_square = (to_rank * 8 + to_file) as usize;

    let promo_piece = if move_str.len() >= 5 {
        match chars[4] {
            'q' => Some(Piece::Queen),
            'r' => Some(Piece::Rook),
            'b' => Some(Piece::Bishop),
            'n' => Some(Piece::Knight),
            _ => None,
        }
    } else {
        None
    };

    let mut moves = Vec::with_capacity(256);
    let mut scratch = Vec::with_capacity(256);
    let mut board_copy = board.clone();
    generate_legal(&mut board_copy, tables, &mut moves, &mut scratch);

    for mv in moves {
        if (mv.from.index() as usize) == from_square && (mv.to.index() as usize) == to_square {
            if promo_piece.is_some() {
                if mv.promotion == promo_piece {
                    return Some(mv);
                }
            } else if mv.promotion.is_none() {
                return Some(mv);
            }
        }
    }
    None
}
