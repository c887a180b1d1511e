//! Interactive session runner.
//!
//! Drives a session_core session from the terminal: moves are typed in
//! coordinate form, events stream back as plain text or JSON lines.

use std::env;
use std::io::BufRead;
use std::str::FromStr;
use std::time::Duration;

use chess::{Color, Piece, Square};
use log::error;
use session_core::{spawn_session, ChessClock, Personality, SessionConfig, SessionEvent, TimeControl};
use tokio::sync::mpsc;

mod backend;

use backend::GreedyMaterialSpawner;

fn print_usage() {
    println!("Chess Session Runner");
    println!();
    println!("Usage:");
    println!("  session [--opponent KEY] [--time M+S] [--color white|black] [--hot-seat] [--json]");
    println!();
    println!("Options:");
    println!("  --opponent, -o KEY    automated opponent (default: master)");
    println!("  --time, -t M+S        time control, minutes+increment (default: 10+5, 0+0 = untimed)");
    println!("  --color, -c COLOR     side you play (default: white)");
    println!("  --hot-seat            two humans, no automated opponent");
    println!("  --json                print events as JSON lines");
    println!();
    println!("Opponents:");
    for personality in Personality::all() {
        println!("  {:<10} - {}", personality.key, personality.display_name);
    }
    println!();
    println!("During play:");
    println!("  e2e4       make a move (e7e8q to promote)");
    println!("  resign     resign the game");
    println!("  reset      start a fresh game");
    println!("  quit       exit");
}

struct CliOptions {
    config: SessionConfig,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut config = SessionConfig {
        opponent: Some("master".to_string()),
        ..SessionConfig::default()
    };
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--opponent" | "-o" => {
                let key = args
                    .get(i + 1)
                    .ok_or("--opponent requires a personality key")?;
                if !Personality::all().any(|p| p.key == key.as_str()) {
                    return Err(format!("unknown opponent {:?}", key));
                }
                config.opponent = Some(key.clone());
                i += 1;
            }
            "--time" | "-t" => {
                let spec = args.get(i + 1).ok_or("--time requires a value like 10+5")?;
                config.time_control =
                    TimeControl::from_str(spec).map_err(|e| e.to_string())?;
                i += 1;
            }
            "--color" | "-c" => {
                let color = args.get(i + 1).ok_or("--color requires white or black")?;
                config.player_color = match color.to_lowercase().as_str() {
                    "white" | "w" => Color::White,
                    "black" | "b" => Color::Black,
                    other => return Err(format!("unknown color {:?}", other)),
                };
                i += 1;
            }
            "--hot-seat" => config.opponent = None,
            "--json" => json = true,
            other => return Err(format!("unknown argument {:?}", other)),
        }
        i += 1;
    }

    Ok(CliOptions { config, json })
}

/// Parse coordinate move text ("e2e4", "e7e8q").
fn parse_move(text: &str) -> Option<(Square, Square, Option<Piece>)> {
    if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
        return None;
    }
    let from = Square::from_str(&text[0..2]).ok()?;
    let to = Square::from_str(&text[2..4]).ok()?;
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(_) => return None,
    };
    Some((from, to, promotion))
}

fn clock_text(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => ChessClock::format_time(Duration::from_millis(ms)),
        None => "--:--".to_string(),
    }
}

fn print_event(event: &SessionEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("event serialization failed: {}", e),
        }
        return;
    }
    match event {
        SessionEvent::MoveApplied { from, to, san, .. } => {
            println!("  {} ({}{})", san, from, to);
        }
        SessionEvent::StatusChanged { status } => println!("{}", status),
        SessionEvent::ClockTick { white_ms, black_ms } => {
            println!("  [{} | {}]", clock_text(*white_ms), clock_text(*black_ms));
        }
        SessionEvent::SelectionChanged { .. } => {}
        SessionEvent::PremoveQueued { from, to } => println!("  premove queued: {}{}", from, to),
        SessionEvent::PremoveCleared => println!("  premove cleared"),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            println!();
            print_usage();
            std::process::exit(2);
        }
    };

    let json = options.json;
    let mut handle = spawn_session(options.config, Box::new(GreedyMaterialSpawner));

    // Blocking stdin reader on its own thread, lines forwarded to the loop.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            event = handle.next_event() => {
                match event {
                    Some(event) => print_event(&event, json),
                    None => break,
                }
            }
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                match line.trim() {
                    "" => {}
                    "quit" | "exit" => break,
                    "help" => print_usage(),
                    "resign" => {
                        handle.resign().await;
                    }
                    "reset" => {
                        handle.reset().await;
                    }
                    text => match parse_move(&text.to_lowercase()) {
                        Some((from, to, promotion)) => {
                            handle.attempt_move(from, to, promotion).await;
                        }
                        None => eprintln!(
                            "Unrecognized command {:?} (try \"e2e4\", \"resign\", \"reset\", \"quit\")",
                            text
                        ),
                    },
                }
            }
        }
    }
}
