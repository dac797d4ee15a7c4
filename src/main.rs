use melodine::config::Config;
use melodine::game::{Difficulty, GameSession};
use melodine::melody::LogPlayer;
use melodine::{AudioCapture, PitchDetector, create_chunk_channel, create_notification_channel};
use ringbuf::traits::Consumer;
use std::io::BufRead;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// Chunk channel capacity: at 2048 samples / 44.1kHz a chunk arrives every
// ~46ms, so 32 slots buffer well over a second of logic-thread stall.
const CHUNK_CHANNEL_CAPACITY: usize = 32;
const NOTIFICATION_CHANNEL_CAPACITY: usize = 64;

/// Poll period of the logic loop. Far below the chunk period so scheduled
/// transitions fire close to their due times.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

fn main() {
    env_logger::init();

    println!("=== Melodine ===");
    println!("Ear training: listen to the melody, then sing it back.\n");

    let config = match std::env::args().nth(1) {
        Some(path) => match Config::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: cannot load config {path}: {e}");
                return;
            }
        },
        None => Config::default(),
    };

    let (chunk_tx, mut chunk_rx) = create_chunk_channel(CHUNK_CHANNEL_CAPACITY);
    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_CHANNEL_CAPACITY);
    let notification_tx = Arc::new(Mutex::new(notification_tx));

    let mut capture = AudioCapture::new(config.audio.clone(), chunk_tx, notification_tx);
    let mut detector = PitchDetector::new(&config.audio);
    let mut session = GameSession::new(Difficulty::default(), config);
    let mut player = LogPlayer::new();

    // Stdin commands arrive on their own thread so the logic loop never
    // blocks on input
    let commands = spawn_stdin_reader();

    println!("Commands: play | replay | stop | difficulty <name> | score | quit\n");

    let mut last_view = session.view();
    loop {
        let now = Instant::now();

        match commands.try_recv() {
            Ok(line) => {
                let mut parts = line.split_whitespace();
                match parts.next() {
                    Some("play") => {
                        if let Err(e) = capture.start() {
                            eprintln!("Microphone error: {e}");
                            session.microphone_error(now);
                        } else {
                            session.play_melody(&mut player, now);
                        }
                    }
                    Some("replay") => session.replay(&mut player, now),
                    Some("stop") => {
                        session.stop();
                        capture.stop();
                    }
                    Some("difficulty") => {
                        let difficulty = Difficulty::from_name(parts.next().unwrap_or(""));
                        session.set_difficulty(difficulty);
                        println!("Difficulty: {difficulty}");
                    }
                    Some("score") => {
                        let view = session.view();
                        println!("Score: {:.1}  Streak: {}", view.score, view.streak);
                    }
                    Some("quit") => break,
                    Some(other) => println!("Unknown command: {other}"),
                    None => {}
                }
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => break,
        }

        // Run detection on every chunk the capture produced
        while let Some(chunk) = chunk_rx.try_pop() {
            let frequency = detector.detect(&chunk.samples, chunk.sample_rate);
            session.process_pitch(frequency, now);
        }

        while let Some(notification) = notification_rx.try_pop() {
            eprintln!("{notification}");
        }

        session.tick(&mut player, now);

        // The session returns to idle on its own after success or running
        // out of attempts; release the microphone when that happens
        if session.state().is_idle() && capture.is_running() {
            capture.stop();
        }

        let view = session.view();
        if view != last_view {
            print_view(&view);
            last_view = view;
        }

        thread::sleep(TICK_INTERVAL);
    }

    capture.stop();
    println!("Bye!");
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn print_view(view: &melodine::SessionView) {
    let melody = view
        .melody
        .as_ref()
        .map(|notes| {
            notes
                .iter()
                .enumerate()
                .map(|(i, pc)| {
                    if view.matched_indices.contains(&i) {
                        format!("[{pc}]")
                    } else {
                        pc.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_else(|| "-".to_string());

    let detected = view
        .detected_note
        .map(|pc| pc.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{:?} | melody: {melody} | heard: {detected} | attempts: {} | score: {:.1} (streak {}){}",
        view.state,
        view.attempts_left,
        view.score,
        view.streak,
        view.feedback
            .map(|f| format!(" | {f}"))
            .unwrap_or_default()
    );
}
