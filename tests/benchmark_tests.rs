//! Performance benchmarks for board operations and command parsing

use rand::Rng;
use server::board::Board;
use server::config::BoardConfig;
use shared::{parse_command, NoteFilter, Point};
use std::time::Instant;

fn large_board() -> Board {
    let config = BoardConfig::new(
        1000,
        1000,
        10,
        10,
        vec!["red".to_string(), "green".to_string(), "blue".to_string()],
    )
    .unwrap();
    Board::new(config)
}

/// Fills the board with `count` notes on a grid of distinct origins.
fn populate(board: &mut Board, count: i32) {
    for i in 0..count {
        let origin = Point::new((i % 99) * 10, (i / 99) * 10);
        board
            .post(origin, "red".to_string(), format!("note number {}", i))
            .unwrap();
    }
}

/// Benchmarks posting onto an increasingly full board
#[test]
fn benchmark_post() {
    let mut board = large_board();
    let iterations = 2_000;
    let start = Instant::now();

    populate(&mut board, iterations);

    let duration = start.elapsed();
    println!(
        "Post: {} notes in {:?} ({:.2} μs/note)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(board.note_count(), iterations as usize);
    // Linear overlap scan per post, should still finish well under a second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks filtered queries against random points
#[test]
fn benchmark_query_notes() {
    let mut board = large_board();
    populate(&mut board, 2_000);

    let mut rng = rand::thread_rng();
    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let filter = NoteFilter {
            colour: Some("red".to_string()),
            contains: Some(Point::new(rng.gen_range(0..1000), rng.gen_range(0..1000))),
            refers_to: Some("number".to_string()),
        };
        let notes = board.query_notes(&filter);
        assert!(notes.len() <= 1);
    }

    let duration = start.elapsed();
    println!(
        "Query: {} filtered queries in {:?} ({:.2} μs/query)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}

/// Benchmarks pin/shake cycles with random pin placement
#[test]
fn benchmark_pin_and_shake() {
    let mut rng = rand::thread_rng();
    let rounds = 50;
    let start = Instant::now();

    for _ in 0..rounds {
        let mut board = large_board();
        populate(&mut board, 500);

        for _ in 0..100 {
            let point = Point::new(rng.gen_range(0..990), rng.gen_range(0..60));
            let _ = board.add_pin(point);
        }

        let pins = board.pin_count();
        board.shake();

        // every surviving note is pinned, and no pin was lost
        assert_eq!(board.pin_count(), pins);
        assert!(board
            .query_notes(&NoteFilter::default())
            .iter()
            .all(|note| note.pinned));
    }

    let duration = start.elapsed();
    println!(
        "Pin and shake: {} rounds in {:?} ({:.2} ms/round)",
        rounds,
        duration,
        duration.as_secs_f64() * 1000.0 / rounds as f64
    );

    assert!(duration.as_millis() < 2000);
}

/// Benchmarks command parsing
#[test]
fn benchmark_parse_command() {
    let lines = [
        "POST 10 20 red a fairly ordinary message with several words",
        "GET color=red contains 15 25 refersTo=ordinary message",
        "GET PINS",
        "PIN 15 25",
        "UNPIN 15 25",
        "SHAKE",
    ];

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let result = parse_command(lines[i % lines.len()]);
        assert!(result.is_ok());
    }

    let duration = start.elapsed();
    println!(
        "Parse: {} lines in {:?} ({:.2} ns/line)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 1000);
}
