#![forbid(unsafe_code)]

//! Filler text for the debug routes and `--seed-demo`.

use lt_core::model::LogEntry;
use lt_core::time::{clock_hms, now_ms};
use rand::Rng;

pub const FILL_LINES: usize = 100;
pub const SEED_ROWS: usize = 100;
const WORDS_PER_SENTENCE: usize = 3;
const ROWS_PER_COMMIT: usize = 10;

const WORDS: &[&str] = &[
    "foo", "bar", "baz", "qux", "quux", "corge", "grault", "garply", "waldo", "fred", "plugh",
    "xyzzy", "thud", "wibble", "wobble", "wubble", "flob",
];

fn word(rng: &mut impl Rng) -> &'static str {
    WORDS[rng.random_range(0..WORDS.len())]
}

fn sentence(rng: &mut impl Rng) -> String {
    let mut out = String::new();
    for i in 0..WORDS_PER_SENTENCE {
        let w = word(rng);
        if i == 0 {
            let mut chars = w.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(w);
        }
    }
    out.push('.');
    out
}

/// `00/00 HH:MM:SS  [Log] <sentence> <sentence> <sentence>`, shaped like a
/// game client line so it gets the `log` class.
pub fn demo_line(ts_ms: i64) -> String {
    let mut rng = rand::rng();
    format!(
        "00/00 {}  [Log] {} {} {}",
        clock_hms(ts_ms),
        sentence(&mut rng),
        sentence(&mut rng),
        sentence(&mut rng)
    )
}

/// `rows` entries spread over a new random commit every ten rows, each row
/// under a random player.
pub fn demo_entries(rows: usize) -> Vec<LogEntry> {
    let mut rng = rand::rng();
    let now = now_ms();
    let mut commit = String::new();
    (0..rows)
        .map(|i| {
            if i % ROWS_PER_COMMIT == 0 {
                commit = format!("{:08x}", rng.random::<u32>());
            }
            LogEntry {
                commit: commit.clone(),
                player: word(&mut rng).to_string(),
                message: demo_line(now),
                created_at_ms: now,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lt_core::fragment::classify;

    #[test]
    fn demo_lines_carry_the_log_level() {
        let line = demo_line(3_723_000);
        assert!(line.starts_with("00/00 01:02:03  [Log] "), "{line}");
        assert_eq!(classify(&line), "log");
        assert_eq!(line.matches('.').count(), 3);
    }

    #[test]
    fn demo_entries_rotate_commits() {
        let entries = demo_entries(25);
        assert_eq!(entries.len(), 25);
        assert_eq!(entries[0].commit, entries[9].commit);
        assert!(entries.iter().all(|e| e.commit.len() == 8));
        assert!(entries.iter().all(|e| WORDS.contains(&e.player.as_str())));
    }
}
