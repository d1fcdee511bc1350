// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::BufRead;
use std::io::Lines;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::Session;
use crate::types::card::Card;
use crate::types::confidence::Confidence;
use crate::types::timestamp::Timestamp;

pub fn drill(directory: Option<String>, learner: Option<String>) -> Fallible<()> {
    let mut coll = Collection::new(directory, learner)?;
    run_drill(&mut coll, stdin().lock(), stdout().lock(), Timestamp::now)
}

const CONFIDENCE_PROMPT: &str = "Confidence: (1 = guessing .. 5 = certain)";

enum Reply<T> {
    Answer(T),
    Quit,
}

/// Drill the collection's queue, reading answers from `input`.
pub fn run_drill<R, W, C>(coll: &mut Collection, input: R, mut output: W, clock: C) -> Fallible<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> Timestamp,
{
    let learner = coll.learner().to_string();
    let limit = coll.config.new_cards_per_session;
    let mut session = Session::new(&coll.db, &learner, &coll.cards, limit, clock())?;
    if session.is_done() {
        writeln!(output, "No cards to review.")?;
        return Ok(());
    }
    writeln!(output, "{} cards to review.", session.remaining())?;

    let mut lines = input.lines();
    while let Some(card) = session.current() {
        let card = card.clone();
        writeln!(output)?;
        writeln!(output, "{} {}", card_label(&card), card.term())?;
        if let Reply::Quit = ask(&mut lines, &mut output, "[press enter to reveal]", |_| Some(()))? {
            return abort(&mut output);
        }
        writeln!(output, "{}", card.definition())?;
        if let Some(example) = card.example() {
            writeln!(output, "Example: {example}")?;
        }
        let was_correct = match ask(&mut lines, &mut output, "Correct? (y/n)", parse_yes_no)? {
            Reply::Answer(answer) => answer,
            Reply::Quit => return abort(&mut output),
        };
        let confidence = match ask(&mut lines, &mut output, CONFIDENCE_PROMPT, |line| {
            line.parse::<Confidence>().ok()
        })? {
            Reply::Answer(confidence) => confidence,
            Reply::Quit => return abort(&mut output),
        };
        let record = session.answer(was_correct, confidence, clock())?;
        if record.repetitions() == 0 {
            writeln!(output, "Again later in this session.")?;
        } else {
            writeln!(output, "Next review in {} day(s).", record.interval())?;
        }
    }

    let reviews = session.review_count();
    let count = session.finish(&mut coll.db)?;
    writeln!(output, "Session complete: {reviews} reviews, {count} cards updated.")?;
    Ok(())
}

fn abort<W: Write>(output: &mut W) -> Fallible<()> {
    writeln!(output, "Session aborted, nothing was saved.")?;
    Ok(())
}

/// Prompt until the input parses. End of input and `q` both quit.
fn ask<R, W, T, P>(lines: &mut Lines<R>, output: &mut W, prompt: &str, parse: P) -> Fallible<Reply<T>>
where
    R: BufRead,
    W: Write,
    P: Fn(&str) -> Option<T>,
{
    loop {
        writeln!(output, "{prompt}")?;
        output.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(Reply::Quit),
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(Reply::Quit);
        }
        match parse(line) {
            Some(value) => return Ok(Reply::Answer(value)),
            None => writeln!(output, "Invalid input.")?,
        }
    }
}

fn parse_yes_no(line: &str) -> Option<bool> {
    match line.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// The bracketed deck, category and difficulty shown before a term.
fn card_label(card: &Card) -> String {
    match card.category() {
        Some(category) => format!("[{}, {category}, {}]", card.deck_name(), card.difficulty()),
        None => format!("[{}, {}]", card.deck_name(), card.difficulty()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;
    use std::io::Cursor;

    use tempfile::TempDir;
    use tempfile::tempdir;

    use super::*;
    use crate::store::ReviewStore;
    use crate::types::card_id::CardId;

    fn collection() -> Fallible<(TempDir, Collection)> {
        let dir = tempdir()?;
        write(
            dir.path().join("saving.toml"),
            r#"
[[cards]]
id = "apy"
term = "APY"
definition = "Annual percentage yield."

[[cards]]
id = "cd"
term = "Certificate of deposit"
definition = "A savings account with a fixed term and rate."
example = "A 12-month CD paying 4%."
category = "savings"
difficulty = "intermediate"
"#,
        )?;
        let coll = Collection::new(Some(dir.path().display().to_string()), None)?;
        Ok((dir, coll))
    }

    fn clock() -> Timestamp {
        Timestamp::parse_rfc3339("2025-06-15T12:00:00Z").unwrap()
    }

    fn run(coll: &mut Collection, input: &str) -> Fallible<String> {
        let mut output: Vec<u8> = Vec::new();
        run_drill(coll, Cursor::new(input), &mut output, clock)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_complete_session() -> Fallible<()> {
        let (_dir, mut coll) = collection()?;
        // APY right; CD wrong, then right on the retry.
        let input = "\ny\n5\n\nn\n2\n\nyes\n3\n";
        let output = run(&mut coll, input)?;
        assert!(output.contains("2 cards to review."));
        assert!(output.contains("[saving, beginner] APY"));
        assert!(output.contains("[saving, savings, intermediate] Certificate of deposit"));
        assert!(output.contains("Example: A 12-month CD paying 4%."));
        assert!(output.contains("Session complete: 3 reviews, 2 cards updated."));
        let apy = coll.db.get("default", &CardId::new("apy")?)?.unwrap();
        assert_eq!(apy.repetitions(), 1);
        assert_eq!(apy.total_reviews(), 1);
        let cd = coll.db.get("default", &CardId::new("cd")?)?.unwrap();
        assert_eq!(cd.repetitions(), 1);
        assert_eq!(cd.total_reviews(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_input_is_asked_again() -> Fallible<()> {
        let (_dir, mut coll) = collection()?;
        let input = "\nmaybe\ny\n9\n4\n\ny\n4\n";
        let output = run(&mut coll, input)?;
        assert_eq!(output.matches("Invalid input.").count(), 2);
        assert_eq!(coll.db.all("default")?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_quit_saves_nothing() -> Fallible<()> {
        let (_dir, mut coll) = collection()?;
        let output = run(&mut coll, "\ny\n5\nq\n")?;
        assert!(output.contains("Session aborted"));
        assert!(coll.db.all("default")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_end_of_input_saves_nothing() -> Fallible<()> {
        let (_dir, mut coll) = collection()?;
        run(&mut coll, "\ny\n")?;
        assert!(coll.db.all("default")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_nothing_due() -> Fallible<()> {
        let (_dir, mut coll) = collection()?;
        run(&mut coll, "\ny\n5\n\ny\n5\n")?;
        let output = run(&mut coll, "")?;
        assert_eq!(output, "No cards to review.\n");
        Ok(())
    }
}
