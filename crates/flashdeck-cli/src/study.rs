//! Interactive study session.
//!
//! Cards due in the deck are shown one at a time: the front first, the back
//! after Enter, then the user rates their recall from 0 to 5. Each rating is
//! submitted as a review and the session is completed with the totals when
//! the deck runs out or the user quits.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use flashdeck_core::models::{CardReviewRequest, SessionTally};
use flashdeck_core::utils::{format_duration, format_relative_time};
use flashdeck_core::validation::validate_review_result;
use flashdeck_core::ApiClient;
use tracing::{debug, info};

use crate::prompt;

const RATINGS: [&str; 6] = ["Forgot", "Wrong", "Almost", "Hard", "Good", "Easy"];

pub async fn run(client: &ApiClient, deck_id: &str) -> Result<()> {
    let (deck, cards) = tokio::try_join!(client.get_deck(deck_id), client.cards_due(deck_id))?;

    if cards.is_empty() {
        println!("No cards due in {}. Come back later!", deck.name);
        return Ok(());
    }

    let session = client.start_session(deck_id).await?;
    info!(session_id = %session.id, deck_id, due = cards.len(), "Study session started");

    println!("Studying {} ({} cards due)", deck.name, cards.len());
    println!("Rate each card: {}", rating_legend());
    println!("Enter q to stop early.");

    let mut tally = SessionTally::default();
    let total = cards.len();
    for (index, card) in cards.iter().enumerate() {
        println!();
        println!("Card {}/{}", index + 1, total);
        println!("Q: {}", card.front);

        let started = Instant::now();
        prompt::wait_for_enter("Press Enter to show the answer...")?;
        println!("A: {}", card.back);
        if let Some(notes) = &card.notes {
            println!("   {}", notes);
        }

        let Some(result) = read_rating()? else {
            debug!(reviewed = tally.reviewed, "Study session stopped early");
            break;
        };
        let seconds = started.elapsed().as_secs();

        let review = client
            .submit_review(&session.id, &CardReviewRequest::new(card.id.as_str(), result, seconds))
            .await?;
        tally.record(result, seconds);

        if let Some(next) = &review.next_review_date {
            println!("Next review {}", format_relative_time(next, Utc::now()));
        }
    }

    let completed = client
        .complete_session(&session.id, &tally.completion())
        .await?;
    info!(session_id = %completed.id, reviewed = tally.reviewed, "Study session completed");

    println!();
    println!("Session complete");
    println!("Cards reviewed: {}", tally.reviewed);
    println!("Correct:        {} ({}%)", tally.correct, tally.accuracy());
    println!("Time:           {}", format_duration(tally.seconds));
    Ok(())
}

fn rating_legend() -> String {
    RATINGS
        .iter()
        .enumerate()
        .map(|(value, label)| format!("{}={}", value, label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ask until a valid rating is entered. `None` means the user quit.
fn read_rating() -> Result<Option<u8>> {
    loop {
        let input = prompt::prompt("Rating (0-5)")?;
        if input.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        let Ok(result) = input.parse::<u8>() else {
            println!("Enter a number from 0 to 5, or q to stop.");
            continue;
        };
        match validate_review_result(result) {
            Ok(()) => return Ok(Some(result)),
            Err(e) => println!("{}", e),
        }
    }
}
