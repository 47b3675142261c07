//! Text rendering for command output.
//!
//! The `*_line` helpers build one line of a listing and are kept free of I/O
//! so they can be tested; the `print_*` functions write to stdout.

use anyhow::Result;
use chrono::{DateTime, Utc};
use flashdeck_core::models::{Card, Dashboard, Deck, StudySession, StudyStatistics, User};
use flashdeck_core::utils::{format_date, format_duration, format_relative_time, truncate_string};
use serde::Serialize;

/// Column width for card faces in listings
const CARD_FACE_WIDTH: usize = 30;

/// Column width for deck names in listings
const DECK_NAME_WIDTH: usize = 28;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn deck_line(deck: &Deck, now: DateTime<Utc>) -> String {
    let studied = match &deck.last_studied {
        Some(at) => format!("studied {}", format_relative_time(at, now)),
        None => "never studied".to_string(),
    };
    let due = match deck.due_card_count {
        Some(n) if n > 0 => format!(", {} due", n),
        _ => String::new(),
    };
    format!(
        "{:<12} {:<width$} {}{} ({})",
        deck.id,
        truncate_string(&deck.name, DECK_NAME_WIDTH),
        deck.display_card_count(),
        due,
        studied,
        width = DECK_NAME_WIDTH
    )
}

pub fn card_line(card: &Card, now: DateTime<Utc>) -> String {
    let due = if card.is_due(now) {
        "due now".to_string()
    } else {
        format!("due {}", format_relative_time(&card.next_review_date, now))
    };
    format!(
        "{:<12} {:<width$} {:<width$} {}",
        card.id,
        truncate_string(&card.front, CARD_FACE_WIDTH),
        truncate_string(&card.back, CARD_FACE_WIDTH),
        due,
        width = CARD_FACE_WIDTH
    )
}

pub fn session_line(session: &StudySession) -> String {
    let state = if session.is_completed() {
        format!("{}% correct", session.accuracy())
    } else {
        "in progress".to_string()
    };
    format!(
        "{:<12} {:<20} {:<16} {} cards, {}, {}",
        session.id,
        format_date(&session.started_at),
        truncate_string(&session.deck_name, 16),
        session.cards_studied,
        format_duration(session.time_spent_seconds),
        state
    )
}

pub fn print_user(user: &User) {
    println!("Username: {}", user.username);
    println!("Email:    {}", user.email);
}

pub fn print_decks(decks: &[Deck]) {
    if decks.is_empty() {
        println!("No decks yet. Create one with `flashdeck decks create <name>`.");
        return;
    }
    let now = Utc::now();
    for deck in decks {
        println!("{}", deck_line(deck, now));
    }
}

pub fn print_deck(deck: &Deck) {
    println!("{}", deck.name);
    if !deck.description.is_empty() {
        println!("{}", deck.description);
    }
    println!();
    println!("Id:           {}", deck.id);
    println!("Cards:        {}", deck.card_count);
    if let Some(due) = deck.due_card_count {
        println!("Due:          {}", due);
    }
    println!("Created:      {}", format_date(&deck.created_at));
    match &deck.last_studied {
        Some(at) => println!("Last studied: {}", format_relative_time(at, Utc::now())),
        None => println!("Last studied: never"),
    }
}

pub fn print_cards(cards: &[Card]) {
    if cards.is_empty() {
        println!("This deck has no cards.");
        return;
    }
    let now = Utc::now();
    for card in cards {
        println!("{}", card_line(card, now));
    }
}

pub fn print_card(card: &Card) {
    println!("Front:       {}", card.front);
    println!("Back:        {}", card.back);
    if let Some(notes) = &card.notes {
        println!("Notes:       {}", notes);
    }
    if !card.tags.is_empty() {
        println!("Tags:        {}", card.tags_display());
    }
    println!("Reviews:     {}", card.review_count);
    println!("Difficulty:  {:.2}", card.difficulty);
    println!(
        "Next review: {}",
        format_relative_time(&card.next_review_date, Utc::now())
    );
}

pub fn print_sessions(sessions: &[StudySession]) {
    if sessions.is_empty() {
        println!("No study sessions yet.");
        return;
    }
    for session in sessions {
        println!("{}", session_line(session));
    }
}

pub fn print_session(session: &StudySession) {
    println!("{}", session.deck_name);
    println!("Started:  {}", format_date(&session.started_at));
    match &session.completed_at {
        Some(at) => println!("Finished: {}", format_date(at)),
        None => println!("Finished: not yet"),
    }
    println!("Cards:    {}", session.cards_studied);
    println!("Correct:  {} ({}%)", session.cards_correct, session.accuracy());
    println!("Time:     {}", format_duration(session.time_spent_seconds));
}

pub fn print_statistics(stats: &StudyStatistics) {
    if !stats.period.is_empty() {
        println!("Period:            {}", stats.period);
    }
    println!("Sessions:          {}", stats.completed_sessions);
    println!("Cards studied:     {}", stats.total_cards_studied);
    println!("Time studied:      {:.0} min", stats.total_time_spent_minutes);
    println!("Average correct:   {:.1}%", stats.average_correct_percentage);
    println!("Current streak:    {} days", stats.current_streak);
    println!("Longest streak:    {} days", stats.longest_streak);
}

pub fn print_dashboard(dashboard: &Dashboard) {
    let now = Utc::now();

    let due = dashboard.due_decks();
    if due.is_empty() {
        println!("Nothing due. You're all caught up!");
    } else {
        println!("Due for review ({} cards)", dashboard.total_due_cards());
        for deck in due {
            println!("  {}", deck_line(deck, now));
        }
    }

    println!();
    println!("Decks");
    if dashboard.decks.is_empty() {
        println!("  No decks yet.");
    }
    for deck in &dashboard.decks {
        println!("  {}", deck_line(deck, now));
    }

    println!();
    println!("Recent activity");
    if dashboard.recent_sessions.is_empty() {
        println!("  No study sessions yet.");
    }
    for session in &dashboard.recent_sessions {
        println!("  {}", session_line(session));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-06T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn deck(last_studied: Option<&str>, due: Option<u32>) -> Deck {
        Deck {
            id: "d1".into(),
            name: "Spanish".into(),
            description: String::new(),
            card_count: 1,
            created_at: "2025-05-01T00:00:00Z".into(),
            updated_at: "2025-05-01T00:00:00Z".into(),
            last_studied: last_studied.map(str::to_string),
            due_card_count: due,
        }
    }

    #[test]
    fn test_deck_line() {
        let line = deck_line(&deck(Some("2025-05-04T12:00:00Z"), Some(3)), now());
        assert!(line.starts_with("d1"));
        assert!(line.contains("1 card, 3 due (studied 2 days ago)"), "{line}");

        let line = deck_line(&deck(None, Some(0)), now());
        assert!(line.ends_with("1 card (never studied)"), "{line}");
    }

    #[test]
    fn test_card_line() {
        let card = Card {
            id: "c1".into(),
            front: "hola".into(),
            back: "hello".into(),
            notes: None,
            difficulty: 2.5,
            next_review_date: "2025-05-09T12:00:00Z".into(),
            review_count: 2,
            created_at: String::new(),
            updated_at: String::new(),
            tags: vec![],
        };
        assert!(card_line(&card, now()).ends_with("due in 3 days"));

        let overdue = Card {
            next_review_date: "2025-05-01T00:00:00Z".into(),
            ..card
        };
        assert!(card_line(&overdue, now()).ends_with("due now"));
    }

    #[test]
    fn test_session_line() {
        let mut session = StudySession {
            id: "s1".into(),
            deck_id: "d1".into(),
            deck_name: "Spanish".into(),
            started_at: "2025-05-06T10:00:00Z".into(),
            completed_at: None,
            cards_studied: 4,
            cards_correct: 3,
            time_spent_seconds: 150,
        };
        assert!(session_line(&session).ends_with("4 cards, 2m 30s, in progress"));

        session.completed_at = Some("2025-05-06T10:03:00Z".into());
        assert!(session_line(&session).ends_with("75% correct"));
        assert!(session_line(&session).contains("May 6, 2025"));
    }
}
