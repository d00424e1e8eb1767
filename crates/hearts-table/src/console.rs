//! Plain-text front end: renders the human seat's view and reads plays from a line stream.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::thread;

use anyhow::{Context, Result};
use hearts_core::game::engine::{GamePhase, PlayOutcome};
use hearts_core::game::view::SeatView;
use hearts_core::model::card::{Card, ParseCardError};
use hearts_core::model::seat::Seat;

use crate::table::{Table, TableEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Card),
    NewDeal,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, ParseCardError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "new" | "n" => Ok(Command::NewDeal),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => line.parse().map(Command::Play),
    }
}

const HELP: &str = "Enter a card as rank then suit (e.g. QS, 10H, 2C). \
Commands: new (start a new deal), help, quit.";

pub fn describe(event: &TableEvent) -> String {
    match event {
        TableEvent::CardPlayed { seat, card } => format!("{seat} plays {card}"),
        TableEvent::TrickResolved { winner, points } => match points {
            0 => format!("{winner} takes the trick"),
            _ => format!("{winner} takes the trick (+{points})"),
        },
        TableEvent::GameOver { .. } => "The deal is over.".to_string(),
    }
}

fn seat_label(seat: Seat) -> String {
    if seat.is_human() {
        format!("{seat} (you)")
    } else {
        seat.to_string()
    }
}

fn join_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> String {
    cards
        .into_iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render(view: &SeatView) -> String {
    let mut out = String::new();
    let scores = Seat::LOOP
        .iter()
        .map(|seat| format!("{} {}", seat_label(*seat), view.scores[seat.index()]))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "Deal #{} | Scores: {scores}", view.deal_id);

    if view.phase == GamePhase::GameOver {
        let low = view.scores.iter().copied().min().unwrap_or(0);
        let winners = Seat::LOOP
            .iter()
            .filter(|seat| view.scores[seat.index()] == low)
            .map(|seat| seat_label(*seat))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Game over! Lowest score: {winners} with {low}.");
        let _ = writeln!(out, "Type 'new' for another deal or 'quit' to leave.");
        return out;
    }

    let trick = if view.trick.is_empty() {
        "(empty)".to_string()
    } else {
        view.trick
            .iter()
            .map(|play| format!("{} {}", play.seat, play.card))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "Trick {}/13: {trick}", view.tricks_completed + 1);

    let hand = view
        .hand
        .iter()
        .map(|card| {
            if view.legal.contains(card) {
                format!("[{card}]")
            } else {
                card.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Your hand: {hand}");

    if view.is_my_turn() {
        let _ = writeln!(out, "Your turn. Playable: {}", join_cards(&view.legal));
    } else if !view.awaiting_resolution {
        let _ = writeln!(out, "Waiting for {}...", seat_label(view.turn));
    }
    out
}

/// Runs scheduled work in real time, printing what happens, until the table is idle.
pub fn drive<W: Write>(table: &mut Table, out: &mut W) -> Result<()> {
    while let Some(wait) = table.until_next() {
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        for event in table.advance(wait)? {
            writeln!(out, "{}", describe(&event))?;
        }
    }
    Ok(())
}

fn show<W: Write>(table: &Table, out: &mut W, json: bool) -> Result<()> {
    let view = table.view();
    if json {
        writeln!(out, "{}", view.to_json().context("serializing table view")?)?;
    } else {
        write!(out, "{}", render(&view))?;
    }
    Ok(())
}

/// Human plays seat 0 from `input` until it ends or the player quits.
pub fn run_interactive<R: BufRead, W: Write>(
    table: &mut Table,
    input: R,
    out: &mut W,
    json: bool,
) -> Result<()> {
    writeln!(out, "{HELP}")?;
    drive(table, out)?;
    show(table, out, json)?;

    for line in input.lines() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Help) => writeln!(out, "{HELP}")?,
            Ok(Command::NewDeal) => {
                let deal_id = table.new_deal()?;
                writeln!(out, "Dealing deal #{deal_id}.")?;
            }
            Ok(Command::Play(card)) => match table.play_human(card) {
                Ok(outcome) => {
                    writeln!(out, "You play {card}")?;
                    if let PlayOutcome::TrickFull(pending) = outcome {
                        writeln!(out, "Trick complete; {} will take it.", pending.winner)?;
                    }
                }
                Err(err) => writeln!(out, "Cannot play {card}: {err}")?,
            },
            Err(err) => writeln!(out, "Could not read '{}': {err}", line.trim())?,
        }

        drive(table, out)?;
        show(table, out, json)?;
    }
    Ok(())
}

/// Plays `deals` complete deals with every seat automated.
pub fn run_autopilot<W: Write>(table: &mut Table, deals: usize, out: &mut W, json: bool) -> Result<()> {
    for index in 0..deals {
        if index > 0 {
            table.new_deal()?;
        }
        drive(table, out)?;
        show(table, out, json)?;
    }
    Ok(())
}
