//! Header widgets: greeting, clock label, quote of the day and feedback for
//! the quick-create form.

use chrono::{NaiveTime, Timelike};
use rand::seq::IndexedRandom;

use crate::service::{Severity, Toast};
use crate::types::Todo;

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning! 🌅",
        12..=16 => "Good Afternoon! ☀️",
        _ => "Good Evening! 🌇",
    }
}

/// `h:mm AM/PM`, with midnight and noon shown as 12.
pub fn clock_label(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    let suffix = if pm { "PM" } else { "AM" };
    format!("{hour}:{:02} {suffix}", time.minute())
}

const QUOTES: [&str; 15] = [
    "Make each day your masterpiece.",
    "Your future is created by what you do today, not tomorrow.",
    "Don't watch the clock; do what it does. Keep going.",
    "Believe you can and you're halfway there.",
    "The only way to do great work is to love what you do.",
    "Success is not final, failure is not fatal: It is the courage to continue that counts.",
    "The only limit to our realization of tomorrow will be our doubts of today.",
    "The best way to predict the future is to create it.",
    "Do not wait to strike till the iron is hot, but make it hot by striking.",
    "I find that the harder I work, the more luck I seem to have.",
    "It is during our darkest moments that we must focus to see the light.",
    "The only place where success comes before work is in the dictionary.",
    "Your time is limited, don't waste it living someone else's life.",
    "The road to success and the road to failure are almost exactly the same.",
    "Don't be pushed around by the fears in your mind. Be led by the dreams in your heart.",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteGenerator;

impl QuoteGenerator {
    pub fn quotes(&self) -> &'static [&'static str] {
        &QUOTES
    }

    pub fn random_quote(&self) -> &'static str {
        self.random_quote_with(&mut rand::rng())
    }

    pub fn random_quote_with<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
    }
}

/// Feedback after the quick-create form saved a record.
pub fn created_toast(todo: &Todo) -> Toast {
    Toast::new(
        "To-Do Task created",
        format!("{} To-Do Task created.", todo.title),
        Severity::Success,
    )
    .sticky()
}

/// Feedback after the quick-create form was rejected.
pub fn creation_failed_toast<S: AsRef<str>>(messages: &[S]) -> Toast {
    let joined = messages.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    tracing::error!(messages = %joined, "todo creation failed");
    Toast::new("Error Creating To-Do Task", joined, Severity::Error).sticky()
}
