//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Deck JSON with `count` cards named Q1/A1, Q2/A2, ...
pub fn deck(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| json!({ "front": format!("Q{}", i), "back": format!("A{}", i) }))
            .collect(),
    )
}

/// Two-card geography deck.
pub fn geography() -> Value {
    json!([
        { "front": "Capital of France?", "back": "Paris" },
        { "front": "Highest mountain?", "back": "Everest" }
    ])
}

/// Body for POST /api/sessions.
pub fn start_session_body(flashcards: Value, name: Option<&str>) -> Value {
    match name {
        Some(name) => json!({ "flashcards": flashcards, "name": name }),
        None => json!({ "flashcards": flashcards }),
    }
}

/// Model reply content for front/back cards.
pub fn front_back_reply(cards: &[(&str, &str)]) -> String {
    let cards: Vec<Value> = cards
        .iter()
        .map(|(front, back)| json!({ "front": front, "back": back }))
        .collect();
    Value::Array(cards).to_string()
}

/// Model reply content for question/answer cards.
pub fn question_answer_reply(cards: &[(&str, &str)]) -> String {
    let cards: Vec<Value> = cards
        .iter()
        .map(|(question, answer)| json!({ "question": question, "answer": answer }))
        .collect();
    Value::Array(cards).to_string()
}

/// Base64 data URI of a tiny PDF-looking payload.
pub fn pdf_data_uri() -> String {
    // base64 of "%PDF-1.4 test"
    "data:application/pdf;base64,JVBERi0xLjQgdGVzdA==".to_string()
}
