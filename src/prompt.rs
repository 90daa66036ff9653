// src/prompt.rs

/// Example element shown to the model. Kept in sync with `schema::GeneratedQuestion`.
const QUESTION_FORMAT: &str = r#"[
    {
        "id": "q_topic_001",
        "topic": "Topic Name",
        "difficulty": "Easy/Medium/Hard",
        "type": "MCQ",
        "question_text": "Question text here?",
        "options": [
            {"option_id": "a", "text": "First option"},
            {"option_id": "b", "text": "Second option"},
            {"option_id": "c", "text": "Third option"},
            {"option_id": "d", "text": "Fourth option"}
        ],
        "correct_answer_id": "a",
        "explanation": "Explanation of the correct answer"
    }
]"#;

/// Renders the instruction sent to the model for a topic description.
pub fn build_quiz_prompt(description: &str) -> String {
    format!(
        "Create a quiz based on this description: {description}\n\
         Generate the response as a JSON array of question objects with this structure:\n\
         {QUESTION_FORMAT}\n\
         Number the question ids consecutively starting at 001 (q_topic_001, q_topic_002, ...).\n\
         Ensure the response is valid JSON and matches this format exactly."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_description_and_format() {
        let prompt = build_quiz_prompt("Python programming");
        assert!(prompt.contains("Python programming"));
        assert!(prompt.contains("Generate the response as a JSON array"));
        assert!(prompt.contains("\"correct_answer_id\": \"a\""));
        assert!(prompt.ends_with("matches this format exactly."));
    }

    #[test]
    fn format_example_is_valid_json() {
        let parsed: serde_json::Value = serde_json::from_str(QUESTION_FORMAT).unwrap();
        assert_eq!(parsed[0]["options"].as_array().map(Vec::len), Some(4));
    }
}
