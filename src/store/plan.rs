// src/store/plan.rs

use crate::{models::quiz::QuestionType, schema::GeneratedQuestion};

pub const MAX_TITLE_LEN: usize = 200;

/// Every row of a quiz, derived from a validated question array, before insert.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizPlan {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<PlannedQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_in_quiz: i32,
    pub options: Vec<PlannedOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOption {
    pub option_text: String,
    pub is_correct: bool,
}

impl QuizPlan {
    /// Maps validated questions onto quiz, question and option rows.
    ///
    /// The title is the description cut to the column width; the description
    /// itself is kept whole. Options keep their payload order.
    pub fn from_questions(description: &str, questions: &[GeneratedQuestion]) -> Self {
        let description = description.trim();

        let questions = questions
            .iter()
            .enumerate()
            .map(|(index, q)| PlannedQuestion {
                question_text: q.question_text.clone(),
                question_type: q.question_type,
                // Validated ids always carry a suffix.
                order_in_quiz: q.order_in_quiz().unwrap_or(index as i32 + 1),
                options: q
                    .options
                    .iter()
                    .map(|opt| PlannedOption {
                        option_text: opt.text.clone(),
                        is_correct: q.is_correct(opt),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: truncate_chars(description, MAX_TITLE_LEN).to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            questions,
        }
    }

    pub fn option_count(&self) -> usize {
        self.questions.iter().map(|q| q.options.len()).sum()
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
