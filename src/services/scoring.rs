use std::collections::HashMap;

use crate::db::types::{ModuleDifficulty, ModuleType, QuestionType};

/// One assigned question joined with its answer key.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct QuestionRecord {
    pub(crate) exam_question_id: String,
    pub(crate) section_id: String,
    pub(crate) module_type: ModuleType,
    pub(crate) difficulty: Option<ModuleDifficulty>,
    pub(crate) question_type: QuestionType,
    pub(crate) correct_option_id: Option<String>,
    pub(crate) correct_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScoreBreakdown {
    pub(crate) total_questions: i64,
    pub(crate) answered_questions: i64,
    pub(crate) scored_questions: i64,
    pub(crate) correct_answers: i64,
    /// Percentage of scorable questions answered correctly; None when nothing
    /// is auto-scorable and the attempt needs manual grading.
    pub(crate) score: Option<f64>,
}

impl ScoreBreakdown {
    pub(crate) fn manually_graded(&self) -> bool {
        self.scored_questions == 0
    }
}

/// Scores an attempt. `answers` is keyed by exam-question id; unanswered
/// scorable questions stay in the denominator and count as incorrect.
///
/// An adaptive EASY/HARD pair is attributed to the variant the student's
/// answers live in; with no answers in either variant the pair contributes its
/// averaged question counts, matching the structure resolver.
pub(crate) fn score_assignment(
    records: &[QuestionRecord],
    answers: &HashMap<String, String>,
) -> ScoreBreakdown {
    let mut taken: Vec<&QuestionRecord> = Vec::new();
    let mut adaptive: HashMap<&str, HashMap<ModuleDifficulty, Vec<&QuestionRecord>>> =
        HashMap::new();

    for record in records {
        match (record.module_type, record.difficulty) {
            (ModuleType::Adaptive, Some(difficulty)) => {
                adaptive
                    .entry(record.section_id.as_str())
                    .or_default()
                    .entry(difficulty)
                    .or_default()
                    .push(record);
            }
            // Routing and plain modules (and adaptive rows missing a
            // difficulty) are always part of the attempt.
            _ => taken.push(record),
        }
    }

    let mut total_questions = 0i64;
    let mut answered_questions = 0i64;
    let mut scored_questions = 0i64;
    let mut correct_answers = 0i64;

    for variants in adaptive.values() {
        let answered_in = |difficulty: ModuleDifficulty| {
            variants
                .get(&difficulty)
                .map(|records| {
                    records
                        .iter()
                        .filter(|record| submitted_answer(answers, record).is_some())
                        .count()
                })
                .unwrap_or(0)
        };

        let easy_answered = answered_in(ModuleDifficulty::Easy);
        let hard_answered = answered_in(ModuleDifficulty::Hard);

        if easy_answered == 0 && hard_answered == 0 {
            // Variant never entered: contribute averaged counts, no answers.
            total_questions +=
                rounded_average(variants.values().map(|records| records.len() as i64));
            scored_questions += rounded_average(
                variants
                    .values()
                    .map(|records| records.iter().filter(|r| is_scorable(r)).count() as i64),
            );
            continue;
        }

        let chosen = if hard_answered > easy_answered {
            ModuleDifficulty::Hard
        } else {
            ModuleDifficulty::Easy
        };
        if let Some(records) = variants.get(&chosen) {
            taken.extend(records.iter().copied());
        }
    }

    for record in &taken {
        total_questions += 1;
        let submitted = submitted_answer(answers, record);
        if submitted.is_some() {
            answered_questions += 1;
        }
        if is_scorable(record) {
            scored_questions += 1;
            if submitted.map(|answer| is_correct(record, answer)).unwrap_or(false) {
                correct_answers += 1;
            }
        }
    }

    let score = if scored_questions == 0 {
        None
    } else {
        Some(correct_answers as f64 / scored_questions as f64 * 100.0)
    };

    ScoreBreakdown {
        total_questions,
        answered_questions,
        scored_questions,
        correct_answers,
        score,
    }
}

fn submitted_answer<'a>(
    answers: &'a HashMap<String, String>,
    record: &QuestionRecord,
) -> Option<&'a str> {
    answers
        .get(&record.exam_question_id)
        .map(String::as_str)
        .filter(|answer| !answer.trim().is_empty())
}

/// Whether the bank item carries a determinable correct answer. Essays and
/// unkeyed items are manually graded.
fn is_scorable(record: &QuestionRecord) -> bool {
    match record.question_type {
        QuestionType::MultipleChoice => record.correct_option_id.is_some(),
        QuestionType::ShortAnswer => record.correct_answer.is_some(),
        QuestionType::Essay => false,
    }
}

fn is_correct(record: &QuestionRecord, submitted: &str) -> bool {
    match record.question_type {
        // Case-sensitive option-identifier match.
        QuestionType::MultipleChoice => record.correct_option_id.as_deref() == Some(submitted),
        QuestionType::ShortAnswer => {
            record.correct_answer.as_deref().map(str::trim) == Some(submitted.trim())
        }
        QuestionType::Essay => false,
    }
}

fn rounded_average(values: impl Iterator<Item = i64>) -> i64 {
    let values: Vec<i64> = values.collect();
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().sum();
    (sum as f64 / values.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str, correct: &str) -> QuestionRecord {
        QuestionRecord {
            exam_question_id: id.to_string(),
            section_id: "s1".to_string(),
            module_type: ModuleType::Plain,
            difficulty: None,
            question_type: QuestionType::MultipleChoice,
            correct_option_id: Some(correct.to_string()),
            correct_answer: None,
        }
    }

    fn short_answer(id: &str, correct: &str) -> QuestionRecord {
        QuestionRecord {
            exam_question_id: id.to_string(),
            section_id: "s1".to_string(),
            module_type: ModuleType::Plain,
            difficulty: None,
            question_type: QuestionType::ShortAnswer,
            correct_option_id: None,
            correct_answer: Some(correct.to_string()),
        }
    }

    fn essay(id: &str) -> QuestionRecord {
        QuestionRecord {
            exam_question_id: id.to_string(),
            section_id: "s1".to_string(),
            module_type: ModuleType::Plain,
            difficulty: None,
            question_type: QuestionType::Essay,
            correct_option_id: None,
            correct_answer: None,
        }
    }

    fn adaptive_choice(id: &str, difficulty: ModuleDifficulty, correct: &str) -> QuestionRecord {
        QuestionRecord {
            exam_question_id: id.to_string(),
            section_id: "s1".to_string(),
            module_type: ModuleType::Adaptive,
            difficulty: Some(difficulty),
            question_type: QuestionType::MultipleChoice,
            correct_option_id: Some(correct.to_string()),
            correct_answer: None,
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn unanswered_questions_stay_in_the_denominator() {
        let records: Vec<QuestionRecord> =
            (1..=10).map(|i| choice(&format!("q{i}"), "b")).collect();
        let answers = answers(&[
            ("q1", "b"),
            ("q2", "b"),
            ("q3", "b"),
            ("q4", "b"),
            ("q5", "b"),
            ("q6", "x"),
        ]);

        let breakdown = score_assignment(&records, &answers);

        assert_eq!(breakdown.total_questions, 10);
        assert_eq!(breakdown.answered_questions, 6);
        assert_eq!(breakdown.scored_questions, 10);
        assert_eq!(breakdown.correct_answers, 5);
        assert_eq!(breakdown.score, Some(50.0));
        assert!(!breakdown.manually_graded());
    }

    #[test]
    fn essay_only_attempt_has_no_score() {
        let records = vec![essay("q1"), essay("q2")];
        let answers = answers(&[("q1", "my essay text")]);

        let breakdown = score_assignment(&records, &answers);

        assert_eq!(breakdown.total_questions, 2);
        assert_eq!(breakdown.answered_questions, 1);
        assert_eq!(breakdown.scored_questions, 0);
        assert_eq!(breakdown.correct_answers, 0);
        assert_eq!(breakdown.score, None);
        assert!(breakdown.manually_graded());
    }

    #[test]
    fn unkeyed_choice_questions_are_excluded_from_scoring() {
        let mut unkeyed = choice("q1", "b");
        unkeyed.correct_option_id = None;
        let records = vec![unkeyed, choice("q2", "b")];
        let answers = answers(&[("q1", "b"), ("q2", "b")]);

        let breakdown = score_assignment(&records, &answers);

        assert_eq!(breakdown.scored_questions, 1);
        assert_eq!(breakdown.correct_answers, 1);
        assert_eq!(breakdown.score, Some(100.0));
    }

    #[test]
    fn option_match_is_case_sensitive() {
        let records = vec![choice("q1", "b")];
        let breakdown = score_assignment(&records, &answers(&[("q1", "B")]));

        assert_eq!(breakdown.correct_answers, 0);
        assert_eq!(breakdown.score, Some(0.0));
    }

    #[test]
    fn short_answers_match_after_trimming() {
        let records = vec![short_answer("q1", "42")];
        let breakdown = score_assignment(&records, &answers(&[("q1", "  42 ")]));

        assert_eq!(breakdown.correct_answers, 1);
        assert_eq!(breakdown.score, Some(100.0));
    }

    #[test]
    fn blank_answers_count_as_unanswered() {
        let records = vec![choice("q1", "b"), choice("q2", "b")];
        let breakdown = score_assignment(&records, &answers(&[("q1", "   "), ("q2", "b")]));

        assert_eq!(breakdown.answered_questions, 1);
        assert_eq!(breakdown.correct_answers, 1);
    }

    #[test]
    fn adaptive_pair_scores_the_variant_the_student_answered() {
        let records = vec![
            adaptive_choice("e1", ModuleDifficulty::Easy, "a"),
            adaptive_choice("e2", ModuleDifficulty::Easy, "a"),
            adaptive_choice("h1", ModuleDifficulty::Hard, "a"),
            adaptive_choice("h2", ModuleDifficulty::Hard, "a"),
            adaptive_choice("h3", ModuleDifficulty::Hard, "a"),
        ];
        let breakdown = score_assignment(&records, &answers(&[("h1", "a"), ("h2", "x")]));

        // Only the hard variant counts: 3 questions, 2 answered, 1 correct.
        assert_eq!(breakdown.total_questions, 3);
        assert_eq!(breakdown.answered_questions, 2);
        assert_eq!(breakdown.scored_questions, 3);
        assert_eq!(breakdown.correct_answers, 1);
    }

    #[test]
    fn untouched_adaptive_pair_contributes_averaged_counts() {
        let records = vec![
            choice("r1", "b"),
            adaptive_choice("e1", ModuleDifficulty::Easy, "a"),
            adaptive_choice("e2", ModuleDifficulty::Easy, "a"),
            adaptive_choice("h1", ModuleDifficulty::Hard, "a"),
            adaptive_choice("h2", ModuleDifficulty::Hard, "a"),
            adaptive_choice("h3", ModuleDifficulty::Hard, "a"),
            adaptive_choice("h4", ModuleDifficulty::Hard, "a"),
        ];
        let breakdown = score_assignment(&records, &answers(&[("r1", "b")]));

        // 1 plain + round((2 + 4) / 2) adaptive.
        assert_eq!(breakdown.total_questions, 4);
        assert_eq!(breakdown.scored_questions, 4);
        assert_eq!(breakdown.answered_questions, 1);
        assert_eq!(breakdown.correct_answers, 1);
        assert_eq!(breakdown.score, Some(25.0));
    }

    #[test]
    fn score_stays_within_bounds() {
        let records: Vec<QuestionRecord> =
            (1..=4).map(|i| choice(&format!("q{i}"), "b")).collect();

        let none = score_assignment(&records, &HashMap::new());
        assert_eq!(none.score, Some(0.0));

        let all = score_assignment(
            &records,
            &answers(&[("q1", "b"), ("q2", "b"), ("q3", "b"), ("q4", "b")]),
        );
        assert_eq!(all.score, Some(100.0));
    }

    #[test]
    fn empty_structure_needs_manual_grading() {
        let breakdown = score_assignment(&[], &HashMap::new());

        assert_eq!(breakdown.total_questions, 0);
        assert_eq!(breakdown.score, None);
        assert!(breakdown.manually_graded());
    }
}
