use crate::models::domain::{Question, QuestionResult, QuestionType, Quiz};

/// Result of scoring a set of answers against a quiz, before it is recorded
/// as an attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct GradedQuiz {
    /// Submitted answers padded with `""` to one slot per question.
    pub answers: Vec<String>,
    pub correct_answers: Vec<String>,
    pub question_results: Vec<QuestionResult>,
    pub score: i32,
    pub total_questions: i32,
    pub earned_points: i32,
    pub total_possible_points: i32,
    pub percentage: f64,
    pub points_percentage: f64,
    pub passed: bool,
}

pub struct GradingService;

impl GradingService {
    /// Grade submitted answers against the quiz's question list.
    ///
    /// Pure: identical inputs always produce identical output. Missing answer
    /// slots are graded as `""` and are never correct.
    pub fn grade(quiz: &Quiz, submitted_answers: &[String]) -> GradedQuiz {
        let mut answers = Vec::with_capacity(quiz.questions.len());
        let mut correct_answers = Vec::with_capacity(quiz.questions.len());
        let mut question_results = Vec::with_capacity(quiz.questions.len());

        for (index, question) in quiz.questions.iter().enumerate() {
            let user_answer = submitted_answers.get(index).cloned().unwrap_or_default();

            let (is_correct, correct_answer) = Self::grade_question(question, &user_answer);
            let points_earned = if is_correct { question.points } else { 0 };

            question_results.push(QuestionResult {
                question_number: index as i32 + 1,
                question_text: question.question.clone(),
                user_answer: user_answer.clone(),
                correct_answer: correct_answer.clone(),
                is_correct,
                points_earned,
                points_possible: question.points,
                explanation: question.explanation.clone(),
            });
            answers.push(user_answer);
            correct_answers.push(correct_answer);
        }

        let total_questions = quiz.questions.len() as i32;
        let score = question_results.iter().filter(|r| r.is_correct).count() as i32;
        let earned_points: i32 = question_results.iter().map(|r| r.points_earned).sum();
        let total_possible_points: i32 = quiz.questions.iter().map(|q| q.points).sum();

        let percentage = ratio_percentage(score, total_questions);
        let points_percentage = ratio_percentage(earned_points, total_possible_points);

        GradedQuiz {
            answers,
            correct_answers,
            question_results,
            score,
            total_questions,
            earned_points,
            total_possible_points,
            percentage,
            points_percentage,
            passed: percentage >= quiz.min_pass_percentage,
        }
    }

    /// Returns whether the answer is correct and the canonical correct answer
    /// to report back.
    fn grade_question(question: &Question, user_answer: &str) -> (bool, String) {
        match question.question_type {
            QuestionType::MultipleChoice => {
                let mut correct_options = question
                    .options
                    .iter()
                    .filter(|opt| opt.is_correct)
                    .map(|opt| opt.text.as_str());

                let reported = correct_options.clone().next().unwrap_or_default().to_string();
                let is_correct = correct_options.any(|text| text == user_answer);
                (is_correct, reported)
            }
            QuestionType::OpenEnded => {
                let normalize = |value: &str| {
                    let trimmed = value.trim();
                    if question.case_sensitive {
                        trimmed.to_string()
                    } else {
                        trimmed.to_lowercase()
                    }
                };

                let answer = normalize(user_answer);
                let matches = |patterns: &[String]| {
                    patterns
                        .iter()
                        .map(|p| normalize(p.as_str()))
                        .any(|p| !p.is_empty() && answer.contains(&p))
                };

                let is_correct = matches(&question.expected_answers) || matches(&question.keywords);
                (is_correct, Self::open_ended_reference(question))
            }
        }
    }

    fn open_ended_reference(question: &Question) -> String {
        question
            .expected_answers
            .first()
            .cloned()
            .unwrap_or_else(|| question.keywords.join(", "))
    }
}

/// `part / whole * 100` rounded to two decimals; zero when `whole` is zero.
fn ratio_percentage(part: i32, whole: i32) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_two_decimals(f64::from(part) / f64::from(whole) * 100.0)
}

pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
