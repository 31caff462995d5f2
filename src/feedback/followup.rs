use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

pub const DEFAULT_MODULE: &str = "Introduction to AI";
const SUGGESTED_TIME: &str = "5-10 minutes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug)]
struct BankEntry {
    question: &'static str,
    kind: &'static str,
    difficulty: Difficulty,
}

const fn entry(question: &'static str, kind: &'static str, difficulty: Difficulty) -> BankEntry {
    BankEntry {
        question,
        kind,
        difficulty,
    }
}

const INTRO_TO_AI: &[BankEntry] = &[
    entry(
        "How do you think AI will impact your specific industry or field of interest?",
        "reflection",
        Difficulty::Beginner,
    ),
    entry(
        "Can you identify three AI applications you use in your daily life without realizing it?",
        "application",
        Difficulty::Beginner,
    ),
    entry(
        "What ethical considerations should we keep in mind when developing AI systems?",
        "critical-thinking",
        Difficulty::Intermediate,
    ),
    entry(
        "How would you explain the difference between narrow AI and general AI to a friend?",
        "explanation",
        Difficulty::Beginner,
    ),
    entry(
        "What are some potential risks and benefits of AI automation in the workplace?",
        "analysis",
        Difficulty::Intermediate,
    ),
];

const ML_BASICS: &[BankEntry] = &[
    entry(
        "How would you decide whether to use supervised or unsupervised learning for a new project?",
        "decision-making",
        Difficulty::Intermediate,
    ),
    entry(
        "Can you think of a real-world problem that could be solved with machine learning?",
        "application",
        Difficulty::Beginner,
    ),
    entry(
        "What steps would you take to prepare data for a machine learning model?",
        "process",
        Difficulty::Intermediate,
    ),
];

const DEEP_LEARNING: &[BankEntry] = &[
    entry(
        "How do neural networks mimic the human brain, and where do they differ?",
        "comparison",
        Difficulty::Advanced,
    ),
    entry(
        "What factors would you consider when choosing the architecture for a neural network?",
        "design",
        Difficulty::Advanced,
    ),
];

fn bank_for(module_name: &str) -> &'static [BankEntry] {
    match module_name {
        DEFAULT_MODULE => INTRO_TO_AI,
        "Machine Learning Basics" => ML_BASICS,
        "Deep Learning" => DEEP_LEARNING,
        _ => INTRO_TO_AI,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowupQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: Difficulty,
    pub suggested_time: String,
}

/// Shuffles the module's question set and keeps two or three of them.
///
/// `issued_at_ms` feeds the question ids (`q_<millis>_<index>`).
pub fn select_questions<R: Rng>(
    module_name: &str,
    rng: &mut R,
    issued_at_ms: i128,
) -> Vec<FollowupQuestion> {
    let mut picked: Vec<&BankEntry> = bank_for(module_name).iter().collect();
    picked.shuffle(rng);
    let take = rng.gen_range(2..=3).min(picked.len());

    picked
        .into_iter()
        .take(take)
        .enumerate()
        .map(|(index, e)| FollowupQuestion {
            id: format!("q_{issued_at_ms}_{index}"),
            question: e.question.to_string(),
            kind: e.kind.to_string(),
            difficulty: e.difficulty,
            suggested_time: SUGGESTED_TIME.to_string(),
        })
        .collect()
}
