/// A fixed feedback line plus a prompt to keep the learner thinking.
#[derive(Debug, PartialEq, Eq)]
pub struct CannedFeedback {
    pub feedback: &'static str,
    pub question: &'static str,
}

const AI: CannedFeedback = CannedFeedback {
    feedback: "Excellent understanding of AI fundamentals! Your grasp of machine learning concepts shows solid progress.",
    question: "How do you think neural networks differ from traditional algorithms?",
};

const MACHINE_LEARNING: CannedFeedback = CannedFeedback {
    feedback: "Great work on machine learning concepts! You're building a strong foundation.",
    question: "What real-world problem would you solve with machine learning?",
};

const PROGRAMMING: CannedFeedback = CannedFeedback {
    feedback: "Your programming skills are developing well! Keep practicing with hands-on projects.",
    question: "Which programming paradigm interests you most and why?",
};

const DEFAULT: CannedFeedback = CannedFeedback {
    feedback: "Good progress on your learning journey! Your engagement with the material is commendable.",
    question: "What aspect of this topic would you like to explore further?",
};

/// Case-insensitive lookup; unknown topics get the default entry.
pub fn feedback_for(topic: &str) -> &'static CannedFeedback {
    match topic.trim().to_lowercase().as_str() {
        "ai" => &AI,
        "machine learning" => &MACHINE_LEARNING,
        "programming" => &PROGRAMMING,
        _ => &DEFAULT,
    }
}
