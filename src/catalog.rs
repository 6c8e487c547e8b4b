//! Canned conversation content
//!
//! Plans and exercises live in immutable lookup tables keyed by lower-cased
//! topic (and level), so adding a subject is a table edit rather than another
//! branch in the transition function. Lookups are exact after lower-casing;
//! anything unknown falls back to a generic template.

use crate::state_machine::Message;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const GREETING: &str = "👋 Hi! I'm your AI learning companion. I can help create a personalized learning experience just for you. What topic would you like to explore?";

pub const TOPIC_REPLIES: &[&str] = &[
    "Mathematics",
    "Programming",
    "Science",
    "Language Learning",
    "Other",
];

pub const LEVEL_REPLIES: &[&str] = &["Beginner", "Intermediate", "Advanced"];

pub const STYLE_REPLIES: &[&str] = &[
    "Visual (diagrams & videos)",
    "Reading & Writing",
    "Interactive Practice",
    "Discussion Based",
];

pub const PROJECT_REPLIES: &[&str] = &[
    "See Project Details",
    "Start Project",
    "Explore Prerequisites",
    "Try Something Else",
];

pub const EXERCISE_REPLIES: &[&str] = &[
    "See Solution",
    "Get Hint",
    "Try Different Exercise",
    "Learn Related Concept",
];

pub const EXPLORE_REPLIES: &[&str] = &[
    "Start Lesson",
    "Try Exercise",
    "Begin Project",
    "View Progress",
];

/// Used when no exercise is registered for a topic/level pair
pub const FALLBACK_EXERCISE: &str = "Custom exercise based on your level and topic";

/// A learning plan body plus the next actions offered with it
pub struct PlanTemplate {
    render: fn(topic: &str, level: &str) -> String,
    pub replies: &'static [&'static str],
}

impl PlanTemplate {
    pub fn render(&self, topic: &str, level: &str) -> String {
        (self.render)(topic, level)
    }
}

fn programming_plan(_topic: &str, level: &str) -> String {
    format!(
        "📚 Here's your personalized {level} programming learning path:

### Next Steps
1. **Core Concepts Review**
   - Data structures
   - Algorithms
   - Problem-solving patterns

2. **Hands-on Project**
   Let's build something real! Choose your project:"
    )
}

fn mathematics_plan(_topic: &str, level: &str) -> String {
    format!(
        "🔢 Your customized {level} mathematics pathway:

### Current Focus
1. **Concept Mastery**
   - Key theorems
   - Problem patterns
   - Real-world applications

2. **Practice Area**
Choose what you'd like to focus on:"
    )
}

fn generic_plan(topic: &str, level: &str) -> String {
    format!(
        "🎯 Your personalized {level} learning path for {topic}:

### Getting Started
1. **Foundation Building**
   - Core principles
   - Key concepts
   - Practical applications

2. **Next Steps**
Choose your learning direction:"
    )
}

static PLANS: LazyLock<HashMap<&'static str, PlanTemplate>> = LazyLock::new(|| {
    HashMap::from([
        (
            "programming",
            PlanTemplate {
                render: programming_plan,
                replies: &[
                    "Build a Web App",
                    "Create an API",
                    "Develop a Game",
                    "Data Analysis Tool",
                ],
            },
        ),
        (
            "mathematics",
            PlanTemplate {
                render: mathematics_plan,
                replies: &[
                    "Problem Solving",
                    "Theory Deep Dive",
                    "Applied Mathematics",
                    "Interactive Exercises",
                ],
            },
        ),
    ])
});

static GENERIC_PLAN: PlanTemplate = PlanTemplate {
    render: generic_plan,
    replies: &[
        "Theoretical Overview",
        "Practical Examples",
        "Interactive Exercises",
        "Real-world Projects",
    ],
};

static EXERCISES: LazyLock<HashMap<&'static str, HashMap<&'static str, &'static str>>> =
    LazyLock::new(|| {
        HashMap::from([
            (
                "programming",
                HashMap::from([
                    (
                        "beginner",
                        "Create a function that reverses a string without using built-in reverse()",
                    ),
                    (
                        "intermediate",
                        "Implement a cache decorator with timeout functionality",
                    ),
                    (
                        "advanced",
                        "Design a thread-safe queue implementation with blocking operations",
                    ),
                ]),
            ),
            (
                "mathematics",
                HashMap::from([
                    ("beginner", "Solve: 2x + 5 = 13"),
                    (
                        "intermediate",
                        "Find the derivative of f(x) = x³ + 2x² - 4x + 1",
                    ),
                    ("advanced", "Prove the uniqueness of prime factorization"),
                ]),
            ),
        ])
    });

/// The opening message of every session
pub fn greeting() -> Message {
    Message::assistant(GREETING, TOPIC_REPLIES.iter().copied())
}

/// Plan for a topic, falling back to the generic template for unknown topics
pub fn plan_for(topic: &str) -> &'static PlanTemplate {
    PLANS
        .get(topic.to_lowercase().as_str())
        .unwrap_or(&GENERIC_PLAN)
}

/// Registered exercise for a topic/level pair, if any
pub fn lookup_exercise(topic: &str, level: &str) -> Option<&'static str> {
    EXERCISES
        .get(topic.to_lowercase().as_str())?
        .get(level.to_lowercase().as_str())
        .copied()
}

/// Exercise text for a topic/level pair, never failing
pub fn exercise_for(topic: &str, level: &str) -> &'static str {
    lookup_exercise(topic, level).unwrap_or(FALLBACK_EXERCISE)
}
