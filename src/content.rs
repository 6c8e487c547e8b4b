//! Static landing page copy

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hero {
    pub headline: &'static str,
    /// Suffixes cycled after the headline
    pub rotating: &'static [&'static str],
    pub rotate_every_ms: u64,
    pub blurb: &'static str,
    pub primary_action: &'static str,
    pub secondary_action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FooterColumn {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Landing {
    pub brand: &'static str,
    pub nav_action: &'static str,
    pub hero: Hero,
    pub features_title: &'static str,
    pub features: &'static [Feature],
    pub chat_title: &'static str,
    pub chat_widget_title: &'static str,
    pub footer: &'static [FooterColumn],
    pub copyright: &'static str,
}

const FEATURES: &[Feature] = &[
    Feature {
        icon: "brain",
        title: "AI-Powered Learning",
        description: "Adaptive learning paths that evolve with your progress and understanding",
    },
    Feature {
        icon: "target",
        title: "Personalized Goals",
        description: "Set and track custom learning objectives tailored to your needs",
    },
    Feature {
        icon: "users",
        title: "Peer Learning",
        description: "Connect with learners sharing similar interests and goals",
    },
    Feature {
        icon: "sparkles",
        title: "Interactive Content",
        description: "Engage with dynamic, multimedia learning materials",
    },
    Feature {
        icon: "book-open",
        title: "Diverse Resources",
        description: "Access a wide range of learning styles and materials",
    },
    Feature {
        icon: "trophy",
        title: "Progress Tracking",
        description: "Monitor your achievements and learning journey",
    },
];

const FOOTER: &[FooterColumn] = &[
    FooterColumn {
        title: "About LearnSync",
        body: "Bridging the gap between teaching at scale and individual needs through AI.",
    },
    FooterColumn {
        title: "Quick Links",
        body: "Features · Pricing · Contact",
    },
    FooterColumn {
        title: "Connect",
        body: "Join our community of learners and educators.",
    },
];

pub const LANDING: Landing = Landing {
    brand: "LearnSync",
    nav_action: "Get Started",
    hero: Hero {
        headline: "Learning Evolved with",
        rotating: &["AI", "Personalization", "Intelligence"],
        rotate_every_ms: 2000,
        blurb: "Experience education that adapts to your unique learning style, powered by advanced AI that understands and grows with you.",
        primary_action: "Start Learning",
        secondary_action: "Join Community",
    },
    features_title: "Revolutionizing Education",
    features: FEATURES,
    chat_title: "Experience AI-Powered Learning",
    chat_widget_title: "AI Learning Assistant",
    footer: FOOTER,
    copyright: "© 2024 LearnSync. All rights reserved.",
};
