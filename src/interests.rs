// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Selectable programming interests, grouped by category.

/// Interest categories in display order.
pub const INTEREST_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Languages",
        &[
            "Python", "JavaScript", "TypeScript", "Java", "C++", "C#", "Go", "Rust", "Ruby", "PHP",
            "Swift", "Kotlin",
        ],
    ),
    (
        "Web Development",
        &["React", "Vue.js", "Angular", "Node.js", "HTML/CSS", "Next.js", "Svelte"],
    ),
    (
        "Mobile",
        &["React Native", "Flutter", "iOS Development", "Android Development"],
    ),
    (
        "Backend & Data",
        &["SQL", "NoSQL", "MongoDB", "PostgreSQL", "GraphQL", "REST APIs"],
    ),
    (
        "DevOps & Cloud",
        &["Docker", "Kubernetes", "AWS", "Azure", "Google Cloud", "CI/CD"],
    ),
    (
        "AI & Data Science",
        &["Machine Learning", "Deep Learning", "Data Science", "TensorFlow", "PyTorch", "AI"],
    ),
    (
        "Software Engineering",
        &[
            "System Design",
            "Algorithms",
            "Data Structures",
            "Design Patterns",
            "Clean Code",
            "Software Architecture",
            "Microservices",
        ],
    ),
    (
        "Tools & Others",
        &["Git", "Testing", "Agile", "Security", "Performance", "Blockchain"],
    ),
];

/// All interests in display order.
pub fn all_interests() -> impl Iterator<Item = &'static str> {
    INTEREST_CATEGORIES
        .iter()
        .flat_map(|(_, items)| items.iter().copied())
}

/// Exact (case-sensitive) match against the catalogue.
pub fn is_known_interest(interest: &str) -> bool {
    all_interests().any(|i| i == interest)
}

/// Map user input to the catalogue spelling, ignoring case and surrounding
/// whitespace ("rust " → "Rust").
pub fn canonical_interest(input: &str) -> Option<&'static str> {
    let needle = input.trim();
    all_interests().find(|i| i.eq_ignore_ascii_case(needle))
}
