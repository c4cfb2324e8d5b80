//! Fixed content data the generator and batch scheduler work from.
//!
//! Carried in `AppState` so tests can substitute their own author, topic
//! pools, photo catalog or batch pacing.

use std::time::Duration;

use serde::Serialize;

use crate::models::post::Author;

/// Topic category. Drives the prompt wording and is echoed in batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Programming,
    Cybersecurity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Programming => "programming",
            Category::Cybersecurity => "cybersecurity",
        }
    }
}

/// A candidate topic drawn by the batch scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub title: String,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    /// Stamped on every generated post.
    pub author: Author,
    pub programming_topics: Vec<String>,
    pub cybersecurity_topics: Vec<String>,
    /// Pexels photo ids the stock-image selector picks from.
    pub photo_ids: Vec<u64>,
    /// Topics generated per batch run.
    pub batch_size: usize,
    /// Pause between consecutive generator calls within a batch.
    pub batch_delay: Duration,
}

impl Catalog {
    /// Union of both pools, programming first, each tagged with its category.
    pub fn all_topics(&self) -> Vec<Topic> {
        let programming = self.programming_topics.iter().map(|t| Topic {
            title: t.clone(),
            category: Category::Programming,
        });
        let cybersecurity = self.cybersecurity_topics.iter().map(|t| Topic {
            title: t.clone(),
            category: Category::Cybersecurity,
        });
        programming.chain(cybersecurity).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            author: Author {
                name: "Mishab".to_string(),
                avatar: "🧙‍♂️".to_string(),
            },
            programming_topics: to_strings(PROGRAMMING_TOPICS),
            cybersecurity_topics: to_strings(CYBERSECURITY_TOPICS),
            photo_ids: TECH_PHOTO_IDS.to_vec(),
            batch_size: 3,
            batch_delay: Duration::from_secs(2),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const PROGRAMMING_TOPICS: &[&str] = &[
    "Building Real-time Applications with Next.js",
    "Mastering TypeScript Advanced Types",
    "Introduction to Server Components in React",
    "Optimizing Database Queries for Performance",
    "Building RESTful APIs with Node.js",
    "Understanding WebSockets and Socket.io",
    "The Art of Code Refactoring",
    "Implementing Authentication in Next.js",
    "Testing Strategies for Modern Web Apps",
    "Building Responsive UIs with Tailwind CSS",
    "Understanding and Using Git Effectively",
    "Docker for Web Developers",
];

const CYBERSECURITY_TOPICS: &[&str] = &[
    "Essential Cybersecurity Practices for Developers",
    "Understanding OWASP Top 10 Vulnerabilities",
    "Secure Authentication Implementation",
    "Protecting Against XSS and CSRF Attacks",
    "Introduction to Penetration Testing",
    "Secure API Design Principles",
    "Understanding Encryption and Hashing",
    "Building Secure Authentication Systems",
    "Common Web Application Vulnerabilities",
    "Implementing HTTPS and SSL/TLS",
    "Security Best Practices for Next.js",
    "Understanding CORS and Security Headers",
];

/// Pre-vetted Pexels tech/programming photos.
const TECH_PHOTO_IDS: &[u64] = &[
    577585,  // code on screen
    1181677, // computer with code
    1181263, // developer workspace
    1181675, // programming laptop
    1181696, // tech workspace
    1181244, // code editor
    4974914, // modern programming setup
    4974920, // developer coding
    3861958, // computer screen with code
    3861972, // tech development
    3184357, // software development
    3184460, // programming environment
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = Catalog::default();
        assert_eq!(catalog.photo_ids.len(), 12);
        assert_eq!(catalog.programming_topics.len(), 12);
        assert_eq!(catalog.cybersecurity_topics.len(), 12);
        assert_eq!(catalog.batch_size, 3);
        assert_eq!(catalog.batch_delay, Duration::from_secs(2));
        assert_eq!(catalog.author.name, "Mishab");
    }

    #[test]
    fn test_all_topics_tags_categories() {
        let catalog = Catalog::default();
        let all = catalog.all_topics();
        assert_eq!(all.len(), 24);
        assert_eq!(all[0].category, Category::Programming);
        assert_eq!(all[23].category, Category::Cybersecurity);
        assert_eq!(all[12].title, "Essential Cybersecurity Practices for Developers");
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Cybersecurity).unwrap();
        assert_eq!(json, r#""cybersecurity""#);
        assert_eq!(Category::Programming.as_str(), "programming");
    }
}
