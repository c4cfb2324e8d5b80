use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of columns in the `Posts` sheet (A–J).
pub const COLUMN_COUNT: usize = 10;

/// Header row written to row 1 of the `Posts` sheet.
pub const HEADER: [&str; COLUMN_COUNT] = [
    "slug",
    "title",
    "excerpt",
    "content",
    "date",
    "readingTime",
    "tags",
    "authorName",
    "authorAvatar",
    "imageUrl",
];

/// Reading time used when the model or the sheet gives nothing usable.
pub const DEFAULT_READING_TIME: u32 = 8;

/// One sheet row, always exactly `COLUMN_COUNT` cells.
pub type PostRow = [String; COLUMN_COUNT];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub reading_time: u32,
    pub tags: Vec<String>,
    pub author: Author,
    pub image_url: String,
}

impl BlogPost {
    pub fn to_row(&self) -> PostRow {
        [
            self.slug.clone(),
            self.title.clone(),
            self.excerpt.clone(),
            self.content.clone(),
            self.date.clone(),
            self.reading_time.to_string(),
            join_tags(&self.tags),
            self.author.name.clone(),
            self.author.avatar.clone(),
            self.image_url.clone(),
        ]
    }

    /// Decodes a sheet row. Short rows are padded with empty cells; empty
    /// author cells fall back to `default_author`.
    pub fn from_row(row: &[String], default_author: &Author) -> Self {
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();
        let or_default = |i: usize, fallback: &str| {
            let value = cell(i);
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        };

        BlogPost {
            slug: cell(0),
            title: cell(1),
            excerpt: cell(2),
            content: cell(3),
            date: cell(4),
            reading_time: cell(5)
                .trim()
                .parse::<u32>()
                .unwrap_or(DEFAULT_READING_TIME),
            tags: split_tags(&cell(6)),
            author: Author {
                name: or_default(7, &default_author.name),
                avatar: or_default(8, &default_author.avatar),
            },
            image_url: cell(9),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

/// Commas delimit tags inside the tags cell, so they cannot appear in a tag.
pub fn clean_tag(raw: &str) -> String {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| clean_tag(t))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Sorts newest-first. Posts with unparseable dates go last, in their original order.
pub fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by_key(|p| std::cmp::Reverse(p.parsed_date()));
}
