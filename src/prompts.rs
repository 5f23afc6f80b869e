//! Artistic-work categories and their analysis prompt templates.
//!
//! Each category maps to a fixed template with `{title}` and `{author}`
//! placeholders. Only the first occurrence of each placeholder is
//! substituted, so a title that itself contains a literal `{author}`
//! token is left alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetaError;

/// The fixed artistic-work domains. Category selection picks the prompt
/// template; any other string is rejected before the cache or provider is
/// touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Film,
    Music,
    Literature,
    VisualArt,
}

impl Category {
    /// All known categories, in display order.
    pub const ALL: [Category; 4] = [
        Category::Film,
        Category::Music,
        Category::Literature,
        Category::VisualArt,
    ];

    /// The canonical string form (`"visual_art"` etc.), matching the
    /// persisted payloads and the analytics category keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Film => "film",
            Category::Music => "music",
            Category::Literature => "literature",
            Category::VisualArt => "visual_art",
        }
    }

    /// The prompt template for this category.
    pub fn template(&self) -> &'static str {
        match self {
            Category::Film => {
                "Analyze the film or TV series '{title}' by {author}. Include a brief \
                 synopsis, discuss its themes, cinematography, and cultural impact. \
                 Evaluate its strengths and weaknesses, and explain its significance in \
                 the context of its genre and time period."
            }
            Category::Music => {
                "Analyze the musical work '{title}' by {author}. Discuss its genre, \
                 musical style, lyrical themes (if applicable), and production. Evaluate \
                 its cultural impact, critical reception, and place in the artist's \
                 discography. Consider its influence on other artists or the genre as a \
                 whole."
            }
            Category::Literature => {
                "Analyze the novel or short story collection '{title}' by {author}. \
                 Provide a brief plot summary, discuss major themes, character \
                 development, and writing style. Evaluate its literary merits, cultural \
                 significance, and impact on literature. Consider how it fits into the \
                 author's body of work and its genre."
            }
            Category::VisualArt => {
                "Analyze the visual artwork '{title}' by {author}. Describe its medium, \
                 style, and composition. Discuss the artist's techniques, the artwork's \
                 themes or subject matter, and its historical or cultural context. \
                 Evaluate its significance in the artist's career and its impact on the \
                 art world."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MetaError;

    /// Exact-string parse: no case folding or whitespace trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "film" => Ok(Category::Film),
            "music" => Ok(Category::Music),
            "literature" => Ok(Category::Literature),
            "visual_art" => Ok(Category::VisualArt),
            other => Err(MetaError::InvalidCategory(other.to_string())),
        }
    }
}

/// Render the category's prompt with `title` and `author` substituted.
///
/// Sequential first-occurrence replacement: `{title}` first, then
/// `{author}`. Substitution is not recursive: placeholder tokens inside
/// the substituted values are never expanded with further input.
pub fn render(category: Category, title: &str, author: &str) -> String {
    category
        .template()
        .replacen("{title}", title, 1)
        .replacen("{author}", author, 1)
}
