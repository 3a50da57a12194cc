//! Read-only blog content from a directory of markdown files
//!
//! Each `*.md` file starts with a YAML front matter block:
//!
//! ```text
//! ---
//! title: Why income protection matters
//! date: 2026-03-01
//! excerpt: Optional one-line summary
//! ---
//! Markdown body...
//! ```

use chrono::NaiveDate;
use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Longest generated excerpt, in characters
const EXCERPT_LEN: usize = 160;

#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} has no front matter")]
    MissingFrontMatter(PathBuf),
    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    title: String,
    date: NaiveDate,
    #[serde(default)]
    excerpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    /// File stem, used as the post's address
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub excerpt: String,
    pub html_body: String,
    /// Markdown body without front matter
    pub markdown: String,
}

#[derive(Debug, Clone)]
pub struct BlogReader {
    dir: PathBuf,
}

impl BlogReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All readable posts, newest first. Files without valid front matter
    /// are skipped. A missing directory is an empty blog.
    pub fn list_posts(&self) -> Result<Vec<BlogPost>, BlogError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Blog directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(BlogError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut posts = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable blog entry: {e}");
                    continue;
                }
            };
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            match read_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => warn!("Skipping blog post: {e}"),
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(posts)
    }

    /// One post by slug; `None` when absent or the slug is not a plain name
    pub fn get_post(&self, slug: &str) -> Result<Option<BlogPost>, BlogError> {
        if slug.is_empty() || slug.contains(['/', '\\']) || slug.contains("..") {
            return Ok(None);
        }
        let path = self.dir.join(format!("{slug}.md"));
        if !path.is_file() {
            return Ok(None);
        }
        read_post(&path).map(Some)
    }
}

fn read_post(path: &Path) -> Result<BlogPost, BlogError> {
    let contents = fs::read_to_string(path).map_err(|source| BlogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    parse_post(path, slug, &contents)
}

fn parse_post(path: &Path, slug: String, contents: &str) -> Result<BlogPost, BlogError> {
    let (yaml, body) = split_front_matter(contents)
        .ok_or_else(|| BlogError::MissingFrontMatter(path.to_path_buf()))?;
    let meta: FrontMatter = serde_yaml::from_str(yaml).map_err(|source| BlogError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    let markdown = body.trim_start_matches(['\r', '\n']).to_string();
    let excerpt = meta
        .excerpt
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| derive_excerpt(&markdown));

    Ok(BlogPost {
        slug,
        title: meta.title,
        date: meta.date,
        excerpt,
        html_body: render_html(&markdown),
        markdown,
    })
}

/// Split `---` delimited front matter from the body
fn split_front_matter(contents: &str) -> Option<(&str, &str)> {
    let rest = contents.trim_start_matches('\u{feff}');
    let rest = rest
        .strip_prefix("---\n")
        .or_else(|| rest.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (!yaml.trim().is_empty()).then_some((yaml, body));
        }
        offset += line.len();
    }
    None
}

fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Plain text of the first paragraph, cut to [`EXCERPT_LEN`] characters
fn derive_excerpt(markdown: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;
    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if !text.is_empty() => break,
            Event::End(TagEnd::Paragraph) => in_paragraph = false,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    let text = text.trim();
    if text.chars().count() <= EXCERPT_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_LEN).collect();
    format!("{}...", cut.trim_end())
}
