//! News articles and the capacity-checked collection that holds them

use crate::{MessageError, Result};
use serde::Serialize;

/// Maximum number of articles in one news reply or push
pub const MAX_ARTICLES: usize = 10;

/// One news article. Absent values render as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Headline
    pub title: String,
    /// Summary text
    pub description: String,
    /// Cover picture URL
    #[serde(rename = "picurl")]
    pub pic_url: String,
    /// Target URL
    pub url: String,
}

impl Article {
    /// Create an article with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the summary text
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the cover picture URL
    #[must_use]
    pub fn with_pic_url(mut self, pic_url: impl Into<String>) -> Self {
        self.pic_url = pic_url.into();
        self
    }

    /// Set the target URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// Ordered articles, at most [`MAX_ARTICLES`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleCollection {
    articles: Vec<Article>,
}

impl ArticleCollection {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an article
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] once the collection already holds
    /// [`MAX_ARTICLES`] entries; the collection is left unchanged.
    pub fn push(&mut self, article: Article) -> Result<()> {
        if self.articles.len() >= MAX_ARTICLES {
            return Err(MessageError::construction(format!(
                "cannot add more than {MAX_ARTICLES} articles"
            )));
        }
        self.articles.push(article);
        Ok(())
    }

    /// Number of articles
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[Article] {
        &self.articles
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }
}

impl TryFrom<Vec<Article>> for ArticleCollection {
    type Error = MessageError;

    fn try_from(articles: Vec<Article>) -> Result<Self> {
        let mut collection = Self::new();
        for article in articles {
            collection.push(article)?;
        }
        Ok(collection)
    }
}

impl<'a> IntoIterator for &'a ArticleCollection {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}
