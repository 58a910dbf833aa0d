//! Keyword x topic expansion.

use std::iter::FusedIterator;

use crate::core::{GenerationJob, Keyword, Topic};

/// Expands keyword and topic lists into generation jobs.
///
/// Jobs are enumerated in row-major order: every topic for the first keyword,
/// then every topic for the second, and so on. Duplicates in either list
/// produce duplicate jobs. Iteration is lazy and can be restarted by calling
/// [`CombinationGenerator::jobs`] again.
#[derive(Debug, Clone, Copy)]
pub struct CombinationGenerator<'a> {
    keywords: &'a [Keyword],
    topics: &'a [Topic],
}

impl<'a> CombinationGenerator<'a> {
    /// Creates a generator over the given lists.
    #[must_use]
    pub const fn new(keywords: &'a [Keyword], topics: &'a [Topic]) -> Self {
        Self { keywords, topics }
    }

    /// Number of jobs the generator yields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.keywords.len() * self.topics.len()
    }

    /// Returns true if no jobs would be yielded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a fresh iterator over the jobs.
    #[must_use]
    pub const fn jobs(&self) -> Jobs<'a> {
        Jobs {
            keywords: self.keywords,
            topics: self.topics,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for CombinationGenerator<'a> {
    type Item = GenerationJob;
    type IntoIter = Jobs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs()
    }
}

/// Iterator returned by [`CombinationGenerator::jobs`].
#[derive(Debug, Clone)]
pub struct Jobs<'a> {
    keywords: &'a [Keyword],
    topics: &'a [Topic],
    next: usize,
}

impl Iterator for Jobs<'_> {
    type Item = GenerationJob;

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.topics.len();
        if width == 0 || self.next >= self.keywords.len() * width {
            return None;
        }
        let job = GenerationJob::new(
            self.keywords[self.next / width].clone(),
            self.topics[self.next % width].clone(),
        );
        self.next += 1;
        Some(job)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.keywords.len() * self.topics.len()).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Jobs<'_> {}

impl FusedIterator for Jobs<'_> {}
