//! Candidate discovery across hashtag feeds
//!
//! Crawls each tag for a budgeted number of scroll pages, pools the post
//! references, shuffles them with an injected RNG and drops repeats.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use shared::Phase;

use super::scroll::collect_until_stable;
use crate::error::{InstabotError, InstabotResult};
use crate::traits::{SocialSite, Surface};

/// Posts rendered per scroll page on a tag feed
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Reference to a discovered post (its URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate(String);

impl Candidate {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Candidate {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

/// Per-tag crawl budget derived from the follow target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryPlan {
    pub users_per_tag: usize,
    pub posts_per_tag: usize,
    pub pages_per_tag: usize,
}

impl DiscoveryPlan {
    /// Budget for following `target` accounts over `tag_count` tags.
    ///
    /// With fewer targets than tags each tag is budgeted `tag_count` users,
    /// not `target / tag_count`; existing runs depend on that sizing.
    pub fn new(target: usize, tag_count: usize, page_size: usize) -> InstabotResult<Self> {
        if tag_count == 0 {
            return Err(InstabotError::NoTagsProvided);
        }
        if page_size == 0 {
            return Err(InstabotError::config("page_size must be positive"));
        }

        let users_per_tag = if target >= tag_count {
            target / tag_count
        } else {
            tag_count
        };
        let posts_per_tag = users_per_tag.saturating_mul(2);

        Ok(Self {
            users_per_tag,
            posts_per_tag,
            pages_per_tag: (posts_per_tag / page_size).saturating_add(1),
        })
    }
}

/// Deduplicated candidates awaiting evaluation, consumed front to back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    queue: VecDeque<Candidate>,
}

impl CandidatePool {
    /// Build a pool from already-shuffled candidates; later repeats collapse
    pub fn from_shuffled(candidates: Vec<Candidate>) -> Self {
        let mut seen = HashSet::with_capacity(candidates.len());
        let queue = candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.clone()))
            .collect();
        Self { queue }
    }

    /// Take the next candidate; each is handed out at most once
    pub fn pop(&mut self) -> Option<Candidate> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.queue.iter()
    }
}

/// Builds a [`CandidatePool`] from hashtag feeds
pub struct CandidateDiscoveryQueue<R: Rng> {
    rng: R,
    page_size: usize,
}

impl<R: Rng> CandidateDiscoveryQueue<R> {
    /// Create a queue shuffling with `rng`; seed it for reproducible order
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Posts expected per scroll page when budgeting the crawl
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Crawl `tags` and return a shuffled, deduplicated pool.
    ///
    /// No tags is not fatal: a warning is logged and the pool is empty.
    pub fn discover<S>(&mut self, site: &mut S, tags: &[String], target: usize) -> InstabotResult<CandidatePool>
    where
        S: SocialSite + ?Sized,
    {
        let plan = match DiscoveryPlan::new(target, tags.len(), self.page_size) {
            Ok(plan) => plan,
            Err(InstabotError::NoTagsProvided) => {
                shared::phase_warn!(Phase::current(), "⚠️  {}", InstabotError::NoTagsProvided);
                return Ok(CandidatePool::default());
            }
            Err(e) => return Err(e),
        };

        shared::phase_debug!(
            Phase::current(),
            "🔎 Crawling {} tags, {} pages each ({} posts per tag)",
            tags.len(),
            plan.pages_per_tag,
            plan.posts_per_tag
        );

        let mut posts = Vec::new();
        for tag in tags {
            site.open_tag_feed(tag)?;
            let found = collect_until_stable(site, Surface::TagFeed, Some(plan.pages_per_tag), |s| s.visible_posts())?;
            shared::phase_debug!(Phase::current(), "#{}: {} post references", tag, found.len());
            posts.extend(found);
        }

        posts.shuffle(&mut self.rng);
        let pool = CandidatePool::from_shuffled(posts);
        shared::phase_info!(Phase::current(), "🗂️  Candidate pool holds {} posts", pool.len());
        Ok(pool)
    }
}
