//! Bounded, cooldown-respecting follow run

use rand::seq::SliceRandom;
use rand::Rng;
use shared::Phase;

use super::RunReport;
use crate::core::{Candidate, CandidatePool, RelationshipStore};
use crate::error::InstabotResult;
use crate::traits::SocialSite;

/// Chance of leaving a comment on a liked post, and the phrases to use
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPolicy {
    probability: f64,
    phrases: Vec<String>,
}

impl CommentPolicy {
    /// `probability` is clamped into `[0, 1]`
    pub fn new(probability: f64, phrases: Vec<String>) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { probability, phrases }
    }

    /// Never comment
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Draw a phrase, or `None` when this post gets no comment
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.phrases.is_empty() || self.probability <= 0.0 {
            return None;
        }
        if !rng.gen_bool(self.probability) {
            return None;
        }
        self.phrases.choose(rng).map(String::as_str)
    }
}

/// Follows new accounts taken from a [`CandidatePool`]
pub struct FollowOrchestrator<'a, S: SocialSite + ?Sized, R: Rng> {
    site: &'a mut S,
    store: &'a mut RelationshipStore,
    rng: R,
    comments: CommentPolicy,
}

impl<'a, S: SocialSite + ?Sized, R: Rng> FollowOrchestrator<'a, S, R> {
    pub fn new(site: &'a mut S, store: &'a mut RelationshipStore, rng: R) -> Self {
        Self {
            site,
            store,
            rng,
            comments: CommentPolicy::disabled(),
        }
    }

    pub fn with_comments(mut self, comments: CommentPolicy) -> Self {
        self.comments = comments;
        self
    }

    /// Follow up to `target` new accounts.
    ///
    /// Candidates are popped one at a time until the target is met or the
    /// pool runs dry. A failing UI or store call aborts the run; the error
    /// carries the count reached so far.
    pub fn run(&mut self, target: usize, cooldown_days: i64, pool: &mut CandidatePool) -> InstabotResult<RunReport> {
        let mut achieved = 0;

        while achieved < target {
            let Some(candidate) = pool.pop() else {
                shared::phase_debug!(Phase::current(), "Candidate pool exhausted");
                break;
            };

            match self.try_follow(&candidate, cooldown_days) {
                Ok(true) => achieved += 1,
                Ok(false) => {}
                Err(e) => {
                    shared::phase_error!(Phase::current(), "Follow run aborted at {}/{}: {}", achieved, target, e);
                    return Err(RunReport::follow(achieved, target).abort(e));
                }
            }
        }

        let report = RunReport::follow(achieved, target);
        shared::logging::log_progress(Phase::current(), "Follow run finished", &report.to_string());
        Ok(report)
    }

    /// Evaluate one candidate; `true` when its author was followed
    fn try_follow(&mut self, candidate: &Candidate, cooldown_days: i64) -> InstabotResult<bool> {
        let post = self.site.inspect_post(candidate)?;

        if post.already_following {
            shared::phase_debug!(Phase::current(), "Already following {}, skipping", post.author);
            return Ok(false);
        }

        if !self.store.record_follow(&post.author, cooldown_days)? {
            shared::phase_debug!(Phase::current(), "⏳ {} is within cooldown, skipping", post.author);
            return Ok(false);
        }

        self.site.like_post()?;
        if let Some(text) = self.comments.pick(&mut self.rng) {
            self.site.comment_post(text)?;
        }
        self.site.follow_author()?;

        shared::phase_info!(Phase::current(), "➕ Followed {}", post.author);
        Ok(true)
    }
}
