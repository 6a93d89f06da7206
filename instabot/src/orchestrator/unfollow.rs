//! Bounded, reciprocal-first unfollow run

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::Phase;

use super::RunReport;
use crate::core::scroll::collect_until_stable;
use crate::core::RelationshipStore;
use crate::error::InstabotResult;
use crate::traits::{SocialSite, Surface};

/// Processing order for unfollows: accounts that follow back first, then
/// the rest, each group keeping `eligible` order
pub fn unfollow_order(eligible: Vec<String>, followers: &HashSet<String>) -> Vec<String> {
    let (mut reciprocal, non_reciprocal): (Vec<_>, Vec<_>) =
        eligible.into_iter().partition(|username| followers.contains(username));
    reciprocal.extend(non_reciprocal);
    reciprocal
}

/// Unfollows accounts whose follow cooldown has elapsed
pub struct UnfollowOrchestrator<'a, S: SocialSite + ?Sized> {
    site: &'a mut S,
    store: &'a mut RelationshipStore,
}

impl<'a, S: SocialSite + ?Sized> UnfollowOrchestrator<'a, S> {
    pub fn new(site: &'a mut S, store: &'a mut RelationshipStore) -> Self {
        Self { site, store }
    }

    /// Unfollow at most `max_users` accounts followed `cooldown_days` or
    /// more before `today`.
    ///
    /// Every processed account is reconciled to unfollowed in the store,
    /// whether or not the UI still showed it as followed; only UI unfollows
    /// count toward `max_users`.
    pub fn run(&mut self, max_users: usize, cooldown_days: i64, today: NaiveDate) -> InstabotResult<RunReport> {
        let eligible = self.store.list_eligible_for_unfollow(cooldown_days, today);
        if eligible.is_empty() {
            shared::phase_info!(Phase::current(), "No followed accounts past a {}-day cooldown", cooldown_days);
            return Ok(RunReport::unfollow(0, max_users));
        }

        let followers = self
            .observe_followers()
            .map_err(|e| RunReport::unfollow(0, max_users).abort(e))?;
        let order = unfollow_order(eligible, &followers);
        shared::phase_debug!(
            Phase::current(),
            "{} eligible accounts, {} observed followers",
            order.len(),
            followers.len()
        );

        let mut unfollowed = 0;
        for username in &order {
            if unfollowed >= max_users {
                break;
            }
            match self.try_unfollow(username) {
                Ok(true) => unfollowed += 1,
                Ok(false) => {}
                Err(e) => {
                    shared::phase_error!(
                        Phase::current(),
                        "Unfollow run aborted at {}/{}: {}",
                        unfollowed,
                        max_users,
                        e
                    );
                    return Err(RunReport::unfollow(unfollowed, max_users).abort(e));
                }
            }
        }

        let report = RunReport::unfollow(unfollowed, max_users);
        shared::logging::log_progress(Phase::current(), "Unfollow run finished", &report.to_string());
        Ok(report)
    }

    /// Scroll the followers panel to the end and collect usernames
    fn observe_followers(&mut self) -> InstabotResult<HashSet<String>> {
        self.site.open_followers()?;
        let seen = collect_until_stable(&mut *self.site, Surface::FollowersDialog, None, |s| s.visible_followers())?;
        Ok(seen.into_iter().collect())
    }

    /// Unfollow in the UI if still followed there, then reconcile the store
    fn try_unfollow(&mut self, username: &str) -> InstabotResult<bool> {
        let following = self.site.profile_follow_state(username)?;

        if following {
            self.site.unfollow(username)?;
            shared::phase_info!(Phase::current(), "➖ Unfollowed {}", username);
        } else {
            shared::phase_debug!(Phase::current(), "{} was already unfollowed outside the bot", username);
        }

        self.store.record_unfollow(username)?;
        Ok(following)
    }
}
