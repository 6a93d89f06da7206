//! Test helpers and builder patterns for instabot tests
//!
//! Stores are backed by a real JSON file in a temporary directory and a
//! fixed clock; the site is always a mockall mock.

use std::collections::HashMap;

use chrono::NaiveDate;
use instabot::core::cooldown::format_date;
use instabot::core::store::{AccountRecord, StoreDocument};
use instabot::services::{FixedClock, JsonStateFile};
use instabot::traits::{MockSocialSite, PostInfo, StateStorage};
use instabot::{Candidate, CandidatePool, RelationshipStore};
use tempfile::TempDir;

use super::fixtures::TestFixtures;

/// Builder for a relationship store with pre-existing records
pub struct StoreBuilder {
    records: Vec<AccountRecord>,
    today: NaiveDate,
}

impl StoreBuilder {
    /// Empty store whose clock reads `TestFixtures::today()`
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            today: TestFixtures::today(),
        }
    }

    /// Add an account followed `days_ago` days before today
    pub fn followed(mut self, username: &str, days_ago: i64) -> Self {
        self.records.push(AccountRecord {
            username: username.to_string(),
            date_followed: Some(format_date(TestFixtures::days_ago(days_ago))),
            date_unfollowed: None,
        });
        self
    }

    /// Add an account unfollowed `days_ago` days before today
    pub fn unfollowed(mut self, username: &str, days_ago: i64) -> Self {
        self.records.push(AccountRecord {
            username: username.to_string(),
            date_followed: None,
            date_unfollowed: Some(format_date(TestFixtures::days_ago(days_ago))),
        });
        self
    }

    /// Build the store, writing the records to a fresh state file first
    pub fn build(self) -> TestStore {
        let dir = TempDir::new().unwrap();
        let file = JsonStateFile::new(dir.path().join(".instabot_db"));
        if !self.records.is_empty() {
            file.save(&StoreDocument {
                users: self.records,
                ..StoreDocument::default()
            })
            .unwrap();
        }

        let store = RelationshipStore::open(Box::new(file.clone()), Box::new(FixedClock::new(self.today))).unwrap();
        TestStore {
            _dir: dir,
            file,
            today: self.today,
            store,
        }
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A store together with the temporary directory holding its file
pub struct TestStore {
    _dir: TempDir,
    pub file: JsonStateFile,
    pub today: NaiveDate,
    pub store: RelationshipStore,
}

impl TestStore {
    /// Open a second store on the same file, as a later run would
    pub fn reopen(&self) -> RelationshipStore {
        RelationshipStore::open(Box::new(self.file.clone()), Box::new(FixedClock::new(self.today))).unwrap()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Pool holding `ids` as post URLs, in the given order
    pub fn pool(ids: &[&str]) -> CandidatePool {
        CandidatePool::from_shuffled(ids.iter().map(|id| Candidate::new(TestFixtures::post(id))).collect())
    }

    /// Make `inspect_post` answer from `(post id, author, already following)`
    /// triples; inspecting any other post fails the test
    pub fn expect_posts(site: &mut MockSocialSite, posts: &[(&str, &str, bool)]) {
        let pages: HashMap<String, PostInfo> = posts
            .iter()
            .map(|(id, author, already_following)| {
                (
                    TestFixtures::post(id),
                    PostInfo {
                        author: author.to_string(),
                        already_following: *already_following,
                    },
                )
            })
            .collect();

        site.expect_inspect_post()
            .returning(move |candidate| Ok(pages[candidate.as_str()].clone()));
    }

    /// Expect one pass over a followers panel that shows `followers` and
    /// does not grow when scrolled
    pub fn expect_followers(site: &mut MockSocialSite, followers: &[&str]) {
        let followers: Vec<String> = followers.iter().map(|f| f.to_string()).collect();

        site.expect_open_followers().times(1).returning(|| Ok(()));
        site.expect_content_height().times(2).returning(|_| Ok(900));
        site.expect_scroll_to_bottom().times(1).returning(|_| Ok(()));
        site.expect_visible_followers()
            .times(1)
            .returning(move || Ok(followers.clone()));
    }

    /// Allow any number of like and follow clicks
    pub fn allow_engagement(site: &mut MockSocialSite) {
        site.expect_like_post().returning(|| Ok(()));
        site.expect_follow_author().returning(|| Ok(()));
    }
}
