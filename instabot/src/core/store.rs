//! Relationship state tracking and follow admission control
//!
//! Every account the bot has ever followed keeps a record here for good.
//! The record says whether the account is currently followed or was
//! unfollowed, and since which day. The store decides whether a follow may
//! happen given the cooldown, and rewrites durable storage on each mutation.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::Phase;

use super::cooldown::{format_date, parse_date, CooldownPolicy};
use crate::error::{InstabotError, InstabotResult};
use crate::services::{JsonStateFile, SystemClock};
use crate::traits::{Clock, StateStorage};

/// Relationship of the operator to one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipStatus {
    /// No record exists
    NeverFollowed,
    Followed { since: NaiveDate },
    Unfollowed { since: NaiveDate },
}

/// A stored account. `status` is never `NeverFollowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub status: RelationshipStatus,
}

/// On-disk shape of a single account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_followed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_unfollowed: Option<String>,
}

/// On-disk shape of the whole store.
///
/// `likes` and `comments` are reserved; nothing populates them, but any
/// content found there is carried through rewrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub users: Vec<AccountRecord>,
    #[serde(default)]
    pub likes: Vec<serde_json::Value>,
    #[serde(default)]
    pub comments: Vec<serde_json::Value>,
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        let (date_followed, date_unfollowed) = match account.status {
            RelationshipStatus::Followed { since } => (Some(format_date(since)), None),
            RelationshipStatus::Unfollowed { since } => (None, Some(format_date(since))),
            RelationshipStatus::NeverFollowed => (None, None),
        };
        Self {
            username: account.username.clone(),
            date_followed,
            date_unfollowed,
        }
    }
}

impl AccountRecord {
    fn into_account(self, location: &str) -> InstabotResult<Account> {
        let parse = |text: &str| {
            parse_date(text).ok_or_else(|| {
                InstabotError::corrupt(location, format!("invalid date '{}' for '{}'", text, self.username))
            })
        };

        let status = match (&self.date_followed, &self.date_unfollowed) {
            (Some(followed), None) => RelationshipStatus::Followed { since: parse(followed)? },
            (None, Some(unfollowed)) => RelationshipStatus::Unfollowed { since: parse(unfollowed)? },
            (Some(_), Some(_)) => {
                return Err(InstabotError::corrupt(
                    location,
                    format!("'{}' is both followed and unfollowed", self.username),
                ));
            }
            (None, None) => {
                return Err(InstabotError::corrupt(location, format!("'{}' has no status date", self.username)));
            }
        };

        Ok(Account {
            username: self.username,
            status,
        })
    }
}

/// Keyed, insertion-ordered account state backed by a [`StateStorage`].
///
/// A single process owns the store for the duration of a run.
pub struct RelationshipStore {
    accounts: Vec<Account>,
    index: HashMap<String, usize>,
    likes: Vec<serde_json::Value>,
    comments: Vec<serde_json::Value>,
    storage: Box<dyn StateStorage>,
    clock: Box<dyn Clock>,
}

impl RelationshipStore {
    /// Open the JSON state file at `path`, creating it if absent
    pub fn load(path: impl Into<PathBuf>) -> InstabotResult<Self> {
        Self::open(Box::new(JsonStateFile::new(path)), Box::new(SystemClock))
    }

    /// Open a store on arbitrary storage and clock.
    ///
    /// Empty storage is initialized and persisted immediately.
    pub fn open(storage: Box<dyn StateStorage>, clock: Box<dyn Clock>) -> InstabotResult<Self> {
        let document = storage.load()?;
        let fresh = document.is_none();
        let document = document.unwrap_or_default();
        let location = storage.location();

        let mut store = Self {
            accounts: Vec::with_capacity(document.users.len()),
            index: HashMap::with_capacity(document.users.len()),
            likes: document.likes,
            comments: document.comments,
            storage,
            clock,
        };

        for record in document.users {
            let account = record.into_account(&location)?;
            if store.index.contains_key(&account.username) {
                return Err(InstabotError::corrupt(
                    &location,
                    format!("duplicate record for '{}'", account.username),
                ));
            }
            store.index.insert(account.username.clone(), store.accounts.len());
            store.accounts.push(account);
        }

        if fresh {
            store.save()?;
            shared::phase_debug!(Phase::current(), "🗃️  Initialized empty relationship store at {}", location);
        } else {
            shared::phase_debug!(
                Phase::current(),
                "🗃️  Loaded {} accounts from {}",
                store.accounts.len(),
                location
            );
        }

        Ok(store)
    }

    /// Admission control for (re)following `username`.
    ///
    /// Returns `true` when the caller may follow the account now; the record
    /// is then `Followed(today)`. A `Followed` record means the UI disagrees
    /// with the store (the account was unfollowed out of band), so it is
    /// reconciled to `Unfollowed(today)` and `false` is returned. An
    /// `Unfollowed` record is re-followed only once the cooldown has elapsed.
    /// The store is persisted on every branch.
    pub fn record_follow(&mut self, username: &str, cooldown_days: i64) -> InstabotResult<bool> {
        let today = self.clock.today();
        let policy = CooldownPolicy::new(cooldown_days);

        let admitted = match self.index.get(username).copied() {
            None => {
                self.index.insert(username.to_string(), self.accounts.len());
                self.accounts.push(Account {
                    username: username.to_string(),
                    status: RelationshipStatus::Followed { since: today },
                });
                true
            }
            Some(idx) => {
                let account = &mut self.accounts[idx];
                match account.status {
                    RelationshipStatus::Followed { .. } => {
                        account.status = RelationshipStatus::Unfollowed { since: today };
                        false
                    }
                    RelationshipStatus::Unfollowed { since } if policy.has_elapsed(since, today) => {
                        account.status = RelationshipStatus::Followed { since: today };
                        true
                    }
                    _ => false,
                }
            }
        };

        self.save()?;
        shared::phase_debug!(
            Phase::current(),
            "Admission for {}: {}",
            username,
            if admitted { "follow" } else { "skip" }
        );
        Ok(admitted)
    }

    /// Mark a followed account as unfollowed today
    pub fn record_unfollow(&mut self, username: &str) -> InstabotResult<()> {
        let today = self.clock.today();
        let account = self
            .index
            .get(username)
            .map(|&idx| &mut self.accounts[idx])
            .filter(|account| matches!(account.status, RelationshipStatus::Followed { .. }))
            .ok_or_else(|| InstabotError::UnknownAccount {
                username: username.to_string(),
            })?;

        account.status = RelationshipStatus::Unfollowed { since: today };
        self.save()
    }

    /// Followed accounts whose follow date is at least `cooldown_days` away
    /// from `as_of`, in store order
    pub fn list_eligible_for_unfollow(&self, cooldown_days: i64, as_of: NaiveDate) -> Vec<String> {
        let policy = CooldownPolicy::new(cooldown_days);
        self.accounts
            .iter()
            .filter(|account| match account.status {
                RelationshipStatus::Followed { since } => policy.has_elapsed(since, as_of),
                _ => false,
            })
            .map(|account| account.username.clone())
            .collect()
    }

    pub fn status(&self, username: &str) -> RelationshipStatus {
        self.index
            .get(username)
            .map(|&idx| self.accounts[idx].status)
            .unwrap_or(RelationshipStatus::NeverFollowed)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.index.contains_key(username)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Today according to the store's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Serializable snapshot of the whole store
    pub fn to_document(&self) -> StoreDocument {
        StoreDocument {
            users: self.accounts.iter().map(AccountRecord::from).collect(),
            likes: self.likes.clone(),
            comments: self.comments.clone(),
        }
    }

    /// Write the full store to durable storage
    pub fn save(&self) -> InstabotResult<()> {
        self.storage.save(&self.to_document())
    }
}
