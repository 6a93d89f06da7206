//! Unit tests for individual instabot components
//!
//! These exercise discovery, admission control and eligibility through the
//! public API with a mocked site and a file-backed store.

use mockall::predicate::eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use instabot::core::DiscoveryPlan;
use instabot::traits::{MockSocialSite, Surface};
use instabot::{Candidate, CandidateDiscoveryQueue, InstabotError, RelationshipStatus};

mod common;
use common::{StoreBuilder, TestFixtures};

/// Each tag is crawled once; repeated posts across tags collapse
#[test]
fn test_discovery_crawls_every_tag_and_dedups() {
    // Arrange
    let mut site = MockSocialSite::new();
    for tag in TestFixtures::tags() {
        site.expect_open_tag_feed()
            .with(eq(tag))
            .times(1)
            .returning(|_| Ok(()));
    }
    site.expect_content_height()
        .with(eq(Surface::TagFeed))
        .returning(|_| Ok(4000));
    site.expect_scroll_to_bottom()
        .with(eq(Surface::TagFeed))
        .times(2)
        .returning(|_| Ok(()));
    site.expect_visible_posts().times(2).returning(|| {
        Ok(vec![
            Candidate::new(TestFixtures::post("shared")),
            Candidate::new(TestFixtures::post("a")),
            Candidate::new(TestFixtures::post("b")),
        ])
    });

    // Act
    let pool = CandidateDiscoveryQueue::new(StdRng::seed_from_u64(TestFixtures::SEED))
        .discover(&mut site, &TestFixtures::tags(), 4)
        .unwrap();

    // Assert
    let mut posts: Vec<_> = pool.iter().map(|c| c.as_str().to_string()).collect();
    posts.sort();
    assert_eq!(
        posts,
        vec![TestFixtures::post("a"), TestFixtures::post("b"), TestFixtures::post("shared")]
    );
}

/// The same seed yields the same candidate order
#[test]
fn test_discovery_order_is_reproducible_with_seed() {
    let discover = || {
        let mut site = MockSocialSite::new();
        site.expect_open_tag_feed().returning(|_| Ok(()));
        site.expect_content_height().returning(|_| Ok(4000));
        site.expect_scroll_to_bottom().returning(|_| Ok(()));
        site.expect_visible_posts().returning(|| {
            Ok((0..12).map(|i| Candidate::new(TestFixtures::post(&i.to_string()))).collect())
        });

        CandidateDiscoveryQueue::new(StdRng::seed_from_u64(TestFixtures::SEED))
            .discover(&mut site, &TestFixtures::tags(), 6)
            .unwrap()
    };

    assert_eq!(discover(), discover());
}

/// No tags is a warning and an empty pool, never a site call
#[test]
fn test_discovery_without_tags_is_empty() {
    let mut site = MockSocialSite::new();

    let pool = CandidateDiscoveryQueue::new(StdRng::seed_from_u64(TestFixtures::SEED))
        .discover(&mut site, &[], 10)
        .unwrap();

    assert!(pool.is_empty());
}

/// Crawl budget per tag
#[test]
fn test_discovery_plan_budget() {
    let plan = DiscoveryPlan::new(20, 4, 10).unwrap();
    assert_eq!((plan.users_per_tag, plan.posts_per_tag, plan.pages_per_tag), (5, 10, 2));

    // fewer targets than tags budgets tag_count users per tag
    let plan = DiscoveryPlan::new(2, 3, 10).unwrap();
    assert_eq!((plan.users_per_tag, plan.posts_per_tag, plan.pages_per_tag), (3, 6, 1));

    assert!(matches!(DiscoveryPlan::new(5, 0, 10), Err(InstabotError::NoTagsProvided)));
}

/// Admission decisions for each prior state, persisted across reopen
#[test]
fn test_admission_decisions_persist() {
    // Arrange
    let mut test_store = StoreBuilder::new()
        .followed(TestFixtures::ALICE, 1)
        .unfollowed(TestFixtures::BOB, 20)
        .unfollowed(TestFixtures::CAROL, 3)
        .build();
    let cooldown = TestFixtures::COOLDOWN_DAYS;

    // Act & Assert
    assert!(test_store.store.record_follow("dave", cooldown).unwrap());
    assert!(!test_store.store.record_follow(TestFixtures::ALICE, cooldown).unwrap());
    assert!(test_store.store.record_follow(TestFixtures::BOB, cooldown).unwrap());
    assert!(!test_store.store.record_follow(TestFixtures::CAROL, cooldown).unwrap());

    let store = test_store.reopen();
    let today = TestFixtures::today();
    assert_eq!(store.status("dave"), RelationshipStatus::Followed { since: today });
    assert_eq!(store.status(TestFixtures::ALICE), RelationshipStatus::Unfollowed { since: today });
    assert_eq!(store.status(TestFixtures::BOB), RelationshipStatus::Followed { since: today });
    assert_eq!(
        store.status(TestFixtures::CAROL),
        RelationshipStatus::Unfollowed {
            since: TestFixtures::days_ago(3)
        }
    );
    assert_eq!(store.len(), 4);
}

/// Eligibility includes the cooldown boundary day and keeps store order
#[test]
fn test_eligibility_boundary_and_order() {
    let test_store = StoreBuilder::new()
        .followed("zed", 15)
        .followed("amy", 16)
        .followed("kim", 14)
        .unfollowed("old", 90)
        .build();

    let eligible = test_store
        .store
        .list_eligible_for_unfollow(TestFixtures::COOLDOWN_DAYS, TestFixtures::today());

    assert_eq!(eligible, vec!["zed", "amy"]);
}

/// Unfollowing an account the store does not hold as followed is an error
#[test]
fn test_record_unfollow_requires_followed_account() {
    let mut test_store = StoreBuilder::new().unfollowed(TestFixtures::BOB, 2).build();

    for name in [TestFixtures::BOB, "nobody"] {
        assert!(matches!(
            test_store.store.record_unfollow(name),
            Err(InstabotError::UnknownAccount { .. })
        ));
    }
}
