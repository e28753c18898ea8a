//! End-to-end cycle tests over the in-memory store
//!
//! These tests drive `CycleOrchestrator::run_cycle_at` and assert on what
//! ends up in the store and in the returned summary.

use assert_matches::assert_matches;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;

use matcher::services::opening_text::GENERIC_OPENER;
use matcher::traits::{MockMemberStore, MockOpeningTextStrategy, MockPairingStore};
use matcher::{CycleLock, GenerationFailure, MatcherError, PairingStore, CYCLE_ALREADY_RUNNING};
use shared::{CycleResponse, PairKey, PairingKind, PairingStatus};

mod common;
use common::{BlindPairings, CycleBuilder, FailingChannels, TestFixtures};

#[tokio::test]
async fn test_near_identical_students_are_matched() {
    let (alice, bob) = TestFixtures::near_identical_pair();
    let (orchestrator, store, notifier) = CycleBuilder::new([alice.clone(), bob.clone()]).build();
    let now = TestFixtures::now();

    let summary = orchestrator.run_cycle_at(now).await.unwrap();

    assert_eq!(summary.matches_created, 1);
    assert!(summary.errors.is_empty());
    assert_eq!(summary.members_considered, 2);
    assert_eq!(summary.unmatched, 0);
    assert_eq!(summary.opening_messages_sent, 1);

    let pairings = store.pairings().await;
    assert_eq!(pairings.len(), 1);
    let pairing = &pairings[0];
    assert_eq!(pairing.key(), PairKey::new(alice.id, bob.id));
    assert_eq!(pairing.kind, PairingKind::Auto);
    assert_eq!(pairing.status, PairingStatus::Active);
    assert!(pairing.opening_message_sent);
    assert_eq!(pairing.created_at, now);

    let analytics = store.analytics().await;
    assert_eq!(analytics.len(), 1);
    assert_eq!(analytics[0].pairing_id, pairing.id);
    assert_eq!(analytics[0].score, 78);
    assert_eq!(analytics[0].breakdown.affiliation, 20);
    assert_eq!(analytics[0].breakdown.topic_overlap, 20);
    assert_eq!(analytics[0].breakdown.availability_overlap, 10);
    assert_eq!(analytics[0].breakdown.style_match, 15);
    assert_eq!(analytics[0].breakdown.goal_match, 8);
    assert_eq!(analytics[0].breakdown.seniority_proximity, 5);

    let channels = store.channels().await;
    assert_eq!(channels.len(), 1);
    let messages = store.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel_id, channels[0].id);
    assert_eq!(messages[0].author_id, alice.id);
    assert_eq!(messages[0].content, "Study data structures together?");

    for id in [alice.id, bob.id] {
        assert_eq!(store.member(&id).await.unwrap().last_cycle_at, Some(now));
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.title == "You have a new study partner!"));
    assert_eq!(sent[0].member_id, alice.id);
    assert!(sent[0].body.contains("Bob"));
    assert_eq!(sent[1].member_id, bob.id);
    assert!(sent[1].body.contains("Alice"));
}

#[tokio::test]
async fn test_identical_profiles_score_ninety() {
    let (a, b) = TestFixtures::identical_pair();
    let (orchestrator, store, _) = CycleBuilder::new([a, b]).build();

    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.matches_created, 1);
    let analytics = store.analytics().await;
    assert_eq!(analytics[0].score, 90);
    assert_eq!(analytics[0].breakdown.sum(), 90);
}

#[tokio::test]
async fn test_cross_affiliation_pair_is_never_emitted() {
    let (alice, carol) = TestFixtures::cross_affiliation_pair();
    let (orchestrator, store, notifier) = CycleBuilder::new([alice.clone(), carol.clone()])
        .with_config(|c| c.min_score = 0)
        .build();

    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.matches_created, 0);
    assert_eq!(summary.unmatched, 2);
    assert!(store.pairings().await.is_empty());
    assert!(notifier.sent().is_empty());
    // Unmatched members stay eligible for the next cycle
    assert_eq!(store.member(&alice.id).await.unwrap().last_cycle_at, None);
    let score = matcher::CompatibilityScorer::new().score(&alice, &carol);
    assert!(score.total() < 40);
    assert_eq!(score.total(), 0);
    assert_eq!(score.total(), score.breakdown().sum());
}

#[tokio::test]
async fn test_incomplete_intake_is_never_eligible() {
    let (alice, mut bob) = TestFixtures::identical_pair();
    bob.intake_complete = false;
    let (orchestrator, store, _) = CycleBuilder::new([alice, bob]).build();

    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.members_considered, 1);
    assert_eq!(summary.matches_created, 0);
    assert!(store.pairings().await.is_empty());
}

#[tokio::test]
async fn test_idempotent_within_cooldown() {
    let (alice, bob) = TestFixtures::identical_pair();
    let (orchestrator, store, _) = CycleBuilder::new([alice, bob]).build();
    let now = TestFixtures::now();

    let first = orchestrator.run_cycle_at(now).await.unwrap();
    assert_eq!(first.matches_created, 1);

    let again = orchestrator.run_cycle_at(now + ChronoDuration::hours(1)).await.unwrap();
    assert_eq!(again.matches_created, 0);
    assert_eq!(again.members_considered, 0);
    assert_eq!(store.pairings().await.len(), 1);
}

#[tokio::test]
async fn test_existing_pair_is_not_recreated_after_cooldown() {
    let (alice, bob) = TestFixtures::identical_pair();
    let (orchestrator, store, _) = CycleBuilder::new([alice, bob]).build();
    let now = TestFixtures::now();

    orchestrator.run_cycle_at(now).await.unwrap();
    let later = orchestrator.run_cycle_at(now + ChronoDuration::days(2)).await.unwrap();

    assert_eq!(later.members_considered, 2);
    assert_eq!(later.matches_created, 0);
    assert_eq!(store.pairings().await.len(), 1);
}

#[tokio::test]
async fn test_mutual_exclusion_with_three_candidates() {
    let (alice, bob) = TestFixtures::identical_pair();
    let carol = TestFixtures::cs_student(TestFixtures::CAROL, "Carol");
    let (orchestrator, store, _) = CycleBuilder::new([alice.clone(), bob.clone(), carol.clone()]).build();

    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.matches_created, 1);
    assert_eq!(summary.unmatched, 1);
    // Ties go to the first candidate in pool order
    assert_eq!(store.pairings().await[0].key(), PairKey::new(alice.id, bob.id));
    assert_eq!(store.member(&carol.id).await.unwrap().last_cycle_at, None);
}

#[tokio::test]
async fn test_concurrent_pairing_becomes_duplicate_skip() {
    let (alice, bob) = TestFixtures::identical_pair();
    let builder = CycleBuilder::new([alice.clone(), bob.clone()]);
    let store = builder.store();

    // The assigner sees no pairing; by persist time another cycle has written one
    let mut racing = MockPairingStore::new();
    let mut checks = 0;
    racing.expect_exists().returning(move |_, _| {
        checks += 1;
        Ok(checks > 1)
    });
    racing.expect_create().never();

    let (orchestrator, _, notifier) = builder
        .with_stores(|stores| stores.pairings = Arc::new(racing))
        .build();
    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.matches_created, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("already exists"));
    assert!(notifier.sent().is_empty());
    assert_eq!(store.member(&alice.id).await.unwrap().last_cycle_at, None);
}

#[tokio::test]
async fn test_index_violation_is_a_duplicate_skip() {
    let (alice, bob) = TestFixtures::identical_pair();
    let builder = CycleBuilder::new([alice.clone(), bob.clone()]);
    let store = builder.store();
    // Written behind the cycle's back; only the unique index can catch it
    PairingStore::create(
        store.as_ref(),
        shared::NewPairing {
            member_a: bob.id,
            member_b: alice.id,
            kind: PairingKind::Manual,
            status: PairingStatus::Active,
            created_at: TestFixtures::now(),
        },
    )
    .await
    .unwrap();

    let blind = Arc::new(BlindPairings::new(store.clone()));
    let (orchestrator, _, notifier) = builder
        .with_stores(|stores| stores.pairings = blind)
        .build();
    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.matches_created, 0);
    assert!(summary.errors[0].contains("already exists"));
    assert_eq!(store.pairings().await.len(), 1);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_generation_failure_still_opens_pairing() {
    let (alice, bob) = TestFixtures::identical_pair();
    let mut strategy = MockOpeningTextStrategy::new();
    strategy.expect_name().return_const("external");
    strategy
        .expect_generate()
        .returning(|_| Err(GenerationFailure::Timeout));

    let (orchestrator, store, _) = CycleBuilder::new([alice, bob])
        .with_strategy(Arc::new(strategy))
        .build();
    let summary = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(summary.opening_messages_sent, 1);
    assert!(summary.errors.is_empty());
    let messages = store.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "Study data structures together?");
    assert!(store.pairings().await[0].opening_message_sent);
}

#[tokio::test]
async fn test_generic_opener_without_shared_topics() {
    let mut alice = TestFixtures::member(TestFixtures::ALICE, TestFixtures::STATE_UNIVERSITY);
    let mut bob = TestFixtures::member(TestFixtures::BOB, TestFixtures::STATE_UNIVERSITY);
    alice.topics = vec!["art history".to_string()];
    bob.topics = vec!["physics".to_string()];
    let (orchestrator, store, _) = CycleBuilder::new([alice, bob])
        .with_config(|c| c.min_score = 20)
        .build();

    orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap();

    assert_eq!(store.messages().await[0].content, GENERIC_OPENER);
}

#[tokio::test]
async fn test_channel_failure_leaves_degraded_pairing() {
    let (alice, bob) = TestFixtures::identical_pair();
    let (orchestrator, store, notifier) = CycleBuilder::new([alice.clone(), bob.clone()])
        .with_stores(|stores| stores.channels = Arc::new(FailingChannels))
        .build();
    let now = TestFixtures::now();

    let summary = orchestrator.run_cycle_at(now).await.unwrap();

    assert_eq!(summary.matches_created, 1);
    assert_eq!(summary.degraded_pairings, 1);
    assert_eq!(summary.opening_messages_sent, 0);
    // The pairing itself succeeded, so nothing is reported as failed
    assert!(summary.errors.is_empty());

    let pairings = store.pairings().await;
    assert_eq!(pairings.len(), 1);
    assert!(!pairings[0].opening_message_sent);
    assert_eq!(store.analytics().await.len(), 1);
    assert!(store.messages().await.is_empty());
    // Cooldown and notifications still follow the pairing write
    assert_eq!(store.member(&alice.id).await.unwrap().last_cycle_at, Some(now));
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn test_member_store_outage_is_fatal() {
    let mut members = MockMemberStore::new();
    members.expect_list_eligible().returning(|_, _| {
        Err(MatcherError::StoreRead {
            entity: "member",
            message: "connection refused".to_string(),
        })
    });
    let (orchestrator, store, _) = CycleBuilder::new(Vec::new())
        .with_stores(|stores| stores.members = Arc::new(members))
        .build();

    let err = orchestrator.run_cycle_at(TestFixtures::now()).await.unwrap_err();
    assert_matches!(err, MatcherError::MemberStoreUnavailable { .. });

    let body = serde_json::to_value(CycleResponse::failed(&err)).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    // The lock was released, so the next run is not blocked
    let next_run = CycleLock::try_acquire(store.as_ref(), "next-run", Duration::from_secs(1), TestFixtures::now());
    assert!(next_run.await.unwrap());
}

#[tokio::test]
async fn test_overlapping_cycle_is_rejected_by_lock() {
    let (alice, bob) = TestFixtures::identical_pair();
    let builder = CycleBuilder::new([alice, bob]);
    let store = builder.store();
    let now = TestFixtures::now();
    let held = CycleLock::try_acquire(store.as_ref(), "other-host", Duration::from_secs(600), now);
    assert!(held.await.unwrap());

    let (orchestrator, _, _) = builder.build();
    let summary = orchestrator.run_cycle_at(now).await.unwrap();

    assert_eq!(summary.matches_created, 0);
    assert_eq!(summary.errors, vec![CYCLE_ALREADY_RUNNING.to_string()]);
    assert!(store.pairings().await.is_empty());
    assert_eq!(
        serde_json::to_value(CycleResponse::completed(&summary)).unwrap(),
        serde_json::json!({"success": true, "matchesCreated": 0, "errors": [CYCLE_ALREADY_RUNNING]})
    );
}
