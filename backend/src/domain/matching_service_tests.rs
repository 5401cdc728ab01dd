//! Tests for the matching engine.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::domain::ports::{
    MatchDecision, MatchingEngine, MockLoadRepository, MockMatchRepository,
};
use crate::domain::{
    Address, Error, ErrorCode, Identity, Load, LoadId, LoadStatus, Match, MatchStatus,
    MatchingService, Role, SwipeDirection, UserId,
};

fn make_service(
    matches: MockMatchRepository,
    loads: MockLoadRepository,
) -> MatchingService<MockMatchRepository, MockLoadRepository> {
    MatchingService::new(Arc::new(matches), Arc::new(loads))
}

fn trucker() -> Identity {
    Identity::new(UserId::random(), Role::Trucker)
}

fn shipper() -> Identity {
    Identity::new(UserId::random(), Role::Shipper)
}

fn load_owned_by(shipper_id: UserId) -> Load {
    Load {
        id: LoadId::random(),
        shipper_id,
        origin: Address::new("Duluth, MN").expect("origin"),
        destination: Address::new("Fargo, ND").expect("destination"),
        weight: dec!(100),
        budget: dec!(500),
        deadline: NaiveDate::from_ymd_opt(2026, 12, 1).expect("date"),
        description: "pallets".to_owned(),
        status: LoadStatus::Pending,
        shipper_in_transit_confirmed: false,
        trucker_in_transit_confirmed: false,
    }
}

fn code_of(err: Error) -> ErrorCode {
    err.code()
}

#[tokio::test]
async fn swiping_on_yourself_is_rejected() {
    let actor = trucker();
    let service = make_service(MockMatchRepository::new(), MockLoadRepository::new());

    let err = service
        .swipe(actor, actor.user_id, SwipeDirection::Right)
        .await
        .expect_err("self swipe");
    assert_eq!(code_of(err), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn admins_cannot_swipe() {
    let actor = Identity::new(UserId::random(), Role::Admin);
    let service = make_service(MockMatchRepository::new(), MockLoadRepository::new());

    let err = service
        .swipe(actor, UserId::random(), SwipeDirection::Right)
        .await
        .expect_err("admin swipe");
    assert_eq!(code_of(err), ErrorCode::Forbidden);
}

#[tokio::test]
async fn first_right_swipe_creates_a_pending_match() {
    let actor = trucker();
    let target = UserId::random();
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_between()
        .times(1)
        .return_once(|_, _| Ok(None));
    matches.expect_insert().times(1).return_once(|_| Ok(()));

    let service = make_service(matches, MockLoadRepository::new());
    let outcome = service
        .swipe(actor, target, SwipeDirection::Right)
        .await
        .expect("swipe succeeds");

    assert!(!outcome.matched);
    assert_eq!(outcome.record.status, MatchStatus::Pending);
    assert_eq!(outcome.record.trucker_id, actor.user_id);
    assert_eq!(outcome.record.shipper_id, target);
    assert!(outcome.record.load_id.is_none());
}

#[tokio::test]
async fn right_swipe_on_a_pending_pairing_is_mutual_acceptance() {
    let actor = shipper();
    let target = UserId::random();
    let existing = Match::between(target, actor.user_id, SwipeDirection::Right);
    let promoted = Match {
        status: MatchStatus::Matched,
        ..existing.clone()
    };

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_between()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    matches
        .expect_promote_if_pending()
        .times(1)
        .return_once(move |_| Ok(Some(promoted)));

    let service = make_service(matches, MockLoadRepository::new());
    let outcome = service
        .swipe(actor, target, SwipeDirection::Right)
        .await
        .expect("swipe succeeds");

    assert!(outcome.matched);
    assert_eq!(outcome.record.status, MatchStatus::Matched);
}

#[tokio::test]
async fn swipe_on_a_decided_pairing_changes_nothing() {
    let actor = trucker();
    let target = UserId::random();
    let existing = Match {
        status: MatchStatus::Rejected,
        ..Match::between(actor.user_id, target, SwipeDirection::Left)
    };

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_between()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));

    let service = make_service(matches, MockLoadRepository::new());
    let outcome = service
        .swipe(actor, target, SwipeDirection::Right)
        .await
        .expect("swipe succeeds");

    assert!(!outcome.matched);
    assert_eq!(outcome.record.status, MatchStatus::Rejected);
}

#[tokio::test]
async fn concurrent_decision_during_promotion_is_a_conflict() {
    let actor = trucker();
    let target = UserId::random();
    let existing = Match::between(actor.user_id, target, SwipeDirection::Right);

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_between()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    matches
        .expect_promote_if_pending()
        .times(1)
        .return_once(|_| Ok(None));

    let service = make_service(matches, MockLoadRepository::new());
    let err = service
        .swipe(actor, target, SwipeDirection::Right)
        .await
        .expect_err("conflict");
    assert_eq!(code_of(err), ErrorCode::Conflict);
}

#[tokio::test]
async fn only_truckers_swipe_on_loads() {
    let service = make_service(MockMatchRepository::new(), MockLoadRepository::new());

    let err = service
        .swipe_on_load(shipper(), LoadId::random(), SwipeDirection::Right)
        .await
        .expect_err("forbidden");
    assert_eq!(code_of(err), ErrorCode::Forbidden);
}

#[tokio::test]
async fn load_swipe_on_a_missing_load_is_not_found() {
    let mut loads = MockLoadRepository::new();
    loads.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let service = make_service(MockMatchRepository::new(), loads);
    let err = service
        .swipe_on_load(trucker(), LoadId::random(), SwipeDirection::Right)
        .await
        .expect_err("not found");
    assert_eq!(code_of(err), ErrorCode::NotFound);
}

#[tokio::test]
async fn first_load_swipe_creates_the_match_with_the_loads_shipper() {
    let actor = trucker();
    let shipper_id = UserId::random();
    let load = load_owned_by(shipper_id);
    let load_id = load.id;

    let mut loads = MockLoadRepository::new();
    loads
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(load)));
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_load_and_trucker()
        .times(1)
        .return_once(|_, _| Ok(None));
    matches.expect_insert().times(1).return_once(|_| Ok(()));

    let service = make_service(matches, loads);
    let record = service
        .swipe_on_load(actor, load_id, SwipeDirection::Left)
        .await
        .expect("swipe succeeds");

    assert_eq!(record.load_id, Some(load_id));
    assert_eq!(record.shipper_id, shipper_id);
    assert_eq!(record.status, MatchStatus::Rejected);
}

#[tokio::test]
async fn repeat_load_swipe_updates_the_existing_record() {
    let actor = trucker();
    let load = load_owned_by(UserId::random());
    let load_id = load.id;
    let existing = Match::for_load(load_id, actor.user_id, load.shipper_id, SwipeDirection::Left);
    let revived = Match {
        status: MatchStatus::Pending,
        ..existing.clone()
    };

    let mut loads = MockLoadRepository::new();
    loads
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(load)));
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_load_and_trucker()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    matches
        .expect_update_trucker_swipe()
        .times(1)
        .return_once(move |_, _| Ok(Some(revived)));

    let service = make_service(matches, loads);
    let record = service
        .swipe_on_load(actor, load_id, SwipeDirection::Right)
        .await
        .expect("swipe succeeds");

    // The trucker's own left-swipe is revivable; no second row appears.
    assert_eq!(record.status, MatchStatus::Pending);
}

#[tokio::test]
async fn load_swipe_after_the_shipper_responded_is_invalid_state() {
    let actor = trucker();
    let load = load_owned_by(UserId::random());
    let load_id = load.id;
    let existing = Match {
        status: MatchStatus::Rejected,
        shipper_responded: true,
        ..Match::for_load(load_id, actor.user_id, load.shipper_id, SwipeDirection::Left)
    };

    let mut loads = MockLoadRepository::new();
    loads
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(load)));
    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_load_and_trucker()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));

    let service = make_service(matches, loads);
    let err = service
        .swipe_on_load(actor, load_id, SwipeDirection::Right)
        .await
        .expect_err("invalid state");
    assert_eq!(code_of(err), ErrorCode::InvalidState);
}

#[tokio::test]
async fn responding_to_someone_elses_match_is_forbidden() {
    let actor = shipper();
    let existing = Match::for_load(
        LoadId::random(),
        UserId::random(),
        UserId::random(),
        SwipeDirection::Right,
    );
    let match_id = existing.id;

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));

    let service = make_service(matches, MockLoadRepository::new());
    let err = service
        .respond_to_match(actor, match_id, MatchDecision::Accept)
        .await
        .expect_err("forbidden");
    assert_eq!(code_of(err), ErrorCode::Forbidden);
}

#[tokio::test]
async fn responding_to_a_non_pending_match_is_invalid_state() {
    let actor = shipper();
    let existing = Match {
        status: MatchStatus::Rejected,
        ..Match::for_load(
            LoadId::random(),
            UserId::random(),
            actor.user_id,
            SwipeDirection::Right,
        )
    };
    let match_id = existing.id;

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));

    let service = make_service(matches, MockLoadRepository::new());
    let err = service
        .respond_to_match(actor, match_id, MatchDecision::Accept)
        .await
        .expect_err("invalid state");
    assert_eq!(code_of(err), ErrorCode::InvalidState);
}

#[tokio::test]
async fn accepting_a_match_runs_the_atomic_cascade() {
    let actor = shipper();
    let existing = Match::for_load(
        LoadId::random(),
        UserId::random(),
        actor.user_id,
        SwipeDirection::Right,
    );
    let match_id = existing.id;
    let accepted = Match {
        status: MatchStatus::Matched,
        shipper_responded: true,
        ..existing.clone()
    };

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    matches
        .expect_accept()
        .times(1)
        .return_once(move |_, _| Ok(Some(accepted)));

    let service = make_service(matches, MockLoadRepository::new());
    let record = service
        .respond_to_match(actor, match_id, MatchDecision::Accept)
        .await
        .expect("accept succeeds");
    assert_eq!(record.status, MatchStatus::Matched);
}

#[tokio::test]
async fn accept_guard_failure_surfaces_as_conflict() {
    let actor = shipper();
    let existing = Match::for_load(
        LoadId::random(),
        UserId::random(),
        actor.user_id,
        SwipeDirection::Right,
    );
    let match_id = existing.id;

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    matches.expect_accept().times(1).return_once(|_, _| Ok(None));

    let service = make_service(matches, MockLoadRepository::new());
    let err = service
        .respond_to_match(actor, match_id, MatchDecision::Accept)
        .await
        .expect_err("conflict");
    assert_eq!(code_of(err), ErrorCode::Conflict);
}

#[tokio::test]
async fn rejecting_a_match_touches_only_that_match() {
    let actor = shipper();
    let existing = Match::for_load(
        LoadId::random(),
        UserId::random(),
        actor.user_id,
        SwipeDirection::Right,
    );
    let match_id = existing.id;
    let rejected = Match {
        status: MatchStatus::Rejected,
        shipper_responded: true,
        ..existing.clone()
    };

    let mut matches = MockMatchRepository::new();
    matches
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    matches
        .expect_reject_as_shipper()
        .times(1)
        .return_once(move |_| Ok(Some(rejected)));

    let service = make_service(matches, MockLoadRepository::new());
    let record = service
        .respond_to_match(actor, match_id, MatchDecision::Reject)
        .await
        .expect("reject succeeds");
    assert_eq!(record.status, MatchStatus::Rejected);
    assert!(record.shipper_responded);
}
