//! Concurrent registration races against the store's uniqueness guarantee.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;
use tokio::sync::Barrier;
use user_registry::domain::ports::{UserPersistenceError, UserRecordError, UserRepository};
use user_registry::domain::{
    CreateUserInput, NewUser, RecordId, UserField, UserId, UserRecord, UserRecordManager,
};
use user_registry::outbound::persistence::InMemoryUserRepository;

/// Store whose contact lookups miss and then wait for every racer, so each
/// create passes the pre-check before any of them writes.
struct RacingRepository {
    inner: InMemoryUserRepository,
    barrier: Barrier,
}

impl RacingRepository {
    fn new(racers: usize) -> Self {
        Self {
            inner: InMemoryUserRepository::default(),
            barrier: Barrier::new(racers),
        }
    }
}

#[async_trait]
impl UserRepository for RacingRepository {
    async fn find_by_id(&self, id: RecordId) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_external_id(
        &self,
        external_id: &UserId,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.inner.find_by_external_id(external_id).await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        Ok(None)
    }

    async fn find_by_phone(&self, _phone: &str) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.barrier.wait().await;
        Ok(None)
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, UserPersistenceError> {
        self.inner.find_all().await
    }

    async fn insert(&self, user: &NewUser) -> Result<UserRecord, UserPersistenceError> {
        self.inner.insert(user).await
    }

    async fn update(&self, user: &UserRecord) -> Result<Option<UserRecord>, UserPersistenceError> {
        self.inner.update(user).await
    }

    async fn delete(&self, user: &UserRecord) -> Result<bool, UserPersistenceError> {
        self.inner.delete(user).await
    }
}

fn input(index: usize) -> CreateUserInput {
    CreateUserInput::new(
        format!("Racer {index}"),
        "shared@example.com",
        format!("+44770090{index:04}"),
    )
}

async fn race<R>(
    manager: Arc<UserRecordManager<R>>,
    racers: usize,
) -> Vec<Result<UserRecord, UserRecordError>>
where
    R: UserRepository + 'static,
{
    let handles: Vec<_> = (0..racers)
        .map(|index| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.create(input(index)).await })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(racers);
    for handle in handles {
        outcomes.push(handle.await.expect("create task completes"));
    }
    outcomes
}

fn assert_single_winner(outcomes: &[Result<UserRecord, UserRecordError>]) {
    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "exactly one create succeeds: {outcomes:?}");
    for outcome in outcomes.iter().filter(|outcome| outcome.is_err()) {
        assert_eq!(
            outcome,
            &Err(UserRecordError::conflict(UserField::Email)),
            "losers see an email conflict"
        );
    }
}

#[rstest]
#[case(2)]
#[case(8)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racers_past_the_pre_check_lose_with_conflict(#[case] racers: usize) {
    let manager = Arc::new(UserRecordManager::new(
        Arc::new(RacingRepository::new(racers)),
        Arc::new(DefaultClock),
    ));

    let outcomes = race(Arc::clone(&manager), racers).await;

    assert_single_winner(&outcomes);
    let stored = manager.list_all().await.expect("list succeeds");
    assert_eq!(stored.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unsynchronised_racers_never_both_succeed() {
    let manager = Arc::new(UserRecordManager::new(
        Arc::new(InMemoryUserRepository::default()),
        Arc::new(DefaultClock),
    ));

    let outcomes = race(Arc::clone(&manager), 16).await;

    assert_single_winner(&outcomes);
}
