//! Contract coverage for the in-memory user store.

use super::*;
use crate::domain::ports::EntityStore;
use crate::domain::{Entity, PageRequest, UserId};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryUserStore {
    InMemoryUserStore::new()
}

fn user(name: &str, mail: &str, profile: i16) -> User {
    User::try_from_parts(name, mail, profile).expect("valid user")
}

async fn seed(store: &InMemoryUserStore, users: Vec<User>) -> Vec<User> {
    let mut saved = Vec::with_capacity(users.len());
    for user in users {
        saved.push(store.save(user).await.expect("seed user"));
    }
    saved
}

#[rstest]
#[tokio::test]
async fn save_assigns_identifier_and_round_trips(store: InMemoryUserStore) {
    let draft = user("alice", "a@x.com", 1);
    let saved = store.save(draft.clone()).await.expect("save user");

    let id = saved.id().expect("identifier assigned");
    let fetched = store
        .find_by_id(id)
        .await
        .expect("lookup succeeds")
        .expect("user stored");

    assert_eq!(fetched, saved);
    assert_eq!(fetched.user_name(), draft.user_name());
    assert_eq!(fetched.mail(), draft.mail());
    assert_eq!(fetched.profile(), draft.profile());
}

#[rstest]
#[tokio::test]
async fn lookup_by_user_name_scenario(store: InMemoryUserStore) {
    store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let alice = UserName::new("alice").expect("valid name");
    let bob = UserName::new("bob").expect("valid name");

    let found = store
        .find_by_user_name(&alice)
        .await
        .expect("lookup succeeds")
        .expect("alice stored");
    assert!(found.id().is_some());
    assert_eq!(found.mail().as_str(), "a@x.com");

    assert!(
        store
            .find_by_user_name(&bob)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn user_name_lookup_is_case_sensitive(store: InMemoryUserStore) {
    store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let upper = UserName::new("Alice").expect("valid name");
    assert!(
        store
            .find_by_user_name(&upper)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn find_by_mail_returns_matching_user(store: InMemoryUserStore) {
    seed(
        &store,
        vec![user("alice", "a@x.com", 1), user("bob", "b@x.com", 2)],
    )
    .await;

    let mail = Mail::new("b@x.com").expect("valid mail");
    let found = store
        .find_by_mail(&mail)
        .await
        .expect("lookup succeeds")
        .expect("bob stored");
    assert_eq!(found.user_name().as_str(), "bob");

    let missing = Mail::new("c@x.com").expect("valid mail");
    assert!(store.find_by_mail(&missing).await.expect("lookup").is_none());
}

#[rstest]
#[case::mail(user("alice2", "a@x.com", 1), USER_MAIL_CONSTRAINT, "a@x.com")]
#[case::user_name(user("alice", "other@x.com", 1), USER_NAME_CONSTRAINT, "alice")]
#[tokio::test]
async fn colliding_candidate_keys_are_rejected(
    store: InMemoryUserStore,
    #[case] duplicate: User,
    #[case] constraint: &str,
    #[case] value: &str,
) {
    store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let err = store.save(duplicate).await.expect_err("collision");
    assert_eq!(
        err,
        EntityStoreError::constraint_violation(
            constraint,
            format!("duplicate key value ({value}) already stored"),
        )
    );
    assert_eq!(store.count().await.expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn update_keeps_identifier_and_may_reuse_own_keys(store: InMemoryUserStore) {
    let saved = store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let promoted = store
        .save(saved.clone().with_profile(Profile::new(9)))
        .await
        .expect("update own row");

    assert_eq!(promoted.id(), saved.id());
    assert_eq!(promoted.profile().get(), 9);
    assert_eq!(store.count().await.expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn update_cannot_steal_another_users_mail(store: InMemoryUserStore) {
    let saved = seed(
        &store,
        vec![user("alice", "a@x.com", 1), user("bob", "b@x.com", 1)],
    )
    .await;
    let bob = saved.into_iter().nth(1).expect("bob saved");

    let err = store
        .save(bob.with_mail(Mail::new("a@x.com").expect("valid mail")))
        .await
        .expect_err("collision");
    assert!(err.is_constraint_violation());
}

#[rstest]
#[tokio::test]
async fn updating_an_unknown_identifier_is_stale(store: InMemoryUserStore) {
    let ghost = user("ghost", "g@x.com", 1).with_id(UserId::new(99).expect("valid id"));

    let err = store.save(ghost).await.expect_err("stale identity");
    assert_eq!(err, EntityStoreError::stale_identity("user", "99"));
}

#[rstest]
#[tokio::test]
async fn find_by_profile_returns_exact_matches_in_identifier_order(store: InMemoryUserStore) {
    seed(
        &store,
        vec![
            user("carol", "c@x.com", 2),
            user("alice", "a@x.com", 1),
            user("bob", "b@x.com", 2),
        ],
    )
    .await;

    let admins = store
        .find_by_profile(Profile::new(2))
        .await
        .expect("lookup succeeds");
    let names: Vec<&str> = admins.iter().map(|u| u.user_name().as_str()).collect();
    assert_eq!(names, vec!["carol", "bob"]);
    assert!(admins.windows(2).all(|pair| pair[0].id() < pair[1].id()));

    let nobody = store
        .find_by_profile(Profile::new(7))
        .await
        .expect("lookup succeeds");
    assert!(nobody.is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_is_idempotent(store: InMemoryUserStore) {
    let saved = store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");
    let id = saved.id().expect("identifier assigned");

    store.delete_by_id(id).await.expect("first delete");
    store.delete_by_id(id).await.expect("second delete");
    store
        .delete_by_id(UserId::new(12_345).expect("valid id"))
        .await
        .expect("unknown delete");

    assert!(!store.exists_by_id(id).await.expect("exists"));
    assert_eq!(store.count().await.expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn identifiers_are_not_reused_after_delete(store: InMemoryUserStore) {
    let first = store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");
    let first_id = first.id().expect("identifier assigned");
    store.delete_by_id(first_id).await.expect("delete");

    let second = store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save again");
    assert!(second.id().expect("identifier assigned") > first_id);
}

#[rstest]
#[tokio::test]
async fn find_all_by_id_skips_unknown_and_collapses_duplicates(store: InMemoryUserStore) {
    let saved = seed(
        &store,
        vec![
            user("alice", "a@x.com", 1),
            user("bob", "b@x.com", 1),
            user("carol", "c@x.com", 1),
        ],
    )
    .await;
    let ids: Vec<UserId> = saved.iter().filter_map(User::id).collect();

    let unknown = UserId::new(1_000).expect("valid id");
    let found = store
        .find_all_by_id(&[ids[2], unknown, ids[0], ids[2]])
        .await
        .expect("lookup succeeds");

    let found_ids: Vec<UserId> = found.iter().filter_map(User::id).collect();
    assert_eq!(found_ids, vec![ids[0], ids[2]]);
}

#[rstest]
#[tokio::test]
async fn find_page_slices_identifier_order(store: InMemoryUserStore) {
    seed(
        &store,
        (1..=5)
            .map(|n| user(&format!("user{n}"), &format!("u{n}@x.com"), 1))
            .collect(),
    )
    .await;

    let second = store
        .find_page(PageRequest::new(1, 2).expect("valid request"))
        .await
        .expect("page loads");
    let names: Vec<&str> = second
        .items()
        .iter()
        .map(|u| u.user_name().as_str())
        .collect();
    assert_eq!(names, vec!["user3", "user4"]);
    assert_eq!(second.total(), 5);
    assert_eq!(second.total_pages(), 3);
    assert!(second.has_next());

    let past_end = store
        .find_page(PageRequest::new(10, 2).expect("valid request"))
        .await
        .expect("page loads");
    assert!(past_end.items().is_empty());
    assert_eq!(past_end.total(), 5);
}

#[rstest]
#[tokio::test]
async fn clones_share_the_same_table(store: InMemoryUserStore) {
    let other = store.clone();
    store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    assert_eq!(other.count().await.expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn save_all_returns_batch_in_input_order(store: InMemoryUserStore) {
    let existing = store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let saved = store
        .save_all(vec![
            user("bob", "b@x.com", 2),
            existing.clone().with_profile(Profile::new(3)),
            user("carol", "c@x.com", 2),
        ])
        .await
        .expect("batch saves");

    let names: Vec<&str> = saved.iter().map(|u| u.user_name().as_str()).collect();
    assert_eq!(names, vec!["bob", "alice", "carol"]);
    assert_eq!(saved.get(1).and_then(User::id), existing.id());
    assert_eq!(store.count().await.expect("count"), 3);
}

#[rstest]
#[case::collides_with_stored(vec![user("bob", "b@x.com", 1), user("alice", "other@x.com", 1)])]
#[case::collides_within_batch(vec![user("bob", "b@x.com", 1), user("carol", "b@x.com", 1)])]
#[tokio::test]
async fn failed_batch_writes_nothing(store: InMemoryUserStore, #[case] batch: Vec<User>) {
    store
        .save(user("alice", "a@x.com", 1))
        .await
        .expect("save alice");

    let err = store.save_all(batch).await.expect_err("batch collides");
    assert!(err.is_constraint_violation());

    let bob = UserName::new("bob").expect("valid name");
    assert!(store.find_by_user_name(&bob).await.expect("lookup").is_none());
    assert_eq!(store.count().await.expect("count"), 1);

    let next = store
        .save(user("dave", "d@x.com", 1))
        .await
        .expect("save dave");
    assert_eq!(next.id().map(UserId::get), Some(2));
}

#[rstest]
#[tokio::test]
async fn save_all_of_nothing_is_empty(store: InMemoryUserStore) {
    assert!(store.save_all(Vec::new()).await.expect("empty batch").is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_all_by_id_ignores_missing_identifiers(store: InMemoryUserStore) {
    let saved = seed(
        &store,
        vec![
            user("alice", "a@x.com", 1),
            user("bob", "b@x.com", 1),
            user("carol", "c@x.com", 1),
        ],
    )
    .await;
    let ids: Vec<UserId> = saved.iter().filter_map(User::id).collect();
    let unknown = UserId::new(99).expect("valid id");
    let doomed = [ids[0], unknown, ids[2]];

    store.delete_all_by_id(&doomed).await.expect("delete batch");
    store.delete_all_by_id(&doomed).await.expect("repeat delete");
    store.delete_all_by_id(&[]).await.expect("empty delete");

    let remaining = store.find_all().await.expect("find all");
    assert_eq!(remaining.iter().filter_map(User::id).collect::<Vec<_>>(), vec![ids[1]]);
}
