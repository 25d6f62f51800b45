//! Property tests: ranks stay exactly 1..=N under any sequence of
//! inserts, moves and deletes, and the order matches a plain `Vec` model.


use favorites_core::{CreateFavorite, FavoritesStore, UpdateFavorite};
use proptest::prelude::*;
use test_helpers::*;

#[derive(Debug, Clone)]
enum Op {
    /// Insert at a rank picked from `1..=N + 1`
    Insert(usize),
    /// Move the favorite at one position to another position
    Move(usize, usize),
    /// Delete the favorite at a position
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<usize>().prop_map(Op::Insert),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Op::Move(from, to)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

async fn run_ops(ops: Vec<Op>) {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let mut model: Vec<String> = Vec::new();

    for (step, op) in ops.into_iter().enumerate() {
        match op {
            Op::Insert(seed) => {
                let index = seed % (model.len() + 1);
                let title = format!("T{step}");
                store
                    .insert(CreateFavorite::new(index as i64 + 1, title.clone(), "Artist"))
                    .await
                    .expect("insert failed");
                model.insert(index, title);
            }
            Op::Move(from, to) if !model.is_empty() => {
                let from = from % model.len();
                let to = to % model.len();
                let favorites = store.list_by_rank().await.unwrap();
                store
                    .update(favorites[from].id, UpdateFavorite::move_to(to as i64 + 1))
                    .await
                    .expect("move failed")
                    .expect("favorite vanished");
                let title = model.remove(from);
                model.insert(to, title);
            }
            Op::Delete(at) if !model.is_empty() => {
                let at = at % model.len();
                let favorites = store.list_by_rank().await.unwrap();
                assert!(store.delete(favorites[at].id).await.expect("delete failed"));
                model.remove(at);
            }
            Op::Move(..) | Op::Delete(_) => {}
        }

        assert_dense(store).await;
    }

    assert_eq!(titles_by_rank(store).await, model);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn ranks_stay_dense_under_random_operations(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(run_ops(ops));
    }
}
