//! Property tests for pool ownership invariants.

use std::collections::HashSet;

use lumen_core::{DeferredPool, ObjectPool, PoolHandle, Recyclable};
use proptest::prelude::*;

#[derive(Default)]
struct Token {
    owner: Option<usize>,
}

impl Recyclable for Token {
    fn on_recycle(&mut self) {
        self.owner = None;
    }
}

#[derive(Clone, Debug)]
enum Op {
    Acquire,
    Release(usize),
    DoubleRelease(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Acquire),
        2 => any::<usize>().prop_map(Op::Release),
        1 => any::<usize>().prop_map(Op::DoubleRelease),
    ]
}

fn assert_partitioned(pool: &ObjectPool<Token>, live: &[PoolHandle], released: &[PoolHandle]) {
    assert_eq!(pool.in_use_count(), live.len());
    assert_eq!(pool.in_use_count() + pool.free_count(), pool.capacity());

    let distinct: HashSet<usize> = live.iter().map(|h| h.index()).collect();
    assert_eq!(distinct.len(), live.len(), "two live handles share an object");

    for handle in live {
        assert!(pool.is_live(*handle));
    }
    for handle in released {
        assert!(!pool.is_live(*handle), "released handle still reachable");
    }
}

proptest! {
    #[test]
    fn pool_live_count_matches_unmatched_acquires(ops in proptest::collection::vec(op(), 0..200)) {
        let mut pool: ObjectPool<Token> = ObjectPool::new();
        let mut live: Vec<PoolHandle> = Vec::new();
        let mut released: Vec<PoolHandle> = Vec::new();

        for (step, op) in ops.into_iter().enumerate() {
            match op {
                Op::Acquire => {
                    let handle = pool.acquire().unwrap();
                    let token = pool.get_mut(handle).unwrap();
                    prop_assert!(token.owner.is_none(), "acquired object was not reset");
                    token.owner = Some(step);
                    live.push(handle);
                }
                Op::Release(pick) => {
                    if !live.is_empty() {
                        let handle = live.swap_remove(pick % live.len());
                        pool.release(handle).unwrap();
                        released.push(handle);
                    }
                }
                Op::DoubleRelease(pick) => {
                    if !released.is_empty() {
                        let handle = released[pick % released.len()];
                        prop_assert!(pool.release(handle).is_err());
                    }
                }
            }
            assert_partitioned(&pool, &live, &released);
        }
    }

    #[test]
    fn deferred_pool_reclaims_everything_released(batches in proptest::collection::vec(0usize..16, 1..20)) {
        let mut pool: DeferredPool<Token> = DeferredPool::new();

        for batch in batches {
            let handles: Vec<_> = (0..batch).map(|_| pool.obtain().unwrap()).collect();
            for handle in &handles {
                pool.release(*handle).unwrap();
            }
            prop_assert_eq!(pool.pending_count(), batch);
            prop_assert_eq!(pool.advance(0.016), batch);
            prop_assert_eq!(pool.pool().in_use_count(), 0);
            prop_assert_eq!(pool.pool().pending_count(), 0);
            prop_assert_eq!(pool.pool().free_count(), pool.pool().capacity());
        }
    }
}
