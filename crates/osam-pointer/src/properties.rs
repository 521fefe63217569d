//! Model-based properties for both pointer schemes.
//!
//! A workload of random create/copy/delete/put/get operations runs against a
//! pointer manager and against a plain model (groups of aliases plus the
//! content they should see). Every `get` must agree with the model, and
//! every `delete` must report `Drained` exactly when it removes the last
//! alias of a group.

use proptest::prelude::*;

use osam_store::{InMemoryBlockStore, StoreConfig};
use osam_types::Content;

use crate::{
    BalancedSmartPointer, DeleteOutcome, NoopTracer, PointerConfig, PointerScheme, Ptr,
    RecordingTracer, SmartPointer,
};

#[derive(Clone, Debug)]
enum Op {
    Create(u8),
    Copy(usize, usize),
    Delete(usize, usize),
    Put(usize, usize, u8),
    Get(usize, usize),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        10 => any::<u8>().prop_map(Op::Create),
        35 => (any::<usize>(), any::<usize>()).prop_map(|(g, p)| Op::Copy(g, p)),
        25 => (any::<usize>(), any::<usize>()).prop_map(|(g, p)| Op::Delete(g, p)),
        10 => (any::<usize>(), any::<usize>(), any::<u8>()).prop_map(|(g, p, v)| Op::Put(g, p, v)),
        20 => (any::<usize>(), any::<usize>()).prop_map(|(g, p)| Op::Get(g, p)),
    ];
    prop::collection::vec(op, 1..=120)
}

fn store(seed: u64) -> InMemoryBlockStore {
    InMemoryBlockStore::new(StoreConfig::seeded(seed)).unwrap()
}

fn sp(seed: u64) -> SmartPointer<InMemoryBlockStore> {
    SmartPointer::with_tracer(store(seed), PointerConfig::default(), Box::new(NoopTracer))
}

fn bsp(seed: u64) -> BalancedSmartPointer<InMemoryBlockStore> {
    BalancedSmartPointer::with_tracer(store(seed), PointerConfig::default(), Box::new(NoopTracer))
}

fn content(v: u8) -> Content {
    Content::from(format!("v{v}"))
}

/// Aliases of one object and the content they should all see.
struct Group {
    ptrs: Vec<Ptr>,
    value: Content,
}

fn run_workload<P: PointerScheme>(pm: &mut P, ops: &[Op]) -> Result<Vec<Group>, TestCaseError> {
    let mut groups: Vec<Group> = Vec::new();
    for op in ops {
        if groups.is_empty() && !matches!(op, Op::Create(_)) {
            continue;
        }
        match *op {
            Op::Create(v) => {
                let ptr = pm.create(content(v)).unwrap();
                groups.push(Group {
                    ptrs: vec![ptr],
                    value: content(v),
                });
            }
            Op::Copy(g, p) => {
                let n = groups.len();
                let group = &mut groups[g % n];
                let i = p % group.ptrs.len();
                let copy = pm.copy(&mut group.ptrs[i]).unwrap();
                group.ptrs.push(copy);
            }
            Op::Delete(g, p) => {
                let gi = g % groups.len();
                let group = &mut groups[gi];
                let mut gone = group.ptrs.remove(p % group.ptrs.len());
                let outcome = pm.delete(&mut gone).unwrap();
                prop_assert!(gone.is_null());
                if group.ptrs.is_empty() {
                    prop_assert_eq!(
                        outcome,
                        DeleteOutcome::Drained {
                            content: Some(group.value.clone())
                        }
                    );
                    groups.remove(gi);
                } else {
                    prop_assert_eq!(outcome, DeleteOutcome::Detached);
                }
            }
            Op::Put(g, p, v) => {
                let n = groups.len();
                let group = &mut groups[g % n];
                let i = p % group.ptrs.len();
                pm.put(&mut group.ptrs[i], content(v)).unwrap();
                group.value = content(v);
            }
            Op::Get(g, p) => {
                let n = groups.len();
                let group = &mut groups[g % n];
                let i = p % group.ptrs.len();
                let got = pm.get(&mut group.ptrs[i]).unwrap();
                prop_assert_eq!(got, Some(group.value.clone()));
            }
        }
    }

    // Every surviving alias still sees its group's content.
    for group in &mut groups {
        for ptr in &mut group.ptrs {
            prop_assert_eq!(pm.get(ptr).unwrap(), Some(group.value.clone()));
        }
    }
    Ok(groups)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_get_after_new(seed in any::<u64>(), v in any::<u8>()) {
        let mut sp = sp(seed);
        let mut bsp = bsp(seed);
        let mut a = sp.create(content(v)).unwrap();
        let mut b = bsp.create(content(v)).unwrap();
        prop_assert_eq!(sp.get(&mut a).unwrap(), Some(content(v)));
        prop_assert_eq!(bsp.get(&mut b).unwrap(), Some(content(v)));
    }

    #[test]
    fn prop_put_is_visible_through_every_alias(
        seed in any::<u64>(),
        copies in 1usize..12,
        writer in any::<usize>(),
    ) {
        let mut bsp = bsp(seed);
        let mut ptrs = vec![bsp.create(content(0)).unwrap()];
        for i in 0..copies {
            let n = ptrs.len();
            let copy = bsp.copy(&mut ptrs[i % n]).unwrap();
            ptrs.push(copy);
        }
        let w = writer % ptrs.len();
        bsp.put(&mut ptrs[w], content(1)).unwrap();
        for p in &mut ptrs {
            prop_assert_eq!(bsp.get(p).unwrap(), Some(content(1)));
        }
    }

    #[test]
    fn prop_copy_then_delete_leaves_original(seed in any::<u64>(), rounds in 1usize..8) {
        let mut sp = sp(seed);
        let mut bsp = bsp(seed);
        let mut a = sp.create(content(7)).unwrap();
        let mut b = bsp.create(content(7)).unwrap();
        for _ in 0..rounds {
            let mut ca = sp.copy(&mut a).unwrap();
            let mut cb = bsp.copy(&mut b).unwrap();
            prop_assert_eq!(sp.delete(&mut ca).unwrap(), DeleteOutcome::Detached);
            prop_assert_eq!(bsp.delete(&mut cb).unwrap(), DeleteOutcome::Detached);
        }
        prop_assert_eq!(sp.get(&mut a).unwrap(), Some(content(7)));
        prop_assert_eq!(bsp.count(&mut b).unwrap(), 1);
        prop_assert!(sp.delete(&mut a).unwrap().is_drained());
        prop_assert!(bsp.delete(&mut b).unwrap().is_drained());
    }

    #[test]
    fn prop_smart_pointer_matches_model(seed in any::<u64>(), ops in ops_strategy()) {
        let mut sp = sp(seed);
        run_workload(&mut sp, &ops)?;
    }

    #[test]
    fn prop_balanced_pointer_matches_model(seed in any::<u64>(), ops in ops_strategy()) {
        let mut bsp = bsp(seed);
        let mut groups = run_workload(&mut bsp, &ops)?;
        for group in &mut groups {
            let live = group.ptrs.len() as u64;
            for ptr in &mut group.ptrs {
                prop_assert_eq!(bsp.count(ptr).unwrap(), live);
            }
        }
    }

    #[test]
    fn prop_balanced_depth_is_logarithmic(seed in any::<u64>(), ops in ops_strategy()) {
        let tracer = RecordingTracer::new();
        let mut bsp = BalancedSmartPointer::with_tracer(
            store(seed),
            PointerConfig::traced(),
            Box::new(tracer.clone()),
        );
        let mut groups = run_workload(&mut bsp, &ops)?;
        for group in &mut groups {
            let n = group.ptrs.len() as u64;
            let log2 = if n <= 1 { 0 } else { u64::from(64 - (n - 1).leading_zeros()) };
            let bound = log2 + 1;
            for ptr in &mut group.ptrs {
                tracer.clear();
                bsp.get(ptr).unwrap();
                let edges = tracer.fetched() as u64 - 1;
                prop_assert!(edges <= bound, "{} edges with {} aliases", edges, n);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_single_object_churn(
        seed in any::<u64>(),
        steps in prop::collection::vec((any::<bool>(), any::<usize>()), 1..=150),
    ) {
        let tracer = RecordingTracer::new();
        let mut bsp = BalancedSmartPointer::with_tracer(
            store(seed),
            PointerConfig::traced(),
            Box::new(tracer.clone()),
        );
        let mut ptrs = vec![bsp.create(content(3)).unwrap()];
        for (grow, pick) in steps {
            let n = ptrs.len();
            let i = pick % n;
            if grow || n == 1 {
                let copy = bsp.copy(&mut ptrs[i]).unwrap();
                ptrs.push(copy);
            } else {
                let mut gone = ptrs.swap_remove(i);
                prop_assert_eq!(bsp.delete(&mut gone).unwrap(), DeleteOutcome::Detached);
            }

            let n = ptrs.len();
            let j = pick % n;
            let bound = u64::from(64 - (n as u64 - 1).leading_zeros()) + 1;
            tracer.clear();
            prop_assert_eq!(bsp.get(&mut ptrs[j]).unwrap(), Some(content(3)));
            prop_assert!(tracer.fetched() as u64 - 1 <= bound);
            prop_assert_eq!(bsp.count(&mut ptrs[j]).unwrap(), n as u64);
        }

        while let Some(mut p) = ptrs.pop() {
            let outcome = bsp.delete(&mut p).unwrap();
            prop_assert_eq!(outcome.is_drained(), ptrs.is_empty());
        }
    }
}

#[test]
fn workload_with_logging_enabled() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let mut bsp = BalancedSmartPointer::new(store(3), PointerConfig::traced());
    let ops = [
        Op::Create(1),
        Op::Copy(0, 0),
        Op::Copy(0, 1),
        Op::Put(0, 2, 9),
        Op::Get(0, 0),
        Op::Delete(0, 1),
        Op::Get(0, 1),
    ];
    run_workload(&mut bsp, &ops).unwrap();
}
