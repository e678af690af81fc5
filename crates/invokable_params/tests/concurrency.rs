//! Concurrent resolution tests for `invokable_params`.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use invokable_params::prelude::*;

struct Database {
    name: String,
}

const THREADS: usize = 8;

/// Test that one resolver and one descriptor list serve many threads, each
/// with its own pool.
#[test]
fn shared_resolver_with_per_thread_pools() {
    let container = ServiceContainer::new().with(Database {
        name: "primary".into(),
    });
    let resolver = Arc::new(ParamsResolver::new(Arc::new(container)));
    let descriptors: Arc<[ParameterDescriptor]> = Arc::from(vec![
        ParameterDescriptor::new("db", 0, DeclaredKind::Object(TypeKey::of::<Database>())),
        ParameterDescriptor::new("id", 1, DeclaredKind::Int),
    ]);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            let descriptors = Arc::clone(&descriptors);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..100 {
                    let id = i64::try_from(i * 1000 + round).unwrap();
                    let pool = ResolutionPool::from_attributes([("id", Value::from(id.to_string()))]);
                    let args = resolver.resolve(&descriptors, &pool).unwrap();

                    let db = args.get(0).and_then(Value::downcast::<Database>).unwrap();
                    assert_eq!(db.name, "primary");
                    assert_eq!(args.get(1), Some(&Value::Int(id)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

/// Test that a lazy service is built once under a first-access race.
#[test]
fn lazy_service_built_once_under_contention() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);

    let mut container = ServiceContainer::new();
    container.register_lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Database {
            name: "lazy".into(),
        })
    });
    let resolver = Arc::new(ParamsResolver::new(Arc::new(container)));
    let descriptors = [ParameterDescriptor::new(
        "db",
        0,
        DeclaredKind::Object(TypeKey::of::<Database>()),
    )];
    let descriptors: Arc<[ParameterDescriptor]> = Arc::from(descriptors);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let descriptors = Arc::clone(&descriptors);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let args = resolver
                    .resolve(&descriptors, &ResolutionPool::new())
                    .unwrap();
                args.get(0).and_then(Value::downcast::<Database>).unwrap()
            })
        })
        .collect();

    let services: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(services.iter().all(|db| Arc::ptr_eq(db, &services[0])));
    assert_eq!(services[0].name, "lazy");
}
