//! Concurrent register/unregister/resolve on a shared resolver.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_registration_keeps_one_entry_per_name() {
    let resolver = Arc::new(production_resolver());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for n in 0..50 {
                    resolver.register(BackwardsCompatibilityEntitlement::new(
                        format!("ent-{}", n % 10),
                        [format!("{}", i)],
                    ));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let registered = resolver.registered();
    assert_eq!(registered.len(), 10);

    let mut names: Vec<_> = registered.iter().map(|e| e.entitlement_name.clone()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 10);
}

#[test]
fn test_resolve_during_churn_never_panics() {
    let resolver = Arc::new(production_resolver());
    resolver.register(premium_rule());

    let writer = {
        let resolver = Arc::clone(&resolver);
        thread::spawn(move || {
            for _ in 0..200 {
                resolver.unregister("pro");
                resolver.register(BackwardsCompatibilityEntitlement::new("pro", ["50"]));
            }
        })
    };

    let reader = {
        let resolver = Arc::clone(&resolver);
        thread::spawn(move || {
            let info = customer(Some("50"), None);
            for _ in 0..200 {
                // "premium" is never touched by the writer
                assert!(resolver.resolve(&info, "premium"));
                let _ = resolver.resolve(&info, "pro");
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert!(resolver.resolve(&customer(Some("50"), None), "pro"));
}
