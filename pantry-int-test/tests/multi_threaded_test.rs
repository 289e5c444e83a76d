use pantry::common::Value;
use pantry::doc;
use pantry_int_test::test_util::{cleanup, create_test_context, run_test};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_multi_threaded_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let num_threads = 8;
            let inserts_per_thread = 25;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for thread_id in 0..num_threads {
                let db = db.clone();
                let barrier = Arc::clone(&barrier);

                handles.push(thread::spawn(move || {
                    barrier.wait();
                    let mut ids = vec![];
                    for i in 0..inserts_per_thread {
                        let id = db
                            .insert("orders", doc! { thread: (thread_id as i64), seq: (i as i64) })
                            .expect("insert");
                        ids.push(id.to_string());
                    }
                    ids
                }));
            }

            let mut ids = HashSet::new();
            for handle in handles {
                for id in handle.join().expect("thread") {
                    assert!(ids.insert(id), "duplicate id");
                }
            }

            let total = num_threads * inserts_per_thread;
            assert_eq!(ids.len(), total);
            assert_eq!(db.count("orders")?, total);
            for id in &ids {
                assert!(db.find_by_id("orders", id)?.is_some());
            }

            let reopened = ctx.reopen()?;
            assert_eq!(reopened.count("orders")?, total);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_inserts_across_collections_share_ids() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let collections = ["orders", "customers", "cart_items", "reviews"];
            let barrier = Arc::new(Barrier::new(collections.len()));

            let handles: Vec<_> = collections
                .iter()
                .map(|name| {
                    let db = db.clone();
                    let barrier = Arc::clone(&barrier);
                    let name = name.to_string();
                    thread::spawn(move || {
                        barrier.wait();
                        (0..20)
                            .map(|_| db.insert(&name, doc! { n: 1 }).expect("insert").to_string())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut ids = HashSet::new();
            for handle in handles {
                for id in handle.join().expect("thread") {
                    assert!(ids.insert(id), "id reused across collections");
                }
            }
            assert_eq!(ids.len(), 80);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_reads_during_writes() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            let id = db.insert("counters", doc! { value: 0 })?;
            let barrier = Arc::new(Barrier::new(2));

            let writer = {
                let db = db.clone();
                let id = id.to_string();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for value in 1..=50 {
                        db.update("counters", &id, doc! { value: value }).expect("update");
                    }
                })
            };

            let reader = {
                let db = db.clone();
                let id = id.to_string();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut last = 0;
                    for _ in 0..200 {
                        let doc = db.find_by_id("counters", &id).expect("read").expect("doc");
                        let value = doc.get("value").and_then(Value::as_i64).expect("value");
                        // a reader never sees the value go backwards
                        assert!(value >= last);
                        last = value;
                        let _ = db.find_all("counters").expect("find_all");
                    }
                })
            };

            writer.join().expect("writer");
            reader.join().expect("reader");

            let doc = db.find_by_id("counters", &id)?.expect("doc");
            assert_eq!(doc.get("value"), Some(&Value::I64(50)));
            Ok(())
        },
        cleanup,
    )
}
