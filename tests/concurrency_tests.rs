use rand::Rng;
use rcumap::{RcuMap, RcuMapBuilder};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_sets() {
    let map = Arc::new(RcuMap::new());
    let mut handles = vec![];

    // Spawn 10 threads, each setting 100 items
    for thread_id in 0..10 {
        let map = Arc::clone(&map);
        let handle = thread::spawn(move || {
            for i in 0..100 {
                let key = format!("thread_{}_key_{}", thread_id, i);
                map.set(key, i);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // No write is lost even though each one replaces a whole snapshot
    assert_eq!(map.len(), 1000);
    assert_eq!(map.size(), 1000);
}

#[test]
fn test_concurrent_reads() {
    let map = Arc::new(RcuMap::new());

    for i in 0..100 {
        map.set(format!("key_{}", i), i);
    }

    let mut handles = vec![];

    // Spawn 20 threads, each reading all items
    for _ in 0..20 {
        let map = Arc::clone(&map);
        let handle = thread::spawn(move || {
            for i in 0..100 {
                let key = format!("key_{}", i);
                let value = map.get(&key).unwrap();
                assert_eq!(*value, i);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_updates() {
    let map = Arc::new(RcuMap::new());
    map.set("counter".to_string(), 0);

    let mut handles = vec![];

    // Spawn 10 threads, each incrementing the counter 100 times
    for _ in 0..10 {
        let map = Arc::clone(&map);
        let handle = thread::spawn(move || {
            for _ in 0..100 {
                map.update(&"counter".to_string(), |v| *v += 1);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Updates to one shard are serialized by its write lock
    assert_eq!(*map.get(&"counter".to_string()).unwrap(), 1000);
}

#[test]
fn test_concurrent_random_operations() {
    let map = Arc::new(RcuMap::<u32, (u32, u32)>::new());
    let mut handles = vec![];
    const NUM_OPS: u32 = 1000;

    // Writers
    for _ in 0..5 {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for j in 0..NUM_OPS {
                let k = rng.gen_range(0..100);
                if rng.gen_bool(0.5) {
                    map.set(k, (k, j));
                } else {
                    map.delete(&k);
                }
            }
        }));
    }

    // Readers
    for _ in 0..20 {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..NUM_OPS {
                let k = rng.gen_range(0..100);
                if let Some(value) = map.get(&k) {
                    assert_eq!(value.0, k);
                    assert!(value.1 < NUM_OPS);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(map.len() <= 100);
}

#[test]
fn test_readers_never_see_partial_snapshot() {
    // One shard: every snapshot the writer publishes holds exactly the keys
    // 0..n for some n. Any other key set means a torn snapshot was observed.
    let map = Arc::new(
        RcuMapBuilder::new()
            .shard_count(1)
            .unwrap()
            .build::<u32, u32>()
            .unwrap(),
    );
    let done = Arc::new(AtomicBool::new(false));
    const KEYS: u32 = 400;

    let writer = {
        let map = Arc::clone(&map);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..KEYS {
                map.set(i, i);
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut readers = vec![];
    for _ in 0..4 {
        let map = Arc::clone(&map);
        let done = Arc::clone(&done);
        readers.push(thread::spawn(move || {
            let mut last_seen = 0;
            loop {
                let finished = done.load(Ordering::Acquire);
                let keys: HashSet<u32> = map
                    .iter()
                    .map(|(k, v)| {
                        assert_eq!(k, *v);
                        k
                    })
                    .collect();
                let n = keys.len() as u32;
                assert!((0..n).all(|k| keys.contains(&k)));
                assert!(n >= last_seen, "snapshot went backwards");
                last_seen = n;
                if finished {
                    assert_eq!(n, KEYS);
                    break;
                }
            }
        }));
    }

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_writers_on_different_shards_do_not_interfere() {
    let map = Arc::new(
        RcuMapBuilder::new()
            .shard_count(8)
            .unwrap()
            .seed(7)
            .build::<u64, u64>()
            .unwrap(),
    );

    // Find one key per shard so each writer owns a distinct shard
    let mut owners = vec![None; map.shard_count()];
    let mut candidate = 0u64;
    while owners.iter().any(Option::is_none) {
        let idx = map.shard_index(&candidate);
        if owners[idx].is_none() {
            owners[idx] = Some(candidate);
        }
        candidate += 1;
    }

    let mut handles = vec![];
    for key in owners.into_iter().flatten() {
        let map = Arc::clone(&map);
        handles.push(thread::spawn(move || {
            for n in 0..500 {
                map.set(key, n);
                assert_eq!(*map.get(&key).unwrap(), n);
            }
            key
        }));
    }

    for handle in handles {
        let key = handle.join().unwrap();
        assert_eq!(*map.get(&key).unwrap(), 499);
    }
}
