// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for concurrent hydration over one shared registry

use octofhir_resource_graph::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

mod utils;
use utils::{standard_binder, vision_prescription};

const THREADS: usize = 8;
const DOCUMENTS_PER_THREAD: usize = 50;

#[test]
fn test_parallel_hydration_matches_sequential() {
    let binder = standard_binder();
    let expected: Vec<_> = (0..DOCUMENTS_PER_THREAD)
        .map(|id| binder.hydrate_document(&vision_prescription(id)).unwrap())
        .collect();

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for (id, expected) in expected.iter().enumerate() {
                    let instance = binder.hydrate_document(&vision_prescription(id)).unwrap();
                    assert_eq!(&instance, expected);
                }
            });
        }
    });
}

#[test]
fn test_failures_do_not_leak_between_threads() {
    let binder = Arc::new(standard_binder());
    let failures = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let binder = Arc::clone(&binder);
            let failures = Arc::clone(&failures);
            thread::spawn(move || {
                for id in 0..DOCUMENTS_PER_THREAD {
                    let document = if (thread_id + id) % 5 == 0 {
                        json!({"resourceType": "VisionPrescription", "dispense": [{"eye": "centre"}]})
                    } else {
                        vision_prescription(id)
                    };
                    if binder.hydrate_document(&document).is_err() {
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = (0..THREADS)
        .flat_map(|thread_id| (0..DOCUMENTS_PER_THREAD).map(move |id| (thread_id + id) % 5 == 0))
        .filter(|failing| *failing)
        .count();
    assert_eq!(failures.load(Ordering::Relaxed), expected);
}

#[test]
fn test_standard_registry_initialises_once_across_threads() {
    let registries: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| standard_registry().unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for registry in &registries[1..] {
        assert!(Arc::ptr_eq(&registries[0], registry));
    }
}
