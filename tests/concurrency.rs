//! Concurrent use of a shared engine.
//!
//! Engine calls are blocking, so each task runs them on the blocking pool.

use std::sync::Arc;
use waypoint::builder::{ActionBuilder, DefinitionBuilder, StateBuilder};
use waypoint::{DefinitionSpec, Engine};

fn counter(name: &str) -> DefinitionSpec {
    DefinitionBuilder::new(name)
        .state(StateBuilder::new("idle", "Idle").initial())
        .state(StateBuilder::new("busy", "Busy"))
        .state(StateBuilder::new("done", "Done").terminal())
        .action(ActionBuilder::new("start", "Start").from("idle").to("busy"))
        .action(ActionBuilder::new("pause", "Pause").from("busy").to("idle"))
        .action(ActionBuilder::new("finish", "Finish").from("busy").to("done"))
        .build()
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_name_creates_have_a_single_winner() {
    let engine = Arc::new(Engine::in_memory());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let name = if i % 2 == 0 { "Counter" } else { "COUNTER" };
            tokio::task::spawn_blocking(move || engine.create_definition(counter(name)))
        })
        .collect();

    let mut wins = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(err) => {
                assert!(err.messages()[0].contains("already exists"));
                duplicates += 1;
            }
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(engine.list_definitions().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_actions_never_lose_history() {
    let engine = Arc::new(Engine::in_memory());
    let def = engine.create_definition(counter("Counter")).unwrap();
    let instance = engine.start_instance(&def.id).unwrap();
    let instance_id = instance.id().to_string();

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let instance_id = instance_id.clone();
            let action = if i % 2 == 0 { "start" } else { "pause" };
            tokio::task::spawn_blocking(move || engine.execute_action(&instance_id, action))
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    let stored = engine.get_instance(&instance_id).unwrap();
    assert_eq!(stored.history().len(), successes);
    for pair in stored.history().windows(2) {
        assert_eq!(pair[0].to_state_id, pair[1].from_state_id);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_instances_progress_in_parallel() {
    let engine = Arc::new(Engine::in_memory());
    let def = engine.create_definition(counter("Counter")).unwrap();

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let def_id = def.id.clone();
            tokio::task::spawn_blocking(move || {
                let instance = engine.start_instance(&def_id)?;
                engine.execute_action(instance.id(), "start")?;
                engine.execute_action(instance.id(), "finish")
            })
        })
        .collect();

    for handle in handles {
        let finished = handle.await.unwrap().unwrap();
        assert_eq!(finished.current_state_id(), "done");
        assert_eq!(finished.history().len(), 2);
    }

    assert_eq!(engine.list_instances().unwrap().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_see_whole_instances_during_writes() {
    let engine = Arc::new(Engine::in_memory());
    let def = engine.create_definition(counter("Counter")).unwrap();
    let instance = engine.start_instance(&def.id).unwrap();
    let instance_id = instance.id().to_string();

    let writer = {
        let engine = Arc::clone(&engine);
        let instance_id = instance_id.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..50 {
                let action = if i % 2 == 0 { "start" } else { "pause" };
                engine.execute_action(&instance_id, action).unwrap();
            }
        })
    };
    let reader = {
        let engine = Arc::clone(&engine);
        let instance_id = instance_id.clone();
        tokio::task::spawn_blocking(move || {
            for _ in 0..200 {
                let view = engine.get_instance_view(&instance_id).unwrap();
                let expected = match view.history.last() {
                    Some(entry) => entry.to_state_id.clone(),
                    None => "idle".to_string(),
                };
                assert_eq!(view.current_state_id, expected);
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
}
