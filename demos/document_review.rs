//! Walk a document through draft, review and approval.
//!
//! Run with `RUST_LOG=waypoint=debug cargo run --example document_review`
//! to see the engine's structured logs.

use waypoint::builder::{ActionBuilder, DefinitionBuilder, StateBuilder};
use waypoint::store::MemoryStore;
use waypoint::telemetry::init_tracing;
use waypoint::{Engine, EngineConfig};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing(false)?;

    let config = EngineConfig::from_toml_str(
        r#"
        revalidate_on_start = true
        snapshot_format = "json"
        "#,
    )?;
    let engine: Engine = Engine::new(MemoryStore::new(), MemoryStore::new(), config);

    let spec = DefinitionBuilder::new("Document Review")
        .describe("Draft, review and approve a document")
        .state(StateBuilder::new("draft", "Draft").initial())
        .state(StateBuilder::new("review", "In Review"))
        .state(StateBuilder::new("approved", "Approved").terminal())
        .state(StateBuilder::new("archived", "Archived").describe("never reached"))
        .action(ActionBuilder::new("submit", "Submit").from("draft").to("review"))
        .action(ActionBuilder::new("reject", "Reject").from("review").to("draft"))
        .action(ActionBuilder::new("approve", "Approve").from("review").to("approved"))
        .build()?;

    let definition = engine.create_definition(spec)?;
    println!("created definition {} ({})", definition.name, definition.id);

    let instance = engine.start_instance(&definition.id)?;
    for action in ["submit", "reject", "submit", "approve"] {
        let next = engine.execute_action(instance.id(), action)?;
        println!("{action:>8} -> {}", next.current_state_id());
    }

    match engine.execute_action(instance.id(), "submit") {
        Ok(_) => println!("unexpected: approved document was resubmitted"),
        Err(err) => println!("resubmit refused: {err}"),
    }

    let view = engine.get_instance_view(instance.id())?;
    println!("\n{} is {}", view.definition_name, view.current_state_name);
    for entry in &view.history {
        println!(
            "  {} : {} -> {}",
            entry.action_name, entry.from_state_name, entry.to_state_name
        );
    }

    let exported = engine.export()?;
    println!("\nsnapshot is {} bytes", exported.len());

    Ok(())
}
