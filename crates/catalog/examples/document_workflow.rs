//! Document Workflow: State Machines
//!
//! Run with: cargo run -p behavior-catalog --example document_workflow
//!
//! The transition table decides what `edit` and `publish` do in each state.
//! Refusals come back as ordinary outcomes the caller branches on.

use std::sync::Arc;

use behavior_catalog::document::{document_table, Document, DocumentOutcome};
use behavior_catalog::CatalogError;
use behavior_core::{LoggingObserver, Outcome};
use tracing_subscriber::EnvFilter;

fn report(step: &str, outcome: DocumentOutcome) {
    match outcome {
        Outcome::Applied(t) => println!("  {step:<22} {} -> {} ({})", t.from, t.to, t.effect),
        Outcome::Rejected(r) => println!("  {step:<22} refused: {r}"),
    }
}

fn main() -> Result<(), CatalogError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Document Workflow: State Machines ===\n");

    // -------------------------------------------------------------------------
    // 1. The Table Is Data
    // -------------------------------------------------------------------------
    println!("1. The Table Is Data");
    println!("--------------------\n");

    let table = document_table()?;
    let graph = table.graph();
    println!(
        "  {} states, {} state-changing transitions",
        graph.node_count(),
        graph.edge_count()
    );
    for state in table.states() {
        println!(
            "  from {:<10} reachable: {:?} terminal: {}",
            state.to_string(),
            table.reachable_from(*state),
            table.is_terminal(*state)
        );
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Walking the Workflow
    // -------------------------------------------------------------------------
    println!("2. Walking the Workflow");
    println!("-----------------------\n");

    let doc = Document::new("Release notes")?;
    let audit = Arc::new(LoggingObserver::new("audit"));
    doc.subscribe(&audit);

    report("edit (draft)", doc.edit("Initial text"));
    report("publish (draft)", doc.publish());
    report("edit (moderation)", doc.edit("Late change"));
    report("publish (moderation)", doc.publish());
    report("publish (published)", doc.publish());

    println!();
    println!("  final state: {}", doc.state());
    println!("  body: {:?}", doc.body());

    println!("\n=== Done ===");
    Ok(())
}
