use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use pinrank_core::config::Config;
use pinrank_resolver::{Lookup, PinResolver};
use pinrank_store::{BoundedPinStore, JsonPinStore, PinEditor, SaveOutcome};

const USAGE: &str = "Usage: pinrank <pin|unpin|show|list|apply> [args...]
  pin <doc_id> \"<keyword, keyword>\" [position]
  unpin <doc_id>
  show <doc_id>
  list
  apply \"<query>\" <hit_id>...";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}\n{USAGE}");
    std::process::exit(2)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.pinning()?;
    let (cmd, args) = parse_args();

    let store_path = settings.resolve_store_path(config.base_dir());
    debug!(
        store = %store_path.display(),
        budget_ms = settings.lookup_budget_ms,
        max_position = settings.max_position,
        "pinning settings loaded"
    );
    let store = Arc::new(
        JsonPinStore::open(&store_path).with_context(|| format!("opening pin store {}", store_path.display()))?,
    );
    let editor = PinEditor::new(Arc::clone(&store)).with_max_position(settings.max_position);

    match cmd.as_str() {
        "pin" => {
            let (Some(doc_id), Some(keywords)) = (args.first(), args.get(1)) else {
                usage_error("pin needs a document id and keywords")
            };
            let position = args
                .get(2)
                .map(|p| p.trim().parse::<i64>())
                .transpose()
                .context("position must be an integer")?;
            match editor.save(doc_id, keywords, position)? {
                SaveOutcome::Saved(record) => println!("📌 {record}"),
                SaveOutcome::Removed => println!("Removed pin for {doc_id}"),
                SaveOutcome::Unchanged => println!("No pin for {doc_id}"),
            }
        }
        "unpin" => {
            let Some(doc_id) = args.first() else { usage_error("unpin needs a document id") };
            match editor.clear(doc_id)? {
                SaveOutcome::Removed => println!("Removed pin for {doc_id}"),
                _ => println!("No pin for {doc_id}"),
            }
        }
        "show" => {
            let Some(doc_id) = args.first() else { usage_error("show needs a document id") };
            println!("📌 {}", editor.get(doc_id)?);
        }
        "list" => {
            let records = editor.list()?;
            if records.is_empty() { println!("No pins configured in {}", store_path.display()); }
            for record in records { println!("📌 {record}"); }
        }
        "apply" => {
            let Some(query) = args.first() else { usage_error("apply needs a query") };
            let hit_ids: Vec<String> = args[1..].to_vec();
            let bounded = BoundedPinStore::new(Arc::clone(&store), settings.lookup_budget())
                .with_max_in_flight(settings.max_in_flight_lookups);
            let resolver = PinResolver::new(bounded);
            let resolution = resolver.resolve(query, hit_ids);
            debug!(query = %query, lookup = ?resolution.lookup, reordered = resolution.is_reordered(), "apply finished");

            println!("🔍 Query: \"{query}\"");
            for (i, id) in resolution.hits.iter().enumerate() { println!("  {}. {}", i + 1, id); }
            for p in &resolution.pinned {
                println!("  📌 {} pinned at {} by keyword \"{}\" (was #{})", p.doc_id, p.position, p.keyword, p.original_index + 1);
            }
            for d in &resolution.demoted {
                println!("  ⚠️  {} lost position {} to {}", d.doc_id, d.position, d.held_by);
            }
            match &resolution.lookup {
                Lookup::Skipped => println!("  (empty query or no hits: pinning skipped)"),
                Lookup::NoCandidates => println!("  (no pins match this query)"),
                Lookup::Candidates(n) => println!("  ({n} candidate pin(s) considered)"),
                Lookup::Failed(reason) => {
                    warn!(%reason, "hits returned unpinned");
                    println!("  (pin store unavailable: {reason})")
                }
            }
        }
        _ => usage_error(&format!("Unknown command: {cmd}")),
    }
    Ok(())
}
