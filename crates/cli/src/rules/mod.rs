use anyhow::{bail, Context, Result};

use crate::args::RulesArgs;
use crate::config::load_config;
use crate::output::print_json;
use crate::scan::{init_logging, load_catalog};
use crate::ui;
use engine::Session;

/// Prints the catalog, optionally narrowed to one rule.
pub fn list_rules(args: RulesArgs) -> Result<()> {
    init_logging(&args.common);
    let cfg = load_config().context("failed to load configuration")?;
    let rules = load_catalog(&args.common, &cfg)?;
    let mut session = Session::new(rules);
    if let Some(depth) = args.common.depth {
        session = session.with_max_depth(depth);
    }
    let listing = session.list_rules(args.rule.as_deref());
    if let (Some(name), 0) = (&args.rule, listing.total_rules) {
        bail!("no sink rule named '{name}'");
    }
    if args.json {
        print_json(&listing)
    } else {
        ui::print_rules(&listing);
        Ok(())
    }
}
