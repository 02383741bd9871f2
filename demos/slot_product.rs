use std::collections::BTreeSet;

use clap::Parser;
use log::{debug, info};

use slot_product::domains::{BoundedSet, BoundedSetDomain, Member, Members, SetDomain};
use slot_product::{Part, Product, Slot};

slot_product::slot_registry! {
    /// Facts tracked at the loop head.
    pub enum Facts(FactsTag) {
        /// Tainted variables.
        Tainted(Tainted): SetDomain<&'static str> = SetDomain::new(),
        /// Call sites reaching the loop head.
        Callers(Callers): BoundedSetDomain<u32> = BoundedSetDomain::new(16, 3),
    }
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of distinct call sites visited by the loop body.
    #[arg(value_name = "INT", default_value = "2")]
    sites: u32,

    /// Give up after this many iterations.
    #[clap(long, value_name = "INT", default_value = "50")]
    max_iterations: usize,

    /// Enable debug logging.
    #[clap(long)]
    verbose: bool,
}

/// Abstract effect of one pass through
///
/// ```text
/// loop {
///     y = x;
///     call_site(100 + k);  // k cycles through `sites` values
/// }
/// ```
fn body(state: &Product<Facts>, iteration: usize, sites: u32) -> color_eyre::Result<Product<Facts>> {
    let tainted_x = state.fold(&Part::new(Tainted, Members), false, |acc, v| acc || *v == "x")?;
    let mut next = state.clone();
    if tainted_x {
        next = next.join(&Product::singleton(Tainted, BTreeSet::from(["y"])))?;
    }
    let site = 100 + u32::try_from(iteration % sites.max(1) as usize)?;
    let called = Product::singleton(Callers, BoundedSet::Set(BTreeSet::from([site])));
    Ok(next.join(&called)?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);
    info!(
        "call sites kept exactly up to {}, widening from iteration {}",
        <Callers as Slot>::DOMAIN.max_size(),
        <Callers as Slot>::DOMAIN.widen_after()
    );

    let entry = Product::singleton(Tainted, BTreeSet::from(["x"]));
    println!("entry = {}", entry);

    let mut state = entry.clone();
    let mut converged = false;
    for iteration in 0..args.max_iterations {
        let next = entry.join(&body(&state, iteration, args.sites)?)?;
        let widened = Product::widen(iteration, &state, &next)?;
        debug!("iteration {}: {}", iteration, widened);
        if widened.le(&state)? {
            info!("converged after {} iterations", iteration);
            converged = true;
            break;
        }
        state = widened;
    }
    if !converged {
        color_eyre::eyre::bail!("no fixpoint after {} iterations", args.max_iterations);
    }
    println!("loop head = {}", state);

    // Split the loop-head state per call site.
    let by_site = state.partition(&Part::new(Callers, Members), |site| match site {
        Member::Known(site) => Some(*site),
        Member::Any => None,
    })?;
    for (site, bucket) in &by_site {
        match site {
            Some(site) => println!("  site {}: {}", site, bucket),
            None => println!("  any site: {}", bucket),
        }
    }

    Ok(())
}
