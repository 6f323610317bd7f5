//! `calculus-eval`: Parses a term and runs it through the calculus.
//!
//! Always prints the terminal term. Optional stages: type checking, the
//! reduction trace, the lambda denotation, the semantic agreement check, and
//! the canonical form of the term's fusions.
//!
//! **Usage:**
//! ```
//! calculus-eval <TERM> [--operator <name>] [--modulus <n>] [--max-steps <n>]
//!               [--config <file>] [--trace] [--check] [--denote] [--verify]
//!               [--canonical] [--json] [-v]
//! ```
//!
//! Exits non-zero if parsing, checking, reduction, or verification fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use prime_calculus::operator::Modulus;
use prime_calculus::{parse_term, EngineConfig, OperatorKind, TypeChecker, TypingContext};
use serde_json::{json, Map, Value};

/// Evaluate a prime calculus term.
#[derive(Parser)]
#[command(name = "calculus-eval", about = "Reduce and denote a prime calculus term")]
struct Args {
    /// The term, e.g. "A(2)A(3)N(7)" or "([N(2)] ; [FUSE(3,5,11)])".
    term: String,

    /// Prime operator: resonance, next-prime, modular, or identity.
    #[arg(long)]
    operator: Option<OperatorKind>,

    /// Modulus of the modular operator (at least 2).
    #[arg(long)]
    modulus: Option<Modulus>,

    /// Reduction step bound.
    #[arg(long)]
    max_steps: Option<usize>,

    /// TOML file with engine settings; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print every reduction step.
    #[arg(long)]
    trace: bool,

    /// Type-check the term first.
    #[arg(long)]
    check: bool,

    /// Print the evaluated lambda translation.
    #[arg(long)]
    denote: bool,

    /// Check that reduction and denotation agree.
    #[arg(long)]
    verify: bool,

    /// Print the term with canonical fusion triads.
    #[arg(long)]
    canonical: bool,

    /// Emit one JSON object instead of text.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config: EngineConfig = prime_calculus_clients::load_config(self.config.as_deref())?;
        if let Some(operator) = self.operator {
            config.operator = operator;
        }
        if let Some(modulus) = self.modulus {
            config.modulus = modulus;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    prime_calculus_clients::init_tracing(args.verbose);

    let config = args.engine_config()?;
    let term = parse_term(&args.term).with_context(|| format!("Failed to parse {:?}", args.term))?;
    let mut out = Map::new();
    out.insert("term".into(), json!(term.to_string()));
    out.insert("operator".into(), json!(config.operator));

    if args.check {
        let judgment = TypeChecker::new()
            .check(&term, &TypingContext::new())
            .context("Type checking failed")?;
        if !args.json {
            println!("{judgment}");
        }
        out.insert("type".into(), json!(judgment.ty().to_string()));
    }

    let trace = config
        .engine()
        .normalize(&term)
        .context("Reduction failed")?;
    if !args.json {
        if args.trace {
            println!("{:>4}  {}", 0, trace.initial());
            for (index, step) in trace.steps().iter().enumerate() {
                println!("{:>4}  {step}", index + 1);
            }
        }
        println!("{}", trace.final_term());
    }
    if args.trace {
        out.insert("trace".into(), serde_json::to_value(&trace)?);
    }
    out.insert("steps".into(), json!(trace.len()));
    out.insert("normal_form".into(), json!(trace.final_term().to_string()));

    let semantics = config.semantics();
    if args.denote {
        let outcome = semantics.denote(&term).context("Translation failed")?;
        if !args.json {
            println!("denotation: {outcome}");
        }
        out.insert("denotation".into(), serde_json::to_value(&outcome)?);
    }

    if args.verify {
        let agreement = semantics
            .verify_semantic_equivalence(&term)
            .context("Semantic verification failed")?;
        if !args.json {
            println!(
                "semantics agree: {} reduction steps, {} evaluation steps",
                agreement.operational_steps, agreement.denotation.steps
            );
        }
        out.insert("verified".into(), Value::Bool(true));
    }

    if args.canonical {
        let canonical = config
            .canonicalizer()
            .canonicalize(&term)
            .context("Canonicalization failed")?;
        if !args.json {
            println!("canonical: {canonical}");
        }
        out.insert("canonical".into(), json!(canonical.to_string()));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);
    }
    Ok(())
}
