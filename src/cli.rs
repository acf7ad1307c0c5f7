//! Demonstration driver: synthesize → print → apply.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::{Value as Json, json};

use crate::config::SynthConfig;
use crate::function::{Function, compile};
use crate::grammar::{Production, productions_for};
use crate::synth::{can_synthesize_weighted, synthesize_batch};
use crate::types::{ElementType, Parameter, SemanticType, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// synthesize random typed programs over a small grammar and run them
#[derive(Parser, Debug)]
#[command(name = "func-synth")]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// synthesize one or more functions and optionally apply them
    Synth(SynthOut),
    /// print the production registry and which types are reachable
    Grammar(GrammarOut),
}

#[derive(Args, Debug, Clone)]
struct RunSettings {
    /// JSON file with literal pools, operator pools, weights and `lookahead`
    #[arg(long)]
    config: Option<PathBuf>,

    /// function parameter as name:type (int, bool, str, list, list<int>, ...); repeatable
    #[arg(long = "param", default_value = "l:list")]
    params: Vec<Parameter>,

    /// depth budget (1 = terminals only)
    #[arg(long, default_value_t = 4)]
    depth: usize,
}

#[derive(clap::Parser, Debug)]
struct SynthOut {
    #[command(flatten)]
    settings: RunSettings,

    /// output type of the synthesized expression
    #[arg(long = "type", default_value = "int")]
    output_type: SemanticType,

    /// RNG seed (time-based if omitted); run i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// number of independent functions to synthesize
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// JSON array of calls. With one parameter each element is the argument
    /// itself, otherwise each element is an array of arguments.
    #[arg(long)]
    apply: Option<String>,

    /// also print the constructor-style structure of each tree
    #[arg(long)]
    structure: bool,

    /// print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Parser, Debug)]
struct GrammarOut {
    #[command(flatten)]
    settings: RunSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl RunSettings {
    fn load_config(&self) -> Result<SynthConfig> {
        match self.config.as_ref() {
            Some(path) => SynthConfig::from_json_file(path),
            None => Ok(SynthConfig::default()),
        }
    }
}

impl SynthOut {
    /// Argument lists to feed each function. Without `--apply`, the stock
    /// `l:list` setup gets the demo lists.
    fn calls(&self) -> Result<Vec<Vec<Value>>> {
        let params = &self.settings.params;
        let raw: Vec<Value> = match self.apply.as_deref() {
            Some(src) => serde_json::from_str(src).context("--apply must be a JSON array")?,
            None if is_demo_setup(params) => vec![demo_list(3), demo_list(5), demo_list(4)],
            None => return Ok(Vec::new()),
        };
        if params.len() == 1 {
            return Ok(raw.into_iter().map(|arg| vec![arg]).collect());
        }
        raw.into_iter()
            .map(|call| -> Result<Vec<Value>> {
                match call {
                    Value::List(args) => Ok(args),
                    other => bail!("expected an array of {} arguments, got {other}", params.len()),
                }
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Synth(target) => run_synth(target),
            Command::Grammar(target) => run_grammar(target),
        }
    }
}

fn run_synth(target: &SynthOut) -> Result<()> {
    let config = target.settings.load_config()?;
    let params = &target.settings.params;
    let calls = target.calls()?;
    let seed = target.seed.unwrap_or_else(time_seed);
    tracing::info!(seed, count = target.count, depth = target.settings.depth, "starting synthesis");

    let results = synthesize_batch(seed, target.count, target.output_type, target.settings.depth, params, &config);

    let mut failures = 0usize;
    let mut report = Vec::with_capacity(results.len());
    for (i, result) in results.into_iter().enumerate() {
        let run_seed = seed.wrapping_add(i as u64);
        let expr = match result {
            Ok(expr) => expr,
            Err(error) => {
                failures += 1;
                if target.json {
                    report.push(json!({ "seed": run_seed, "error": error.to_string() }));
                } else {
                    eprintln!("{} {}", format!("[{run_seed}]").dimmed(), format!("error: {error}").red());
                }
                continue;
            }
        };
        let function = compile(expr, params.clone())?;
        if target.json {
            report.push(json_entry(run_seed, &function, &calls));
        } else {
            print_entry(run_seed, &function, &calls, target.structure);
        }
    }

    if target.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if failures > 0 {
        bail!("{failures} of {} synthesis run(s) failed", target.count);
    }
    Ok(())
}

fn print_entry(seed: u64, function: &Function, calls: &[Vec<Value>], structure: bool) {
    println!("{} {}", format!("[{seed}]").dimmed(), function.to_string().green());
    if structure {
        println!("    {}", function.expr().structure());
    }
    for args in calls {
        let shown = render_args(args);
        match function.call(args) {
            Ok(value) => println!("    f({shown}) = {}", value.to_string().bold()),
            Err(error) => println!("    f({shown}) = {}", error.to_string().red()),
        }
    }
}

fn json_entry(seed: u64, function: &Function, calls: &[Vec<Value>]) -> Json {
    let results: Vec<Json> = calls
        .iter()
        .map(|args| match function.call(args) {
            Ok(value) => json!({ "args": args, "value": value }),
            Err(error) => json!({ "args": args, "error": error.to_string() }),
        })
        .collect();
    json!({
        "seed": seed,
        "function": function.to_string(),
        "structure": function.expr().structure(),
        "type": function.expr().ty(),
        "depth": function.expr().depth(),
        "results": results,
    })
}

fn run_grammar(target: &GrammarOut) -> Result<()> {
    let config = target.settings.load_config()?;
    let params = &target.settings.params;
    let depth = target.settings.depth;

    println!("{}", "productions".bold());
    for ty in [SemanticType::Integer, SemanticType::Boolean, SemanticType::String] {
        for production in productions_for(&ty) {
            let enabled = config.pools.ops_for(&ty).contains(production);
            let line = format!("  {:<11} {:<5} <- {}", production.name(), ty.to_string(), signature(*production));
            if enabled {
                println!("{line}");
            } else {
                println!("{}", format!("{line}  (disabled)").dimmed());
            }
        }
    }

    println!("{}", format!("reachable at depth {depth}").bold());
    let types = [
        SemanticType::Integer,
        SemanticType::Boolean,
        SemanticType::String,
        SemanticType::ANY_LIST,
        SemanticType::Parameter,
    ];
    for ty in types {
        let status = if can_synthesize_weighted(&ty, depth, params, &config.pools, &config.weights) {
            "yes".green()
        } else {
            "no".red()
        };
        println!("  {:<6} {status}", ty.to_string());
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn signature(production: Production) -> String {
    if production.is_terminal() {
        return "literal".to_string();
    }
    production.operands().iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

fn render_args(args: &[Value]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
}

fn is_demo_setup(params: &[Parameter]) -> bool {
    matches!(params, [p] if p.name == "l" && p.ty == SemanticType::List(ElementType::Any))
}

fn demo_list(n: i64) -> Value {
    Value::List((0..n).map(Value::Int).collect())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
