use std::error::Error;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use itertools::Itertools;
use symcalc::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "symcalc")]
#[command(about = "Symbolic calculus on prefix-notation formulas")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a formula at one or more points
    Eval {
        #[arg(allow_hyphen_values = true)]
        formula: String,
        #[arg(required = true, allow_negative_numbers = true)]
        xs: Vec<f64>,
    },
    /// Differentiate a formula symbolically, or numerically at a point
    Derive {
        #[arg(allow_hyphen_values = true)]
        formula: String,
        /// Forward-difference derivative at this point instead of the symbolic one
        #[arg(long, allow_negative_numbers = true)]
        newton: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_STEP)]
        step: f64,
    },
    /// Simplify a formula and print it in infix form
    Simplify {
        #[arg(allow_hyphen_values = true)]
        formula: String,
    },
    /// Left Riemann sum over [x1, x2)
    Integrate {
        #[arg(allow_hyphen_values = true)]
        formula: String,
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        x2: f64,
        #[arg(long, default_value_t = 0.001)]
        step: f64,
    },
    /// Taylor series around a point
    Taylor {
        #[arg(allow_hyphen_values = true)]
        formula: String,
        #[arg(long, default_value_t = DEFAULT_ORDER)]
        order: usize,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        point: f64,
        /// Evaluate the finite-difference series at these points instead of printing the symbolic one
        #[arg(long, num_args = 1.., allow_negative_numbers = true)]
        numerical: Option<Vec<f64>>,
    },
    /// Fit the interpolating polynomial through "x,y;x,y;..." points
    Fit {
        #[arg(allow_hyphen_values = true)]
        points: String,
    },
}

fn main() {
    install_tracing();
    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn install_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn run(command: Command) -> Result<(), CalcError> {
    match command {
        Command::Eval { formula, xs } => {
            let f = Function::new(formula)?;
            for x in xs {
                println!("{}({}) = {}", "f".cyan(), x, f.eval(x)?);
            }
        }
        Command::Derive {
            formula,
            newton: Some(x),
            step,
        } => {
            let f = Function::new(formula)?;
            let value = f.newton_derivative(&Value::Scalar(x), step)?;
            println!("{}({}) ≈ {}", "f'".cyan(), x, value.as_slice().iter().join(", "));
        }
        Command::Derive { formula, .. } => {
            let df = Function::new(formula)?.derivative();
            println!("{} = {}", "f'(x)".cyan(), df.infix());
            println!("{} {}", "formula:".dimmed(), df.formula());
        }
        Command::Simplify { formula } => {
            let f = Function::new(formula)?.simplify();
            println!("{}", f.infix());
        }
        Command::Integrate {
            formula,
            x1,
            x2,
            step,
        } => {
            let sum = Function::new(formula)?.integrate(x1, x2, step)?;
            println!(
                "{} = {} ({} samples)",
                format!("∫[{x1}, {x2})").cyan(),
                sum.area,
                sum.xs.len()
            );
        }
        Command::Taylor {
            formula,
            order,
            point,
            numerical,
        } => {
            let f = Function::new(formula)?;
            let options = TaylorOptions::new(order).at(point);
            match numerical {
                Some(xs) => {
                    let values = f.taylor_numerical(&Value::Vector(xs.clone()), &options)?;
                    for (x, y) in xs.iter().zip(values.as_slice()) {
                        println!("{}({}) ≈ {}", "T".cyan(), x, y);
                    }
                }
                None => {
                    let series = f.taylor(&options)?;
                    println!("{} = {}", "T(x)".cyan(), series.infix());
                }
            }
        }
        Command::Fit { points } => {
            let f = Function::fit(&points)?;
            println!("{}", f);
        }
    }
    Ok(())
}
