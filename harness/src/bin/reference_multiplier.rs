//! Cooperating external multiplier: `reference_multiplier [flags] <m> <n> <p>`.
//!
//! Prints A, B and C = A·B in wire format followed by a timing trailer. Fault flags make it
//! misbehave in controlled ways so the harness can be exercised end to end.

use std::{
    env,
    io::{self, Write},
    process,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use matcheck_core::{wire::write_blocks, Matrix};
use matcheck_harness::{
    cpu::{generate_product_case, ProductCase, DEFAULT_SEED, WIRE_PRECISION},
    Dimensions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    Exit(i32),
    Corrupt,
    WrongShape,
    Garbage,
    TwoBlocks,
}

struct CliOptions {
    seed: u64,
    identity: bool,
    fault: Option<Fault>,
    fail_from: usize,
    dims: Dimensions,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("reference_multiplier failed: {err:#}");
        eprintln!("Usage: reference_multiplier [--seed=N] [--identity] [--exit=CODE|--corrupt|--wrong-shape|--garbage|--two-blocks] [--fail-from=SIZE] <m> <n> <p>");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_options()?;
    let started = Instant::now();

    let fault = options.fault.filter(|_| options.dims.m >= options.fail_from);
    if let Some(Fault::Exit(code)) = fault {
        eprintln!("injected failure for {}", options.dims);
        process::exit(code);
    }

    let case = if options.identity {
        let n = options.dims.m;
        ProductCase {
            a: Matrix::identity(n),
            b: Matrix::identity(n),
            c: Matrix::identity(n),
        }
    } else {
        generate_product_case(options.dims, options.seed)?
    };
    let ProductCase { a, b, mut c } = case;

    let mut text = match fault {
        Some(Fault::Corrupt) => {
            let (rows, cols) = c.shape();
            if rows > 0 && cols > 0 {
                let value = c.get(rows - 1, cols - 1);
                c.set(rows - 1, cols - 1, value + 1.0);
            }
            write_blocks(&[&a, &b, &c], WIRE_PRECISION)
        }
        Some(Fault::WrongShape) => {
            let trimmed = drop_last_column(&c)?;
            write_blocks(&[&a, &b, &trimmed], WIRE_PRECISION)
        }
        Some(Fault::Garbage) => {
            let mut text = write_blocks(&[&a, &b], WIRE_PRECISION);
            text.push_str("1.0, x, 3.0\n---\n");
            text
        }
        Some(Fault::TwoBlocks) => write_blocks(&[&a, &b], WIRE_PRECISION),
        Some(Fault::Exit(_)) | None => write_blocks(&[&a, &b, &c], WIRE_PRECISION),
    };
    text.push_str(&format!(
        "Time: {:.6} sec\n",
        started.elapsed().as_secs_f64()
    ));

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("failed to write matrices")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}

fn parse_options() -> Result<CliOptions> {
    let mut seed = DEFAULT_SEED;
    let mut identity = false;
    let mut fault = None;
    let mut fail_from = 0;
    let mut positional = Vec::new();

    for arg in env::args().skip(1) {
        if let Some(value) = arg.strip_prefix("--seed=") {
            seed = parse_seed(value).context("invalid --seed value")?;
        } else if let Some(value) = arg.strip_prefix("--exit=") {
            let code = value.parse().context("invalid --exit value")?;
            fault = Some(Fault::Exit(code));
        } else if let Some(value) = arg.strip_prefix("--fail-from=") {
            fail_from = value.parse().context("invalid --fail-from value")?;
        } else if arg == "--identity" {
            identity = true;
        } else if arg == "--corrupt" {
            fault = Some(Fault::Corrupt);
        } else if arg == "--wrong-shape" {
            fault = Some(Fault::WrongShape);
        } else if arg == "--garbage" {
            fault = Some(Fault::Garbage);
        } else if arg == "--two-blocks" {
            fault = Some(Fault::TwoBlocks);
        } else if arg.starts_with("--") {
            bail!("unrecognized argument: {arg}");
        } else {
            positional.push(arg);
        }
    }

    let [m, n, p] = positional.as_slice() else {
        bail!("expected 3 dimensions, got {}", positional.len());
    };
    let dims = Dimensions {
        m: parse_dimension(m)?,
        n: parse_dimension(n)?,
        p: parse_dimension(p)?,
    };
    if identity && !(dims.m == dims.n && dims.n == dims.p) {
        bail!("--identity requires square dimensions, got {dims}");
    }

    Ok(CliOptions {
        seed,
        identity,
        fault,
        fail_from,
        dims,
    })
}

fn parse_dimension(value: &str) -> Result<usize> {
    let dim: usize = value
        .parse()
        .with_context(|| format!("invalid integer: '{value}'"))?;
    if dim == 0 {
        bail!("dimensions must be positive");
    }
    Ok(dim)
}

fn parse_seed(value: &str) -> Result<u64> {
    if let Some(hex) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).context("expected hex literal")
    } else {
        value.parse().context("expected integer seed")
    }
}

fn drop_last_column(matrix: &Matrix) -> Result<Matrix> {
    let rows = matrix
        .rows_iter()
        .map(|row| row[..row.len().saturating_sub(1)].to_vec())
        .collect();
    Ok(Matrix::from_rows(rows)?)
}
