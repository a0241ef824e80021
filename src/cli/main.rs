/*!
A minimal CLI driving the checker over an AIGER input.

# Use

```sh
car_mc [--option(=value)]* model.aag
```

## Options

- `--forward` / `--backward`: search direction (default forward).
- `--evidence`: also write the counterexample/invariant detail to the
  `.res` file, not just the header line.
- `--verbose`: enable diagnostic logging.
- `--minimal-uc`: enable extra UC minimization passes.
- `--reconstruct-every=N`: solver-reconstruction threshold (`0` for never).
*/

use std::fs::File;
use std::io::{self, BufReader, Write};

use car_mc::config::Config;
use car_mc::{AigerModel, Engine, Verdict};

mod parse_args;
use parse_args::{parse_args, CliOptions};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();
    let mut cli_options = CliOptions::default();

    let path = match parse_args(&args, &mut config, &mut cli_options) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if config.verbose {
        env_logger::Builder::new().filter_level(log::LevelFilter::Debug).init();
    } else {
        env_logger::Builder::new().filter_level(log::LevelFilter::Warn).init();
    }

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("could not open {path}: {e}");
            std::process::exit(1);
        }
    };

    let model = match AigerModel::parse_ascii(BufReader::new(file)) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("parse error: {e}");
            std::process::exit(1);
        }
    };

    let mut engine = Engine::new(model, config);
    let verdict = match engine.check() {
        Ok(verdict) => verdict,
        Err(e) => {
            eprintln!("internal error: {e}");
            std::process::exit(2);
        }
    };

    let res_path = format!("{path}.res");
    if let Err(e) = write_result(&res_path, &verdict, cli_options.evidence) {
        eprintln!("failed to write {res_path}: {e}");
        std::process::exit(1);
    }

    match &verdict {
        Verdict::Unsafe { trace } => println!("UNSAFE ({} steps)", trace.len()),
        Verdict::Safe { invariant } => println!("SAFE ({} invariant cubes)", invariant.len()),
    }
}

/// Writes the `<input>.res` evidence file (§6): a header line (`0`
/// UNSAFE / `1` SAFE), followed by the trace or invariant detail when
/// `evidence` is set.
fn write_result(path: &str, verdict: &Verdict, evidence: bool) -> io::Result<()> {
    let mut out = File::create(path)?;

    match verdict {
        Verdict::Unsafe { trace } => {
            writeln!(out, "0")?;
            if evidence {
                for step in &trace.steps {
                    writeln!(
                        out,
                        "{} {}",
                        literals_to_string(step.inputs.literals()),
                        literals_to_string(step.state.literals())
                    )?;
                }
            }
        }
        Verdict::Safe { invariant } => {
            writeln!(out, "1")?;
            if evidence {
                for cube in invariant {
                    writeln!(out, "{}", literals_to_string(cube.literals()))?;
                }
            }
        }
    }

    Ok(())
}

fn literals_to_string(literals: &[i32]) -> String {
    literals.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(" ")
}
