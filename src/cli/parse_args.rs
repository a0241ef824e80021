/*!
Hand-rolled argument parsing, in the style of the teacher crate's own
`cli::parse_args` (no `clap`): a loop over `--flag` / `--flag=value`
arguments, with the final positional argument treated as the input path.
*/

use std::num::NonZeroUsize;

use crate::config::{Config, Direction, ReconstructionThreshold};

/// CLI-only switches that don't belong on [`Config`] itself.
#[derive(Default)]
pub struct CliOptions {
    pub evidence: bool,
}

/// Parses `args` (including the leading binary name at index 0) into a
/// [`Config`]/[`CliOptions`] pair plus the input path.
///
/// On an unrecognised flag or an out-of-range value, prints a message and
/// terminates the process -- matching the teacher's own `parse_args`,
/// which treats a bad CLI argument as fatal rather than recoverable.
pub fn parse_args(args: &[String], cfg: &mut Config, cli_options: &mut CliOptions) -> Result<String, String> {
    let mut path: Option<String> = None;

    'arg_examination: for arg in args.iter().skip(1) {
        let mut split = arg.split('=');
        match split.next() {
            Some("--forward") => {
                cfg.direction = Direction::Forward;
                continue 'arg_examination;
            }

            Some("--backward") => {
                cfg.direction = Direction::Backward;
                continue 'arg_examination;
            }

            Some("--evidence") => {
                cli_options.evidence = true;
                continue 'arg_examination;
            }

            Some("--verbose") => {
                cfg.verbose = true;
                continue 'arg_examination;
            }

            Some("--minimal-uc") => {
                cfg.minimal_uc = true;
                continue 'arg_examination;
            }

            Some("--reconstruct-every") => {
                if let Some(request) = split.next() {
                    match request.parse::<usize>() {
                        Ok(0) => {
                            cfg.reconstruction_threshold = ReconstructionThreshold::Never;
                            continue 'arg_examination;
                        }
                        Ok(value) => {
                            cfg.reconstruction_threshold =
                                ReconstructionThreshold::Calls(NonZeroUsize::new(value).unwrap());
                            continue 'arg_examination;
                        }
                        Err(_) => {}
                    }
                }
                return Err("--reconstruct-every requires a non-negative integer (0 for never)".to_string());
            }

            Some(other) if other.starts_with("--") => {
                return Err(format!("unrecognised option: {other}"));
            }

            Some(positional) => {
                path = Some(positional.to_string());
            }

            None => {}
        }
    }

    path.ok_or_else(|| "expected an input AIGER path".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_direction_and_path() {
        let args: Vec<String> = ["car_mc", "--backward", "model.aag"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut cfg = Config::default();
        let mut cli_options = CliOptions::default();
        let path = parse_args(&args, &mut cfg, &mut cli_options).unwrap();
        assert_eq!(path, "model.aag");
        assert_eq!(cfg.direction, Direction::Backward);
    }

    #[test]
    fn rejects_unrecognised_flag() {
        let args: Vec<String> = ["car_mc", "--nonsense", "model.aag"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut cfg = Config::default();
        let mut cli_options = CliOptions::default();
        assert!(parse_args(&args, &mut cfg, &mut cli_options).is_err());
    }

    #[test]
    fn missing_path_is_an_error() {
        let args: Vec<String> = ["car_mc", "--verbose"].into_iter().map(String::from).collect();
        let mut cfg = Config::default();
        let mut cli_options = CliOptions::default();
        assert!(parse_args(&args, &mut cfg, &mut cli_options).is_err());
    }
}
