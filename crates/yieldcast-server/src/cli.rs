use std::net::SocketAddr;
use std::path::PathBuf;

use yieldcast_core::{YieldError, YieldResult};

/// Usage text printed for `--help`.
pub const USAGE: &str = "\
Usage: yieldcast-server [OPTIONS]

Options:
  --config <PATH>   TOML config file
  --data <PATH>     Historical dataset (CSV)
  --bind <ADDR>     Listen address, e.g. 0.0.0.0:5000
  --no-color        Disable ANSI colors in log output
  -v, --verbose     Debug-level logging
  -q, --quiet       Errors only
  -h, --help        Print this help
";

/// Parsed command-line flags. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub bind_addr: Option<SocketAddr>,
    pub verbose: bool,
    pub quiet: bool,
    pub no_color: bool,
    pub help: bool,
}

/// Parse server CLI args, excluding the program name.
///
/// # Errors
///
/// Returns `YieldError::InvalidConfig` for unknown flags, missing values or
/// an unparseable bind address.
pub fn parse_cli_args<I, S>(args: I) -> YieldResult<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut parsed = CliArgs::default();
    let mut idx = 0;

    while idx < tokens.len() {
        let flag = tokens[idx].as_str();
        match flag {
            "--config" => {
                let value = expect_value(&tokens, idx, flag)?;
                parsed.config_path = Some(PathBuf::from(value));
                idx += 2;
            }
            "--data" => {
                let value = expect_value(&tokens, idx, flag)?;
                parsed.data_path = Some(PathBuf::from(value));
                idx += 2;
            }
            "--bind" => {
                let value = expect_value(&tokens, idx, flag)?;
                parsed.bind_addr =
                    Some(
                        value
                            .parse::<SocketAddr>()
                            .map_err(|e| YieldError::InvalidConfig {
                                field: "bind_addr".into(),
                                value: value.into(),
                                reason: e.to_string(),
                            })?,
                    );
                idx += 2;
            }
            "-v" | "--verbose" => {
                parsed.verbose = true;
                idx += 1;
            }
            "-q" | "--quiet" => {
                parsed.quiet = true;
                idx += 1;
            }
            "--no-color" => {
                parsed.no_color = true;
                idx += 1;
            }
            "-h" | "--help" => {
                parsed.help = true;
                idx += 1;
            }
            _ => {
                return Err(YieldError::InvalidConfig {
                    field: "cli.flag".into(),
                    value: flag.into(),
                    reason: "unsupported flag".into(),
                });
            }
        }
    }

    Ok(parsed)
}

fn expect_value<'a>(tokens: &'a [String], idx: usize, flag: &str) -> YieldResult<&'a str> {
    tokens
        .get(idx + 1)
        .map(String::as_str)
        .ok_or_else(|| YieldError::InvalidConfig {
            field: "cli.flag".into(),
            value: flag.into(),
            reason: "missing value".into(),
        })
}
