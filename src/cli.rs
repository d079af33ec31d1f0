use std::path::PathBuf;

use anyhow::{Result, anyhow};

const USAGE: &str = "usage: betai [--config <path>] [--unlock <n>] [--refresh] [--match <id>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: PathBuf,
    /// Gates to sit through after the first render.
    pub unlocks: u32,
    /// Bypass the cache on the initial load.
    pub refresh: bool,
    /// Show one match in full instead of the list.
    pub match_id: Option<String>,
}

pub fn parse_args_from_env() -> Result<CliArgs> {
    parse_args(std::env::args().skip(1))
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut config_path = None;
    let mut unlocks = 0;
    let mut refresh = false;
    let mut match_id = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                config_path = Some(PathBuf::from(value));
            }
            "--unlock" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --unlock"))?;
                unlocks = value
                    .parse()
                    .map_err(|_| anyhow!("--unlock expects a non-negative integer, got '{value}'"))?;
            }
            "--refresh" => refresh = true,
            "--match" => {
                let value = args
                    .next()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| anyhow!("missing value for --match"))?;
                match_id = Some(value);
            }
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    Ok(CliArgs {
        config_path: config_path.unwrap_or_else(|| PathBuf::from("./betai.jsonc")),
        unlocks,
        refresh,
        match_id,
    })
}
