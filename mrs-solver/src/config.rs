//! CLI surface (`Cli`, parsed by `clap`) and its validated form (`Config`,
//! buildable independently of `clap::Parser` so tests can construct one
//! directly).

use std::path::PathBuf;

use clap::Parser;
use mrs_poly::MDeg;

use crate::error::OptionsError;

#[derive(Parser, Debug)]
#[command(name = "mrs-solver", about = "Kipnis-Shamir MinRank cryptanalysis solver")]
pub struct Cli {
    /// Path to the instance file (mandatory).
    #[arg(long)]
    pub minrank: Option<PathBuf>,

    /// Comma-separated multi-degree target, e.g. `--mdeg=2,2,2`. Repeatable;
    /// every occurrence must have the same group count.
    #[arg(long = "mdeg")]
    pub mdeg: Vec<String>,

    /// Same grammar as `--mdeg`, but builds the combined-degree union path
    /// instead of a single target. Mutually exclusive with `--mdeg`.
    #[arg(long = "combi-mdeg")]
    pub combi_mdeg: Vec<String>,

    #[arg(long)]
    pub seed: Option<u32>,

    #[arg(long)]
    pub thread: Option<String>,

    #[arg(long = "mac-row")]
    pub mac_row: Option<u64>,

    #[arg(long = "ks-rand")]
    pub ks_rand: bool,

    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub instance_path: PathBuf,
    pub mdegs: Vec<MDeg>,
    pub seed: Option<u64>,
    pub threads: Option<usize>,
    pub mac_row: Option<u64>,
    pub ks_rand: bool,
    pub dry_run: bool,
    pub verbosity: u8,
}

impl Config {
    pub fn try_from_cli(cli: Cli) -> Result<Config, OptionsError> {
        let instance_path = cli.minrank.ok_or(OptionsError::MissingInstance)?;

        if !cli.mdeg.is_empty() && !cli.combi_mdeg.is_empty() {
            return Err(OptionsError::ConflictingMultiDegreeFlags);
        }
        let raw_mdegs: &[String] = if !cli.combi_mdeg.is_empty() {
            &cli.combi_mdeg
        } else {
            &cli.mdeg
        };
        let mdegs = parse_mdegs(raw_mdegs)?;

        let threads = match cli.thread {
            None => None,
            Some(raw) => {
                let n: usize = raw
                    .parse()
                    .map_err(|_| OptionsError::InvalidThreadCount { raw: raw.clone() })?;
                if n == 0 {
                    return Err(OptionsError::InvalidThreadCount { raw });
                }
                Some(n)
            }
        };

        if let Some(mac_row) = cli.mac_row {
            if mac_row == 0 {
                return Err(OptionsError::MacRowOutOfRange { value: mac_row });
            }
        }

        Ok(Config {
            instance_path,
            mdegs,
            seed: cli.seed.map(u64::from),
            threads,
            mac_row: cli.mac_row,
            ks_rand: cli.ks_rand,
            dry_run: cli.dry_run,
            verbosity: cli.verbose,
        })
    }
}

fn parse_mdegs(raw: &[String]) -> Result<Vec<MDeg>, OptionsError> {
    if raw.is_empty() {
        return Err(OptionsError::MalformedMultiDegree {
            detail: "at least one --mdeg is required".to_string(),
        });
    }
    if raw.len() > 64 {
        return Err(OptionsError::MalformedMultiDegree {
            detail: format!("{} multi-degrees given, hard cap is 64", raw.len()),
        });
    }

    let mut parsed = Vec::with_capacity(raw.len());
    let mut expected_groups: Option<usize> = None;
    for s in raw {
        let degs: Result<Vec<u32>, _> = s.split(',').map(|p| p.trim().parse::<u32>()).collect();
        let degs = degs.map_err(|_| OptionsError::MalformedMultiDegree {
            detail: format!("`{s}` is not a comma-separated list of non-negative integers"),
        })?;
        if degs.is_empty() || degs.iter().any(|&d| d < 1) {
            return Err(OptionsError::MalformedMultiDegree {
                detail: format!("`{s}` must list only degrees >= 1"),
            });
        }
        match expected_groups {
            None => expected_groups = Some(degs.len()),
            Some(n) if n != degs.len() => {
                return Err(OptionsError::MalformedMultiDegree {
                    detail: "all --mdeg/--combi-mdeg entries must share the same group count".to_string(),
                })
            }
            _ => {}
        }
        parsed.push(MDeg::new(degs));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            minrank: Some(PathBuf::from("instance.txt")),
            mdeg: vec!["2,2,2".to_string()],
            combi_mdeg: vec![],
            seed: None,
            thread: None,
            mac_row: None,
            ks_rand: false,
            dry_run: false,
            verbose: 0,
        }
    }

    #[test]
    fn missing_instance_is_rejected() {
        let mut cli = base_cli();
        cli.minrank = None;
        assert!(matches!(Config::try_from_cli(cli), Err(OptionsError::MissingInstance)));
    }

    #[test]
    fn valid_config_parses_mdeg() {
        let config = Config::try_from_cli(base_cli()).unwrap();
        assert_eq!(config.mdegs.len(), 1);
        assert_eq!(config.mdegs[0].degs(), &[2, 2, 2]);
    }

    #[test]
    fn zero_degree_is_rejected() {
        let mut cli = base_cli();
        cli.mdeg = vec!["2,0,2".to_string()];
        assert!(matches!(
            Config::try_from_cli(cli),
            Err(OptionsError::MalformedMultiDegree { .. })
        ));
    }

    #[test]
    fn mismatched_group_counts_are_rejected() {
        let mut cli = base_cli();
        cli.mdeg = vec!["2,2,2".to_string(), "1,1".to_string()];
        assert!(matches!(
            Config::try_from_cli(cli),
            Err(OptionsError::MalformedMultiDegree { .. })
        ));
    }

    #[test]
    fn mdeg_and_combi_mdeg_together_is_rejected() {
        let mut cli = base_cli();
        cli.combi_mdeg = vec!["1,1,1".to_string()];
        assert!(matches!(
            Config::try_from_cli(cli),
            Err(OptionsError::ConflictingMultiDegreeFlags)
        ));
    }

    #[test]
    fn zero_thread_count_is_rejected() {
        let mut cli = base_cli();
        cli.thread = Some("0".to_string());
        assert!(matches!(
            Config::try_from_cli(cli),
            Err(OptionsError::InvalidThreadCount { .. })
        ));
    }
}
