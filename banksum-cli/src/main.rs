use anyhow::{Context, Result};
use banksum_finance::{
    BalanceOptions, CategoryRules, HsbcBalance, build_balance_table, build_weekly_report,
    write_balance_csv, write_weekly_csv,
};
use banksum_ingest::{discover, load_all};
use clap::{Parser, ValueEnum};
use log::info;
use std::io::Write;
use std::path::PathBuf;

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "banksum",
    version,
    about = "Combine Natwest, Santander and HSBC statement exports into a daily balance CSV"
)]
struct Cli {
    /// Print the weekly spending report instead of daily balances
    #[arg(short = 's', long)]
    spending: bool,

    /// Directory containing natwest/, santander/ and hsbc/ (default: statements)
    #[arg(long)]
    statements_dir: Option<PathBuf>,

    /// Config file (default: ./banksum.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit a row for every calendar day, not only days with transactions
    #[arg(long)]
    daily: bool,

    /// Start at the first date on which every account has a balance
    #[arg(long)]
    common_start: bool,

    /// How to show accounts whose export has no running balance
    #[arg(long, value_enum)]
    hsbc_balance: Option<HsbcBalanceArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HsbcBalanceArg {
    Derived,
    Omit,
}

impl From<HsbcBalanceArg> for HsbcBalance {
    fn from(arg: HsbcBalanceArg) -> Self {
        match arg {
            HsbcBalanceArg::Derived => HsbcBalance::Derived,
            HsbcBalanceArg::Omit => HsbcBalance::Omit,
        }
    }
}

impl Cli {
    /// Flags win over the config file.
    fn balance_options(&self, cfg: &config::Config) -> BalanceOptions {
        let mut opts = cfg.balances.options();
        if let Some(policy) = self.hsbc_balance {
            opts.hsbc_balance = policy.into();
        }
        opts.fill_calendar_days |= self.daily;
        opts.from_common_start |= self.common_start;
        opts
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let cfg = config::load_config(cli.config.as_deref())?;
    let dir = cli
        .statements_dir
        .clone()
        .unwrap_or_else(|| cfg.statements.dir.clone());

    let files = discover(&dir)?;
    let statements = load_all(&files)?;
    info!("parsed {} statements", statements.len());

    // Render everything before touching stdout so a failure prints nothing.
    let mut out = Vec::new();
    if cli.spending {
        let rules = CategoryRules::new(cfg.categories.clone());
        let report = build_weekly_report(statements.iter().flat_map(|s| &s.records), &rules);
        write_weekly_csv(&mut out, &report).context("rendering weekly report")?;
    } else {
        let table = build_balance_table(&statements, &cli.balance_options(&cfg));
        write_balance_csv(&mut out, &table).context("rendering balance table")?;
    }

    std::io::stdout()
        .lock()
        .write_all(&out)
        .context("writing to stdout")?;
    Ok(())
}
