use anyhow::Result;
use clap::{Args, Subcommand};
use xshell::{Shell, cmd};

#[derive(Subcommand)]
pub enum Command {
    /// Run CI checks (fmt, clippy, test). Runs all if no check is specified.
    Ci(Ci),
    /// Apply rustfmt to all files
    Fmt,
    /// Run the workspace tests
    Test(TestArgs),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Ci(ci) => ci.run(sh),
            Command::Fmt => {
                eprintln!("Applying cargo fmt...");
                cmd!(sh, "cargo fmt --all").run()?;
                Ok(())
            }
            Command::Test(args) => args.run(sh),
        }
    }
}

#[derive(Args)]
pub struct Ci {
    #[command(subcommand)]
    check: Option<Check>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum Check {
    /// Run cargo fmt check
    Fmt,
    /// Run cargo clippy with warnings denied
    Clippy,
    /// Run cargo test
    Test,
}

impl Ci {
    fn run(&self, sh: &Shell) -> Result<()> {
        match self.check {
            Some(check) => check.run(sh),
            None => [Check::Fmt, Check::Clippy, Check::Test]
                .into_iter()
                .try_for_each(|check| check.run(sh)),
        }
    }
}

impl Check {
    fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Check::Fmt => {
                eprintln!("Running cargo fmt check...");
                cmd!(sh, "cargo fmt --all -- --check").run()?;
            }
            Check::Clippy => {
                eprintln!("Running cargo clippy...");
                cmd!(
                    sh,
                    "cargo clippy --all-features --all-targets --workspace -- -D warnings"
                )
                .run()?;
            }
            Check::Test => TestArgs::default().run(sh)?,
        }
        Ok(())
    }
}

#[derive(Args, Default)]
pub struct TestArgs {
    /// Additional arguments to pass to cargo test
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl TestArgs {
    fn run(&self, sh: &Shell) -> Result<()> {
        eprintln!("Running cargo test...");
        let args = &self.args;
        cmd!(sh, "cargo test --workspace {args...}").run()?;
        Ok(())
    }
}
