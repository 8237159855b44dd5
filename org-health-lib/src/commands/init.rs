use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `org-health.toml` in the current directory)
    #[arg(long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use camino::Utf8Path;

    #[test]
    fn writes_default_configuration() {
        let tmp = tempfile::tempdir().unwrap();
        let output = Utf8Path::from_path(tmp.path()).unwrap().join("custom.toml");
        let mut host = TestHost::new();

        init_config(&mut host, &InitArgs { output: Some(output.clone()) }).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, crate::commands::DEFAULT_CONFIG_TOML);
        assert!(host.output_text().contains("Generated default configuration file"));
    }

    #[test]
    fn fails_for_unwritable_path() {
        let tmp = tempfile::tempdir().unwrap();
        let output = Utf8Path::from_path(tmp.path()).unwrap().join("missing").join("org-health.toml");
        let mut host = TestHost::new();

        assert!(init_config(&mut host, &InitArgs { output: Some(output) }).is_err());
    }
}
