//! Command-line interface.
//!
//! ```text
//! jcm-server                     Serve with jcm-server.toml (or defaults)
//! jcm-server --config <path>     Load a custom config TOML
//! jcm-server --port <port>       Override the listening port
//! jcm-server --gen-config        Write default config to stdout
//! jcm-server -h | -help | --help | -info
//!                                Print what this program does and exit
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Printed for any of the [`INFO_FLAGS`].
pub const DESCRIPTION: &str = "This program runs a server that runs a variety of basic JCM functions, which is controlled by a separate client.";

/// Arguments that print [`DESCRIPTION`] instead of starting the server.
pub const INFO_FLAGS: [&str; 4] = ["-h", "-help", "--help", "-info"];

/// True when any argument after the program name asks for the description.
pub fn wants_info<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .skip(1)
        .any(|arg| INFO_FLAGS.contains(&arg.as_ref()))
}

#[derive(Parser, Debug)]
#[command(name = "jcm-server", about = DESCRIPTION, disable_help_flag = true)]
pub struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "jcm-server.toml")]
    pub config: PathBuf,

    /// Listening port; overrides the config file.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    pub gen_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_flags_anywhere() {
        assert!(wants_info(["jcm-server", "-info"]));
        assert!(wants_info(["jcm-server", "--port", "4000", "-help"]));
        assert!(wants_info(["jcm-server", "-h"]));
        assert!(!wants_info(["jcm-server", "--port", "4000"]));
        assert!(!wants_info(["-h"]));
    }

    #[test]
    fn parses_overrides() {
        let cli =
            Cli::try_parse_from(["jcm-server", "--config", "a.toml", "--port", "4000"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("a.toml"));
        assert_eq!(cli.port, Some(4000));
        assert!(!cli.gen_config);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["jcm-server"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("jcm-server.toml"));
        assert_eq!(cli.port, None);
    }
}
