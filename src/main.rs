// SPDX-License-Identifier: MPL-2.0
//! Binary entry point: parses CLI flags and launches the application.

use iced_venue::app::{self, paths, Flags};

const HELP: &str = "\
IcedVenue - event-booking manager for small venues

USAGE:
  iced_venue [OPTIONS]

OPTIONS:
  --lang <LOCALE>      Force a UI language (e.g. es, en-US)
  --i18n-dir <DIR>     Load Fluent .ftl files from a directory instead of the embedded set
  --config-dir <DIR>   Store settings.toml under this directory
  --data-dir <DIR>     Store exported diagnostics under this directory
  --server-url <URL>   Talk to this server for the session, leaving the stored config alone
  -h, --help           Print help
  -V, --version        Print version
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }
    if args.contains(["-V", "--version"]) {
        println!("iced_venue {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let flags = Flags {
        lang: args.opt_value_from_str("--lang").unwrap(),
        i18n_dir: args.opt_value_from_str("--i18n-dir").unwrap(),
        config_dir: args.opt_value_from_str("--config-dir").unwrap(),
        data_dir: args.opt_value_from_str("--data-dir").unwrap(),
        server_url: args.opt_value_from_str("--server-url").unwrap(),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        eprintln!("Unknown arguments: {remaining:?}");
        eprint!("{HELP}");
        std::process::exit(2);
    }

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

    app::run(flags)
}
