use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "numinfo",
    version,
    about = "lookup client for phone / id / keyword records",
    long_about = "numinfo sends a search term to the lookup API, maps the returned fields onto name, mobile, email and address, and prints the result next to the raw JSON.\n\nThe API credential is read from the API_KEY environment variable.\n\nExamples:\n  numinfo 9876543210\n  numinfo --mock --view results 9876543210\n  numinfo --export -o ./exports 9876543210\n  numinfo --interactive\n\nTip: Use --config to persist settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(value_name = "TERM", help = "Phone number, ID or keyword to look up.")]
    pub term: Option<String>,

    #[arg(
        short = 'i',
        long = "interactive",
        conflicts_with = "term",
        help_heading = "Input",
        help = "Read one search term per line from stdin until EOF."
    )]
    pub interactive: bool,

    #[arg(
        short = 'C',
        long = "config",
        visible_alias = "cfg",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.numinfo/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'm',
        long = "mock",
        help_heading = "Lookup",
        help = "Serve canned records instead of calling the API."
    )]
    pub mock: bool,

    #[arg(
        short = 'T',
        long = "timeout",
        visible_alias = "to",
        value_name = "SECONDS",
        help_heading = "Lookup",
        help = "Request timeout in seconds (5-30)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "api-url",
        value_name = "URL",
        help_heading = "Lookup",
        help = "Override the lookup endpoint."
    )]
    pub api_url: Option<String>,

    #[arg(
        short = 'a',
        long = "auto-map",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        help_heading = "Lookup",
        help = "Map field aliases onto name/mobile/email/address (default true; --auto-map=false shows raw records)."
    )]
    pub auto_map: Option<bool>,

    #[arg(
        short = 'w',
        long = "view",
        value_name = "VIEW",
        help_heading = "Output",
        help = "What to print: results, json or all."
    )]
    pub view: Option<String>,

    #[arg(
        short = 'd',
        long = "dark",
        visible_alias = "dark-mode",
        help_heading = "Output",
        help = "Use the dark colour palette."
    )]
    pub dark: bool,

    #[arg(
        short = 'c',
        long = "color",
        visible_alias = "clr",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "no-color",
        visible_alias = "nc",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'e',
        long = "export",
        help_heading = "Export",
        help = "Write each lookup to numinfo_<term>.csv."
    )]
    pub export: bool,

    #[arg(
        short = 'o',
        long = "output-dir",
        visible_alias = "out",
        value_name = "DIR",
        help_heading = "Export",
        help = "Directory for CSV exports (default: current directory)."
    )]
    pub output_dir: Option<String>,
}
