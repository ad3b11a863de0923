#[derive(Debug, clap::Parser)]
#[clap(name = "cm-plugins", about = "CaaS validation, OVS activation and REC host handling")]
pub struct Command {
    /// Settings file (TOML)
    #[clap(short, long, global = true)]
    pub config: Option<String>,

    #[clap(long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    #[clap(name = "validate")]
    Validate {
        snapshot: String,
    },

    #[clap(name = "activate")]
    Activate {
        snapshot: String,
        #[clap(short, long, value_enum, default_value = "set")]
        mode: ActivationMode,
        #[clap(short, long)]
        target: Option<String>,
        #[clap(long)]
        dry_run: bool,
    },

    #[clap(name = "hosts")]
    Hosts {
        snapshot: String,
        #[clap(short, long)]
        output: Option<String>,
    },

    #[clap(name = "watch")]
    Watch {
        snapshot: String,
        #[clap(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActivationMode {
    Set,
    Delete,
    Full,
}
