use clap::{Parser, Subcommand};
use spfcheck_lib::SpfCheckOptions;
#[cfg(feature = "with-dns")]
use spfcheck_lib::ResolverSettings;

use std::net::IpAddr;

#[derive(Parser)]
#[command(name = "spfcheck-cli", version, about = "Contrôle syntaxique des enregistrements SPF")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des domaines depuis stdin (un par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (format selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// ne signale pas un `all` sans qualificatif comme `+all`
    #[arg(long)]
    pub allow_bare_all: bool,

    /// timeout DNS par requête (ms, 0 = défaut du résolveur)
    #[arg(long = "timeout-ms", default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// nombre de tentatives DNS
    #[arg(long, default_value_t = 2)]
    pub attempts: usize,

    /// serveur DNS à interroger (répétable, défaut: /etc/resolv.conf)
    #[arg(long = "nameserver")]
    pub nameservers: Vec<IpAddr>,

    /// port des serveurs DNS passés via --nameserver
    #[arg(long = "dns-port", default_value_t = 53)]
    pub dns_port: u16,

    /// -v info, -vv debug, -vvv trace (sinon RUST_LOG)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// résout puis contrôle l'enregistrement SPF d'un domaine ou d'une URL
    Domain { domain: String },
    /// contrôle une chaîne SPF brute
    Record {
        #[arg(allow_hyphen_values = true)]
        spf: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn check_options(&self) -> SpfCheckOptions {
        SpfCheckOptions::new().flag_bare_all(!self.allow_bare_all)
    }

    #[cfg(feature = "with-dns")]
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings::new()
            .with_timeout_ms(self.timeout_ms)
            .with_attempts(self.attempts)
            .with_nameservers(self.nameservers.iter().copied())
            .with_port(self.dns_port)
    }
}

pub fn log_filter(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("warn,spfcheck_lib=info"),
        2 => Some("warn,spfcheck_lib=debug"),
        _ => Some("info,spfcheck_lib=trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accepts_leading_hyphen() {
        let cli = Cli::try_parse_from(["spfcheck-cli", "record", "-all"]).expect("parses");
        match cli.cmd {
            Some(Commands::Record { spf }) => assert_eq!(spf, "-all"),
            _ => panic!("expected record subcommand"),
        }
    }

    #[test]
    fn allow_bare_all_relaxes_options() {
        let cli = Cli::try_parse_from(["spfcheck-cli", "--allow-bare-all", "record", "v=spf1 all"])
            .expect("parses");
        assert!(!cli.check_options().flags_bare_all());
    }

    #[cfg(feature = "with-dns")]
    #[test]
    fn nameservers_feed_resolver_settings() {
        let cli = Cli::try_parse_from([
            "spfcheck-cli",
            "--nameserver",
            "192.0.2.53",
            "--timeout-ms",
            "250",
            "domain",
            "example.com",
        ])
        .expect("parses");
        let settings = cli.resolver_settings();
        assert_eq!(settings.timeout_ms, 250);
        assert_eq!(settings.nameservers.len(), 1);
    }

    #[test]
    fn verbosity_maps_to_filters() {
        assert_eq!(log_filter(0), None);
        assert_eq!(log_filter(2), Some("warn,spfcheck_lib=debug"));
    }
}
