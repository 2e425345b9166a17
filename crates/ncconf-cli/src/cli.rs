//! Command line definition

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};
use ncconf_core::{ConfigTree, Policy};
use ncconf_occ::{load_declared, parse_declared, ConvergeOptions, Format, LoadError, OccSettings};

use crate::logging::LogFormat;

/// Where the declared tree comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DeclaredSource {
    File(PathBuf),
    Inline(String),
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub(crate) path: PathBuf,
    pub(crate) declared: DeclaredSource,
    pub(crate) policy: Policy,
    pub(crate) dry_run: bool,
    pub(crate) php: Option<String>,
    pub(crate) include_private: bool,
    pub(crate) verbosity: u8,
    pub(crate) log_format: LogFormat,
}

pub(crate) fn command() -> Command {
    Command::new("ncconf")
        .version(ncconf_core::VERSION)
        .about("Converge a Nextcloud system configuration to a declared state")
        .arg(
            Arg::new("path")
                .long("path")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Nextcloud install directory, or the occ script inside it"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .visible_aliases(["conf", "configuration"])
                .value_parser(value_parser!(PathBuf))
                .help("Declared configuration file (YAML, JSON or TOML)"),
        )
        .arg(
            Arg::new("inline")
                .long("inline")
                .help("Declared configuration as an inline JSON object"),
        )
        .group(
            ArgGroup::new("declared")
                .args(["config", "inline"])
                .required(true),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .default_value("present")
                .value_parser(|s: &str| s.parse::<Policy>())
                .help("Whether declared keys should be present or absent"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .visible_alias("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would change without applying it"),
        )
        .arg(
            Arg::new("php")
                .long("php")
                .help("PHP interpreter used to run occ [env: NCCONF_PHP]"),
        )
        .arg(
            Arg::new("no-private")
                .long("no-private")
                .action(ArgAction::SetTrue)
                .help("Do not list private values (secrets are then always rewritten)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format on stderr"),
        )
}

impl Invocation {
    pub(crate) fn from_matches(matches: &ArgMatches) -> Self {
        let declared = match matches.get_one::<PathBuf>("config") {
            Some(path) => DeclaredSource::File(path.clone()),
            None => DeclaredSource::Inline(
                matches.get_one::<String>("inline").cloned().unwrap_or_default(),
            ),
        };

        Self {
            path: matches.get_one::<PathBuf>("path").cloned().unwrap_or_default(),
            declared,
            policy: matches.get_one::<Policy>("state").copied().unwrap_or_default(),
            dry_run: matches.get_flag("check"),
            php: matches.get_one::<String>("php").cloned(),
            include_private: !matches.get_flag("no-private"),
            verbosity: matches.get_count("verbose"),
            log_format: match matches.get_one::<String>("log-format").map(String::as_str) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    pub(crate) fn settings(&self) -> OccSettings {
        let settings = OccSettings::from_env().with_private(self.include_private);
        match &self.php {
            Some(php) => settings.with_php_binary(php.clone()),
            None => settings,
        }
    }

    pub(crate) fn options(&self) -> ConvergeOptions {
        ConvergeOptions::new(self.policy).with_dry_run(self.dry_run)
    }

    pub(crate) fn load_declared(&self) -> Result<ConfigTree, LoadError> {
        match &self.declared {
            DeclaredSource::File(path) => load_declared(path),
            DeclaredSource::Inline(text) => parse_declared(text, Format::Json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation, clap::Error> {
        let argv = std::iter::once("ncconf").chain(args.iter().copied());
        command()
            .try_get_matches_from(argv)
            .map(|m| Invocation::from_matches(&m))
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn defaults_to_present_and_applying() {
        let inv = parse(&["--path", "/var/www/nextcloud", "--config", "nc.yaml"]).unwrap();
        assert_eq!(inv.policy, Policy::Present);
        assert!(!inv.dry_run);
        assert!(inv.include_private);
        assert_eq!(inv.declared, DeclaredSource::File("nc.yaml".into()));
        assert_eq!(inv.log_format, LogFormat::Text);
    }

    #[test]
    fn aliases_are_accepted() {
        let inv = parse(&["--path", "/nc", "--conf", "a.json", "--dry-run", "--state", "Absent"]).unwrap();
        assert_eq!(inv.policy, Policy::Absent);
        assert!(inv.dry_run);
        assert_eq!(inv.declared, DeclaredSource::File("a.json".into()));

        let inv = parse(&["--path", "/nc", "--configuration", "b.toml"]).unwrap();
        assert_eq!(inv.declared, DeclaredSource::File("b.toml".into()));
    }

    #[test]
    fn requires_exactly_one_declared_source() {
        assert!(parse(&["--path", "/nc"]).is_err());
        assert!(parse(&["--path", "/nc", "--config", "a", "--inline", "{}"]).is_err());
    }

    #[test]
    fn rejects_unknown_state() {
        let err = parse(&["--path", "/nc", "--inline", "{}", "--state", "latest"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn inline_declared_tree_is_json() {
        let inv = parse(&["--path", "/nc", "--inline", r#"{"loglevel": 1}"#]).unwrap();
        let tree = inv.load_declared().unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn php_flag_overrides_settings() {
        let inv = parse(&["--path", "/nc", "--inline", "{}", "--php", "php8.3", "--no-private", "-vv"]).unwrap();
        let settings = inv.settings();
        assert_eq!(settings.php_binary, "php8.3");
        assert!(!settings.include_private);
        assert_eq!(inv.verbosity, 2);
        assert!(inv.options() == ConvergeOptions::new(Policy::Present));
    }
}
