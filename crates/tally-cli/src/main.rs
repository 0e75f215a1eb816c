// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use std::env;
use std::path::PathBuf;
use tally_app::{FormKind, profile};

const LOG_ENV: &str = "TALLY_LOG";

fn main() {
    init_logging();
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.list_forms {
        for kind in FormKind::ALL {
            let fields = profile(kind)
                .fields
                .iter()
                .map(|field| field.name)
                .collect::<Vec<_>>()
                .join(", ");
            println!("{:<20} {}", kind.as_str(), fields);
        }
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tally --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    tally_http::Client::new(config.base_url(), config.timeout()?).with_context(|| {
        format!(
            "invalid [server] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let kind = options
        .form
        .ok_or_else(|| anyhow!("nothing to do; pass --form KIND (see --list-forms)"))?;
    let page = match options.page.as_deref() {
        Some(page) => page,
        None => runtime::default_page(kind)?,
    };
    tracing::debug!(form = kind.as_str(), page, "submitting");

    let mut form = runtime::http_runtime(&config, kind, page, &options.checks)?;
    if let Some(cookie) = options.cookie.as_deref() {
        form.set_cookie(cookie);
    }
    for (name, value) in &options.fields {
        form.fill(name, value)?;
    }
    let report = form.submit()?;
    print!("{report}");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    cookie: Option<String>,
    form: Option<FormKind>,
    page: Option<String>,
    fields: Vec<(String, String)>,
    checks: Vec<String>,
    list_forms: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        cookie: None,
        form: None,
        page: None,
        fields: Vec::new(),
        checks: Vec::new(),
        list_forms: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--cookie" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--cookie requires a cookie string"))?;
                options.cookie = Some(value.as_ref().to_owned());
            }
            "--form" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--form requires a form kind"))?;
                let kind = FormKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown form {:?}; run with --list-forms to see them",
                        value.as_ref()
                    )
                })?;
                options.form = Some(kind);
            }
            "--page" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--page requires a path"))?;
                options.page = Some(value.as_ref().to_owned());
            }
            "--field" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--field requires NAME=VALUE"))?;
                let (name, field_value) = value
                    .as_ref()
                    .split_once('=')
                    .ok_or_else(|| anyhow!("--field expects NAME=VALUE, got {:?}", value.as_ref()))?;
                options
                    .fields
                    .push((name.to_owned(), field_value.to_owned()));
            }
            "--check" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--check requires a checkbox name"))?;
                options.checks.push(value.as_ref().to_owned());
            }
            "--list-forms" => {
                options.list_forms = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check-config" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tally: submit Tally forms from the command line");
    println!("  --config <path>          Use a specific config path");
    println!("  --cookie <cookie>        Session cookie string (sessionid=...; csrftoken=...)");
    println!("  --form <kind>            Form to submit (see --list-forms)");
    println!("  --page <path>            Page the form is on; update forms post to it");
    println!("  --field <name=value>     Fill a field; repeatable");
    println!("  --check <name>           Tick a checkbox; repeatable");
    println!("  --list-forms             List form kinds and their fields");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check-config           Validate config and exit");
    println!("  --help                   Show this help");
    println!();
    println!("Set {LOG_ENV}=debug to trace requests on stderr.");
}
