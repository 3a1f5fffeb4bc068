//! `bdreg` - CLI for the blood donor registry
//!
//! Each subcommand wires one page controller to the on-disk registry and
//! prints the outcome.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use blooddonor::cli::{
    AdminCommand, Cli, Command, ConfigCommand, LoginCommand, OrganizeCommand, OutputFormat,
    RegisterCommand, RequestCommand, SearchCommand, SignupCommand,
};
use blooddonor::pages::{
    AdminPage, AuthPage, BloodRequestForm, OrganizeForm, OrganizePage, RegisterForm, RegisterPage,
    RequestPage, SearchPage, SignupForm,
};
use blooddonor::{
    init_logging, BloodGroup, CampRequest, Config, Donor, KeyValueStore, LocalStore, MemoryStore,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    let result = match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        Command::Groups => {
            for group in BloodGroup::ALL {
                println!("{group}");
            }
            Ok(())
        }
        command if cli.ephemeral => {
            let registry =
                LocalStore::new(MemoryStore::new(), config.admin.default_emails.clone());
            run(&registry, &config, command)
        }
        command => {
            let registry = LocalStore::open(&config).context("opening registry")?;
            run(&registry, &config, command)
        }
    };

    match result {
        Err(err) => match err.downcast_ref::<blooddonor::Error>() {
            // Form and login errors are expected outcomes; print them plainly.
            Some(e) if e.is_user_facing() => {
                eprintln!("{e}");
                if e.is_auth_error() {
                    eprintln!("See `bdreg login --help`.");
                }
                std::process::exit(1);
            }
            _ => Err(err),
        },
        ok => ok,
    }
}

fn run<S: KeyValueStore>(
    registry: &LocalStore<S>,
    config: &Config,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Register(cmd) => handle_register(registry, cmd),
        Command::Search(cmd) => handle_search(registry, config, &cmd),
        Command::Request(cmd) => handle_request(registry, cmd),
        Command::Organize(cmd) => handle_organize(registry, cmd),
        Command::Signup(cmd) => handle_signup(registry, cmd),
        Command::Login(cmd) => handle_login(registry, &cmd),
        Command::Logout => {
            AuthPage::new(registry.accounts()).logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami(cmd) => handle_whoami(registry, cmd.format),
        Command::Admin(cmd) => handle_admin(registry, cmd),
        Command::Config(_) | Command::Groups => Ok(()),
    }
}

fn handle_register<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: RegisterCommand,
) -> anyhow::Result<()> {
    let page = RegisterPage::new(registry.donors());
    let donor = page.submit(&RegisterForm {
        name: cmd.name,
        blood_group: cmd.group,
        email: cmd.email,
        contact: cmd.contact,
        city: cmd.city,
    })?;
    println!("Registered as donor successfully ({}).", donor.id);
    Ok(())
}

fn handle_search<S: KeyValueStore>(
    registry: &LocalStore<S>,
    config: &Config,
    cmd: &SearchCommand,
) -> anyhow::Result<()> {
    let page = SearchPage::new(registry.donors(), &config.mail);
    let results = page.search(&cmd.group, &cmd.city)?;

    if cmd.format == OutputFormat::Json {
        let out = serde_json::json!({
            "count": results.donors.len(),
            "donors": results.donors,
            "mailto": results.mail_link.as_ref().map(blooddonor::MailLink::href),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_donors(&results.donors, cmd.format);
    println!("{} donor(s) found.", results.donors.len());
    if let Some(link) = results.mail_link {
        println!();
        println!("Email all matches: {}", link.href());
    }
    Ok(())
}

fn handle_request<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: RequestCommand,
) -> anyhow::Result<()> {
    let page = RequestPage::new(registry.donors());
    let link = page.submit(&BloodRequestForm {
        name: cmd.name,
        blood_group: cmd.group,
        email: cmd.email,
        contact: cmd.contact,
        city: cmd.city,
    })?;
    println!("{}", link.href());
    Ok(())
}

fn handle_organize<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: OrganizeCommand,
) -> anyhow::Result<()> {
    let page = OrganizePage::new(registry.accounts(), registry.camps());
    let request = page.submit(&OrganizeForm {
        event_name: cmd.event,
        date: cmd.date,
        city: cmd.city,
    })?;
    println!(
        "Camp request submitted for admin approval ({}).",
        request.id
    );
    Ok(())
}

fn handle_signup<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: SignupCommand,
) -> anyhow::Result<()> {
    let page = AuthPage::new(registry.accounts());
    let user = page.signup(&SignupForm {
        username: cmd.username,
        email: cmd.email,
        password: cmd.password,
    })?;
    println!("Signed up and logged in as {} <{}>.", user.username, user.email);
    Ok(())
}

fn handle_login<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: &LoginCommand,
) -> anyhow::Result<()> {
    let page = AuthPage::new(registry.accounts());
    let user = page.login(&cmd.email, &cmd.password)?;
    println!("Logged in as {} <{}>.", user.username, user.email);
    if page.shows_admin_link()? {
        println!("You have admin access.");
    }
    Ok(())
}

fn handle_whoami<S: KeyValueStore>(
    registry: &LocalStore<S>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = AuthPage::new(registry.accounts());
    let user = page.profile()?;
    let is_admin = page.shows_admin_link()?;

    if format == OutputFormat::Json {
        let out = serde_json::json!({
            "logged_in": user.is_some(),
            "username": user.as_ref().map(|u| &u.username),
            "email": user.as_ref().map(|u| &u.email),
            "admin": is_admin,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match user {
        Some(user) => {
            println!("{} <{}>", user.username, user.email);
            if is_admin {
                println!("Role: admin");
            }
        }
        None => println!("Not logged in."),
    }
    Ok(())
}

fn handle_admin<S: KeyValueStore>(
    registry: &LocalStore<S>,
    cmd: AdminCommand,
) -> anyhow::Result<()> {
    let accounts = registry.accounts();
    let page = AdminPage::enter(&accounts, registry.camps())?;

    match cmd {
        AdminCommand::Pending { format } => print_camps(&page.pending()?, format, false)?,
        AdminCommand::History { format } => print_camps(&page.history()?, format, true)?,
        AdminCommand::Approve { id, note } => {
            let request = page.approve(&id, note.as_deref())?;
            println!("Approved '{}'.", request.event_name);
        }
        AdminCommand::Decline { id, note } => {
            let request = page.decline(&id, note.as_deref())?;
            println!("Declined '{}'.", request.event_name);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Admin]");
                println!(
                    "  Default admins:     {}",
                    config.admin.default_emails.join(", ")
                );
                println!();
                println!("[Mail]");
                println!("  Search subject:     {}", config.mail.search_subject);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_donors(donors: &[Donor], format: OutputFormat) {
    for d in donors {
        match format {
            OutputFormat::Table => println!(
                "{:<20} {:<4} {:<28} {:<14} {}",
                d.name, d.blood_group, d.email, d.contact, d.city
            ),
            _ => println!(
                "{} ({}) {} {} {}",
                d.name, d.blood_group, d.email, d.contact, d.city
            ),
        }
    }
}

fn print_camps(
    requests: &[CampRequest],
    format: OutputFormat,
    decided: bool,
) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(requests)?);
        return Ok(());
    }
    if requests.is_empty() {
        println!("No requests.");
        return Ok(());
    }

    for r in requests {
        println!("{}", camp_line(r, format, decided));
    }
    Ok(())
}

fn camp_line(r: &CampRequest, format: OutputFormat, decided: bool) -> String {
    let requested_by = r.requested_by.as_deref().unwrap_or("-");
    let decided_by = r.decided_by.as_deref().unwrap_or("-");
    match (format, decided) {
        (OutputFormat::Table, true) => format!(
            "{:<36} {:<24} {:<10} {:<12} {:<9} {:<24} {}",
            r.id, r.event_name, r.date, r.city, r.status, decided_by, r.note
        ),
        (OutputFormat::Table, false) => format!(
            "{:<36} {:<24} {:<10} {:<12} {}",
            r.id, r.event_name, r.date, r.city, requested_by
        ),
        (_, true) if r.note.is_empty() => format!(
            "{} on {} in {}: {} by {} [{}]",
            r.event_name, r.date, r.city, r.status, decided_by, r.id
        ),
        (_, true) => format!(
            "{} on {} in {}: {} by {} ({}) [{}]",
            r.event_name, r.date, r.city, r.status, decided_by, r.note, r.id
        ),
        (_, false) => format!(
            "{} on {} in {}, requested by {} [{}]",
            r.event_name, r.date, r.city, requested_by, r.id
        ),
    }
}
