//!
//! neuronet CLI binary
//! --------------------
//! Operator console for the NeuroNet identity service. Drives the same
//! session store the dashboard uses: login/register, session inspection,
//! profile reads and updates, and the role/route table. Supports one-shot
//! flags and an interactive interpreter (`--repl`).

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use neuronet::cli::{print_record, print_records};
use neuronet::config::Settings;
use neuronet::error::AuthError;
use neuronet::identity::{
    FileTokenStore, HttpIdentityService, IdentityService, Navigator, ProfileUpdate, Role,
    SessionStore, DEFAULT_DASHBOARD, LOGIN_ROUTE, ONBOARDING_ROUTE,
};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --login --email <e> --password <p> [--api <url>]\n  {program} --register --email <e> --password <p> --role <user|therapist|buddy> [--api <url>]\n  {program} --whoami | --profile | --routes | --status | --logout [--api <url>]\n  {program} --repl [--api <url>]\n\nFlags:\n  --api <url>              Identity service base URL (default: NEURONET_API_URL or http://localhost:8000)\n  --token-file <path>      Persisted token location (default: NEURONET_TOKEN_FILE or .neuronet/token.json)\n  --email <e>              Account email for --login/--register\n  --password <p>           Account password for --login/--register\n  --role <r>               Account role for --register\n  --repl                   Start the interactive interpreter\n  -h, --help               Show this help\n\nInteractive commands:\n  login <email> <password>             authenticate and load the session\n  register <email> <password> <role>   create an account, then auto-login\n  whoami                               show the session's user record\n  profile                              fetch the full profile\n  set <field> <value...>               update one profile field (name, age, gender, languages, interests)\n  routes                               show the role/dashboard route table\n  status                               probe the service and show session state\n  logout                               clear the session\n  help                                 show this help\n  quit | exit                          leave the interpreter\n\nExamples:\n  {program} --register --email ada@example.com --password s3cret99 --role buddy\n  {program} --repl --api http://localhost:8000\n    > login ada@example.com s3cret99\n    > set languages en,fr\n"
    );
}

// Navigation sink for a terminal: the dashboard would route; we just show
// where the session would land.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn push(&self, path: &str) {
        println!("→ navigating to {}", path);
    }
}

fn role_routes_value() -> serde_json::Value {
    let mut rows: Vec<serde_json::Value> = Role::all()
        .iter()
        .map(|r| {
            serde_json::json!({
                "role": r.as_str(),
                "display_name": r.display_name(),
                "dashboard": r.dashboard_route(),
            })
        })
        .collect();
    rows.push(serde_json::json!({"role": "(unknown)", "display_name": "Unknown", "dashboard": ONBOARDING_ROUTE}));
    rows.push(serde_json::json!({"role": "(absent)", "display_name": "Unknown", "dashboard": DEFAULT_DASHBOARD}));
    rows.push(serde_json::json!({"role": "(anonymous)", "display_name": "-", "dashboard": LOGIN_ROUTE}));
    serde_json::Value::Array(rows)
}

fn show_value_as_record(val: &serde_json::Value) {
    if !print_record(val) {
        println!("{}", serde_json::to_string_pretty(val).unwrap_or_else(|_| val.to_string()));
    }
}

fn show_whoami(store: &SessionStore) {
    let snap = store.snapshot();
    match snap.user {
        Some(user) => {
            let val = serde_json::to_value(&user).unwrap_or_default();
            show_value_as_record(&val);
        }
        None => println!("anonymous (no active session)"),
    }
}

async fn show_profile(store: &SessionStore) {
    match store.profile().await {
        Ok(profile) => {
            let val = serde_json::to_value(&profile).unwrap_or_default();
            show_value_as_record(&val);
        }
        Err(e) => print_auth_error(&e),
    }
}

fn parse_update(field: &str, value: &str) -> Option<ProfileUpdate> {
    let mut upd = ProfileUpdate::default();
    match field {
        "name" | "full_name" => upd.full_name = Some(value.to_string()),
        "age" => match value.parse::<u32>() {
            Ok(age) => upd.age = Some(age),
            Err(_) => {
                eprintln!("age must be a number");
                return None;
            }
        },
        "gender" => upd.gender = Some(value.to_string()),
        "languages" => upd.languages = Some(split_list(value)),
        "interests" => upd.interests = Some(split_list(value)),
        other => {
            eprintln!("unknown profile field '{}'; expected name, age, gender, languages or interests", other);
            return None;
        }
    }
    Some(upd)
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn print_auth_error(e: &AuthError) {
    if e.is_retryable() {
        eprintln!("error: {} (the service may be down; retry shortly)", e.message());
    } else {
        eprintln!("error: {}", e.message());
    }
}

async fn show_status(store: &SessionStore, service: &HttpIdentityService) {
    match service.probe().await {
        Ok(()) => println!("service {}: healthy", service.base_url()),
        Err(e) => println!("service {}: {}", service.base_url(), e.message()),
    }
    let snap = store.snapshot();
    if snap.is_loading {
        println!("session: loading");
    } else if let Some(user) = &snap.user {
        println!("session: authenticated as {} ({})", user.email, user.role);
    } else {
        println!("session: anonymous");
    }
}

async fn run_repl(store: &SessionStore, service: &HttpIdentityService) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("neuronet interpreter. Type 'help' for commands.");
    loop {
        input.clear();
        print!("> ");
        let _ = stdout.flush();
        if stdin.read_line(&mut input).is_err() {
            break;
        }
        if input.is_empty() {
            break; // EOF
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        let up = line.to_uppercase();
        if up == "EXIT" || up == "QUIT" {
            break;
        }
        if up == "HELP" {
            print_usage("neuronet_cli");
            continue;
        }
        if up.starts_with("LOGIN ") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                eprintln!("usage: login <email> <password>");
                continue;
            }
            match store.login(parts[1], parts[2]).await {
                Ok(()) => show_whoami(store),
                Err(e) => print_auth_error(&e),
            }
            continue;
        }
        if up.starts_with("REGISTER ") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                eprintln!("usage: register <email> <password> <role>");
                continue;
            }
            match store.register(parts[1], parts[2], parts[3]).await {
                Ok(()) => show_whoami(store),
                Err(e) => print_auth_error(&e),
            }
            continue;
        }
        if up == "WHOAMI" {
            show_whoami(store);
            continue;
        }
        if up == "PROFILE" {
            show_profile(store).await;
            continue;
        }
        if up.starts_with("SET ") {
            let parts: Vec<&str> = line.splitn(3, ' ').collect();
            if parts.len() < 3 {
                eprintln!("usage: set <field> <value...>");
                continue;
            }
            let Some(upd) = parse_update(&parts[1].to_lowercase(), parts[2].trim()) else { continue };
            match store.update_profile(&upd).await {
                Ok(profile) => {
                    let val = serde_json::to_value(&profile).unwrap_or_default();
                    show_value_as_record(&val);
                }
                Err(e) => print_auth_error(&e),
            }
            continue;
        }
        if up == "ROUTES" {
            let val = role_routes_value();
            if !print_records(&val) {
                println!("{}", serde_json::to_string_pretty(&val).unwrap_or_default());
            }
            continue;
        }
        if up == "STATUS" {
            show_status(store, service).await;
            continue;
        }
        if up == "LOGOUT" {
            store.logout();
            println!("logged out");
            continue;
        }
        eprintln!("unknown command; type 'help'");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn")).unwrap();
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "neuronet_cli".to_string());

    let mut settings = Settings::from_env();
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;
    let mut role: Option<String> = None;
    let mut command: Option<&'static str> = None;
    let mut repl = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            "--api" => {
                i += 1;
                settings.api_url = args.get(i).cloned().unwrap_or(settings.api_url);
            }
            "--token-file" => {
                i += 1;
                if let Some(p) = args.get(i) {
                    settings.token_file = p.into();
                }
            }
            "--email" => {
                i += 1;
                email = args.get(i).cloned();
            }
            "--password" => {
                i += 1;
                password = args.get(i).cloned();
            }
            "--role" => {
                i += 1;
                role = args.get(i).cloned();
            }
            "--login" => command = Some("login"),
            "--register" => command = Some("register"),
            "--whoami" => command = Some("whoami"),
            "--profile" => command = Some("profile"),
            "--routes" => command = Some("routes"),
            "--status" => command = Some("status"),
            "--logout" => command = Some("logout"),
            "--repl" => repl = true,
            other => {
                eprintln!("unknown flag: {}", other);
                print_usage(&program);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let rt = tokio::runtime::Runtime::new()?;

    let service = HttpIdentityService::new(&settings.api_url)?;
    let store = SessionStore::new(
        Arc::new(service.clone()),
        Arc::new(FileTokenStore::new(&settings.token_file)),
        Arc::new(PrintNavigator),
    );

    // Resume any persisted session before dispatching
    rt.block_on(store.initialize());

    if repl {
        return rt.block_on(run_repl(&store, &service));
    }

    match command {
        Some("login") => {
            let (Some(email), Some(password)) = (email, password) else {
                eprintln!("--login requires --email and --password");
                std::process::exit(2);
            };
            if let Err(e) = rt.block_on(store.login(&email, &password)) {
                print_auth_error(&e);
                std::process::exit(1);
            }
            show_whoami(&store);
        }
        Some("register") => {
            let (Some(email), Some(password), Some(role)) = (email, password, role) else {
                eprintln!("--register requires --email, --password and --role");
                std::process::exit(2);
            };
            if let Err(e) = rt.block_on(store.register(&email, &password, &role)) {
                print_auth_error(&e);
                std::process::exit(1);
            }
            show_whoami(&store);
        }
        Some("whoami") => show_whoami(&store),
        Some("profile") => rt.block_on(show_profile(&store)),
        Some("routes") => {
            let val = role_routes_value();
            if !print_records(&val) {
                println!("{}", serde_json::to_string_pretty(&val).unwrap_or_default());
            }
        }
        Some("status") => rt.block_on(show_status(&store, &service)),
        Some("logout") => {
            store.logout();
            println!("logged out");
        }
        _ => {
            print_usage(&program);
            std::process::exit(2);
        }
    }
    Ok(())
}
