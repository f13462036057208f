// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BPRS command-line client
//!
//! Search the BPRS book catalogue, as a guest or logged in, and manage the
//! account's session and interests.

use anyhow::Context;
use bprs_client::{
    config::Config,
    interests::{all_interests, canonical_interest, INTEREST_CATEGORIES},
    models::{SearchRequest, SearchResponse, UserProfile},
    storage::FileStorage,
    validation::SignUpForm,
    ClientError, GuestSearchDecision, Session, SessionState,
};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bprs", version, about = "Book recommendation search client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in to an existing account
    Login {
        email: String,
        #[arg(long, env = "BPRS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BPRS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Selected interest (repeat for several)
        #[arg(long = "interest", required = true)]
        interests: Vec<String>,
    },
    /// Log out and forget the stored tokens
    Logout,
    /// Show the current user
    Me,
    /// Show session and guest search status
    Status,
    /// Search for books
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Number of results to return
        #[arg(long)]
        top_k: Option<u32>,
        /// Skip semantic reranking
        #[arg(long)]
        no_rerank: bool,
    },
    /// Show or change interests
    Interests {
        #[command(subcommand)]
        action: InterestsAction,
    },
}

#[derive(Subcommand, Debug)]
enum InterestsAction {
    /// List all selectable interests
    List,
    /// Show the current user's interests
    Show,
    /// Replace the current user's interests
    Set {
        #[arg(required = true, num_args = 1..)]
        interests: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ClientError>() {
                Some(client_err) => {
                    tracing::debug!(error = %client_err, "Command failed");
                    eprintln!("{}", client_err.user_message());
                }
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Interests {
        action: InterestsAction::List,
    } = &cli.command
    {
        print_catalogue();
        return Ok(());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    let storage = FileStorage::open(&config.storage_path).with_context(|| {
        format!(
            "Failed to open client storage at {}",
            config.storage_path.display()
        )
    })?;
    tracing::debug!(
        api = %config.api_base_url,
        storage = %config.storage_path.display(),
        "Client configured"
    );

    let mut session = Session::new(&config, Arc::new(storage))?;
    session.restore().await;

    match cli.command {
        Command::Login { email, password } => {
            let profile = session.login(&email, &password).await?;
            println!("Welcome back, {}!", profile.display_name());
        }
        Command::Signup {
            name,
            email,
            password,
            interests,
        } => {
            let form = SignUpForm {
                name,
                email,
                confirm_password: password.clone(),
                password,
                interests: canonicalize(&interests)?,
            };
            let profile = session.signup(&form).await?;
            println!("Welcome, {}! Your account is ready.", profile.display_name());
        }
        Command::Logout => {
            session.logout().await?;
            println!("Logged out.");
        }
        Command::Me => {
            let profile = session.current_user().ok_or(ClientError::NotAuthenticated)?;
            print_profile(profile);
        }
        Command::Status => print_status(&session),
        Command::Search {
            query,
            top_k,
            no_rerank,
        } => {
            let mut request = SearchRequest::new(query.join(" "));
            request.top_k = top_k;
            if no_rerank {
                request.apply_rerank = Some(false);
            }
            search(&mut session, &request).await?;
        }
        Command::Interests { action } => match action {
            InterestsAction::List => print_catalogue(),
            InterestsAction::Show => {
                let profile = session.current_user().ok_or(ClientError::NotAuthenticated)?;
                print_interests(&profile.interests);
            }
            InterestsAction::Set { interests } => {
                let profile = session.update_interests(&canonicalize(&interests)?).await?;
                println!("Interests updated.");
                print_interests(&profile.interests);
            }
        },
    }

    Ok(())
}

async fn search(session: &mut Session, request: &SearchRequest) -> anyhow::Result<()> {
    let gate = session.guest_search_gate();

    if session.guest_search_status().requires_signup() {
        println!(
            "You have used your {} free searches. Sign up with `bprs signup` to keep searching.",
            gate.limit()
        );
        return Ok(());
    }

    let decision = session.track_guest_search();
    let response = session.search(request).await?;
    print_results(&response);

    match decision {
        GuestSearchDecision::Allowed { remaining } => println!(
            "\nYou have {} search{} remaining. Sign up for unlimited searches.",
            remaining,
            if remaining == 1 { "" } else { "es" }
        ),
        GuestSearchDecision::SignupRequired => {
            println!("\nThat was your last free search. Sign up with `bprs signup` to continue.")
        }
        GuestSearchDecision::Unlimited => {}
    }

    Ok(())
}

/// Map interests to their catalogue spelling, rejecting unknown ones.
fn canonicalize(interests: &[String]) -> Result<Vec<String>, ClientError> {
    interests
        .iter()
        .map(|i| {
            canonical_interest(i)
                .map(str::to_string)
                .ok_or_else(|| ClientError::Validation(format!("Unknown interest: {}", i.trim())))
        })
        .collect()
}

fn print_results(response: &SearchResponse) {
    println!(
        "{} result{} for \"{}\"",
        response.total_results,
        if response.total_results == 1 { "" } else { "s" },
        response.query
    );

    for (i, book) in response.results.iter().enumerate() {
        let title = book.title().unwrap_or("(untitled)");
        let authors = book.authors();
        let mut line = format!("{:>3}. {}", i + 1, title);
        if !authors.is_empty() {
            line.push_str(&format!(" by {}", authors.join(", ")));
        }
        if let Some(score) = book.score() {
            line.push_str(&format!(" [{:.2}]", score));
        }
        println!("{line}");
    }
}

fn print_profile(profile: &UserProfile) {
    println!("{} <{}>", profile.display_name(), profile.email);
    println!("Member since {}", profile.created_at);
    print_interests(&profile.interests);
}

fn print_interests(interests: &[String]) {
    if interests.is_empty() {
        println!("No interests selected.");
    } else {
        println!("Interests: {}", interests.join(", "));
    }
}

fn print_status(session: &Session) {
    match session.state() {
        SessionState::Authenticated(profile) => {
            println!("Logged in as {} <{}>", profile.display_name(), profile.email)
        }
        _ => {
            let gate = session.guest_search_gate();
            let used = session.guest_search_count();
            println!(
                "Browsing as guest: {} of {} free searches used ({} remaining).",
                used,
                gate.limit(),
                gate.remaining(used)
            );
        }
    }
}

fn print_catalogue() {
    for (category, items) in INTEREST_CATEGORIES {
        println!("{}: {}", category, items.join(", "));
    }
    println!("({} interests)", all_interests().count());
}

/// Initialize logging to stderr; JSON when `BPRS_LOG_JSON` is set.
fn init_logging() -> anyhow::Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new("warn").add_directive("bprs_client=info".parse()?),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os("BPRS_LOG_JSON").is_some() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
