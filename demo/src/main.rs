//! MedMinder command-line front end
//!
//! Drives the profile store over a JSON file, plus the simulated assistant,
//! pill identifier, voice commands, and contact directory.
//!
//! Usage:
//!   cargo run -p demo -- auth sign-up --email asha@example.com --password secret1 --name Asha
//!   cargo run -p demo -- auth sign-in --email asha@example.com --password secret1
//!   cargo run -p demo -- profile create --name Asha --age 30
//!   cargo run -p demo -- med add --name Metformin --dosage 500mg \
//!       --frequency "Twice daily" --time 08:00 --type diabetes
//!   cargo run -p demo -- med take <MEDICATION_ID>
//!   cargo run -p demo -- ask "what should I eat for diabetes?"

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use medminder_contracts::{
    error::{MedMinderError, MedMinderResult},
    medication::{MedicationId, MedicationType, MedicationUpdate, NewMedication, FREQUENCIES},
    profile::{NewProfile, Profile, ProfileId, ProfileUpdate, Role},
};
use medminder_core::{
    metrics::{edit_metric_value, record_reading},
    session::require_session,
    traits::{AuthService, Clock, SystemClock},
    MedMinderConfig, ProfileStore,
};
use medminder_services::{
    assistant::{ChatSession, Language},
    auth::StoredAuthService,
    contacts::{ContactDirectory, EMERGENCY_SERVICES},
    pill::{self, ConfidenceBand, PillRecord},
    voice::{self, VoiceAssistant},
};
use medminder_storage::JsonFileStore;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MedMinder: medication reminders and health tracking, stored locally.
#[derive(Parser)]
#[command(
    name = "medminder",
    about = "Medication reminders and health tracking, stored locally",
    long_about = "Manage profiles, medications and vitals in a local JSON store,\n\
                  and try the scripted assistant, pill identifier and voice commands."
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data file; overrides `storage.path` from the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register, sign in, or check the current session.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Create, list, switch and edit profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage the active profile's medications.
    #[command(subcommand)]
    Med(MedCommand),
    /// View and edit the active profile's vitals.
    #[command(subcommand)]
    Metrics(MetricsCommand),
    /// Ask the health assistant a question.
    Ask {
        /// The question.
        #[arg(required = true)]
        question: Vec<String>,
        /// Reply language (en, hi); defaults to the configured language.
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Identify or look up a pill.
    #[command(subcommand)]
    Pill(PillCommand),
    /// Simulated voice commands.
    #[command(subcommand)]
    Voice(VoiceCommand),
    /// List emergency contacts and national emergency numbers.
    Contacts,
    /// Show or dismiss the onboarding walkthrough.
    #[command(subcommand)]
    Onboarding(OnboardingCommand),
    /// End the session and forget the active profile (records are kept).
    SignOut,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Register a new account.
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name.
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Start a session.
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show who is signed in and which profile is active.
    Status,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Register a new profile and make it active.
    Create(CreateProfileArgs),
    /// List every stored profile, most recently active first.
    List,
    /// Make another stored profile active.
    Switch { id: String },
    /// Show the active profile.
    Show,
    /// Edit fields of the active profile.
    Update(UpdateProfileArgs),
}

#[derive(Args)]
struct CreateProfileArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: String,
    #[arg(long, default_value = "patient")]
    role: Role,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    emergency_contact: String,
    #[arg(long, default_value = "")]
    conditions: String,
    #[arg(long, default_value = "")]
    allergies: String,
    #[arg(long, default_value = "")]
    doctor_name: String,
    #[arg(long, default_value = "")]
    doctor_phone: String,
}

#[derive(Args)]
struct UpdateProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    emergency_contact: Option<String>,
    #[arg(long)]
    conditions: Option<String>,
    #[arg(long)]
    allergies: Option<String>,
    #[arg(long)]
    doctor_name: Option<String>,
    #[arg(long)]
    doctor_phone: Option<String>,
    #[arg(long)]
    role: Option<Role>,
}

#[derive(Subcommand)]
enum MedCommand {
    /// Add a medication.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        dosage: String,
        #[arg(long)]
        frequency: String,
        /// Time of day, HH:MM.
        #[arg(long)]
        time: String,
        /// Heart, Diabetes, Blood Pressure, Pain, Mental Health, Vitamin, Other.
        #[arg(long = "type")]
        kind: MedicationType,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List medications with today's status.
    List,
    /// Edit a medication.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dosage: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long = "type")]
        kind: Option<MedicationType>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a medication as taken now.
    Take { id: String },
    /// Delete a medication.
    Delete { id: String },
}

#[derive(Subcommand)]
enum MetricsCommand {
    /// Show every vital.
    Show,
    /// Set a vital's value; its status is reclassified.
    Set { name: String, value: String },
    /// Record a new reading's progress score (random if omitted).
    Reading {
        name: String,
        #[arg(long)]
        progress: Option<f64>,
    },
}

#[derive(Subcommand)]
enum PillCommand {
    /// Simulate identifying a pill from a photo.
    Identify,
    /// Search the reference catalog by name or description.
    Search { query: Vec<String> },
}

#[derive(Subcommand)]
enum VoiceCommand {
    /// Simulate listening for a command.
    Listen,
    /// Interpret a typed command as if it were spoken.
    Say {
        #[arg(required = true)]
        command: Vec<String>,
    },
    /// List spoken reminders.
    Reminders,
}

#[derive(Subcommand)]
enum OnboardingCommand {
    Show,
    Dismiss,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for store and storage traces.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("medminder: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> MedMinderResult<()> {
    let config = match &cli.config {
        Some(path) => MedMinderConfig::from_file(path)?,
        None => MedMinderConfig::default(),
    };
    let data_path = cli.data.unwrap_or_else(|| config.storage.path.clone());
    debug!(data = %data_path.display(), seeding = ?config.seeding.policy, "starting");

    let backend = Arc::new(JsonFileStore::open(data_path)?);
    let auth = StoredAuthService::new(backend.clone());
    let mut store = ProfileStore::new(Box::new(Arc::clone(&backend)), Box::new(SystemClock))
        .with_seeding(config.seeding.policy);
    // An unreadable last-active profile must not lock the user out of
    // listing, switching or signing out.
    if let Err(e) = store.restore() {
        warn!(error = %e, "could not restore the last active profile; continuing without one");
    }

    match cli.command {
        Command::Auth(cmd) => run_auth(&auth, &store, cmd),
        Command::Profile(cmd) => {
            require_session(&auth)?;
            run_profile(&mut store, cmd)
        }
        Command::Med(cmd) => {
            require_session(&auth)?;
            run_med(&mut store, cmd)
        }
        Command::Metrics(cmd) => {
            require_session(&auth)?;
            run_metrics(&mut store, cmd)
        }
        Command::Ask { question, lang } => {
            let language = match lang {
                Some(lang) => lang,
                None => config.assistant.language.parse()?,
            };
            run_ask(&question.join(" "), language);
            Ok(())
        }
        Command::Pill(cmd) => {
            run_pill(cmd);
            Ok(())
        }
        Command::Voice(cmd) => {
            run_voice(cmd, config.voice.enabled);
            Ok(())
        }
        Command::Contacts => {
            print_contacts(&ContactDirectory::default());
            Ok(())
        }
        Command::Onboarding(OnboardingCommand::Show) => {
            if store.has_seen_onboarding()? {
                println!("Onboarding already completed.");
            } else {
                print_onboarding();
            }
            Ok(())
        }
        Command::Onboarding(OnboardingCommand::Dismiss) => {
            store.mark_onboarding_seen()?;
            println!("Onboarding dismissed.");
            Ok(())
        }
        Command::SignOut => {
            auth.sign_out()?;
            store.sign_out()?;
            println!("Signed out. Stored profiles are kept.");
            Ok(())
        }
    }
}

// ── Authentication ────────────────────────────────────────────────────────────

fn run_auth(
    auth: &dyn AuthService,
    store: &ProfileStore,
    cmd: AuthCommand,
) -> MedMinderResult<()> {
    match cmd {
        AuthCommand::SignUp { email, password, name } => {
            auth.sign_up(&email, &password, &name)?;
            println!("Account created. Run `medminder auth sign-in` to start a session.");
        }
        AuthCommand::SignIn { email, password } => {
            let session = auth.sign_in(&email, &password)?;
            let who = if session.display_name.is_empty() {
                &session.email
            } else {
                &session.display_name
            };
            println!("Welcome back, {}.", who);
        }
        AuthCommand::Status => {
            match auth.session() {
                Some(session) => println!(
                    "Signed in as {} since {}",
                    session.email,
                    session.started_at.format("%Y-%m-%d %H:%M")
                ),
                None => println!("Not signed in."),
            }
            match store.active_profile() {
                Some(p) => println!("Active profile: {} ({})", p.name, p.id),
                None => println!("No active profile."),
            }
        }
    }
    Ok(())
}

fn require_active(store: &ProfileStore) -> MedMinderResult<&Profile> {
    store.active_profile().ok_or_else(|| {
        MedMinderError::validation(
            "profile",
            "no active profile; run `medminder profile create` or `medminder profile switch` first",
        )
    })
}

// ── Profiles ──────────────────────────────────────────────────────────────────

fn run_profile(store: &mut ProfileStore, cmd: ProfileCommand) -> MedMinderResult<()> {
    match cmd {
        ProfileCommand::Create(args) => {
            let new = NewProfile {
                email: args.email,
                phone: args.phone,
                emergency_contact: args.emergency_contact,
                medical_conditions: args.conditions,
                allergies: args.allergies,
                doctor_name: args.doctor_name,
                doctor_phone: args.doctor_phone,
                role: Some(args.role),
                ..NewProfile::new(args.name, args.age)
            };
            new.validate()?;
            let id = store.create_profile(new)?;
            println!("Created profile {}", id);
        }
        ProfileCommand::List => {
            let active = store.active_profile().map(|p| p.id.clone());
            let profiles = store.list_all_profiles()?;
            if profiles.is_empty() {
                println!("No profiles yet.");
            }
            for p in profiles {
                let marker = if Some(&p.id) == active.as_ref() { "*" } else { " " };
                println!(
                    "{} {}  {:<20} age {:<4} last active {}",
                    marker,
                    p.id,
                    p.name,
                    p.age,
                    p.last_active.format("%Y-%m-%d %H:%M")
                );
            }
        }
        ProfileCommand::Switch { id } => {
            if store.switch_profile(&ProfileId(id.clone()))? {
                println!("Switched to {}", require_active(store)?.name);
            } else {
                println!("No profile with id {}", id);
            }
        }
        ProfileCommand::Show => print_profile(require_active(store)?),
        ProfileCommand::Update(args) => {
            let update = ProfileUpdate {
                name: args.name,
                age: args.age,
                email: args.email,
                phone: args.phone,
                emergency_contact: args.emergency_contact,
                medical_conditions: args.conditions,
                allergies: args.allergies,
                doctor_name: args.doctor_name,
                doctor_phone: args.doctor_phone,
                role: args.role,
                ..Default::default()
            };
            if update.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            require_active(store)?;
            store.update_profile(update);
            // Profile edits are held in memory; persist them before exit.
            store.save()?;
            print_profile(require_active(store)?);
        }
    }
    Ok(())
}

fn print_profile(p: &Profile) {
    let role = match p.role {
        Some(Role::Caregiver) => "caregiver",
        _ => "patient",
    };
    println!("{} ({}, {})", p.name, p.age, role);
    println!("  id:                 {}", p.id);
    println!("  email / phone:      {} / {}", p.email, p.phone);
    println!("  emergency contact:  {}", p.emergency_contact);
    println!("  conditions:         {}", p.medical_conditions);
    println!("  allergies:          {}", p.allergies);
    println!("  doctor:             {} {}", p.doctor_name, p.doctor_phone);
    println!(
        "  today:              {}/{} taken, streak {}d, health score {}%",
        p.completed_today, p.total_medications, p.health_streak, p.health_score
    );
}

// ── Medications ───────────────────────────────────────────────────────────────

fn run_med(store: &mut ProfileStore, cmd: MedCommand) -> MedMinderResult<()> {
    require_active(store)?;

    match cmd {
        MedCommand::Add { name, dosage, frequency, time, kind, notes } => {
            let new = NewMedication { name, dosage, frequency, time, kind, notes };
            new.validate()?;
            if !FREQUENCIES.contains(&new.frequency.as_str()) {
                println!("Note: '{}' is not a standard frequency ({}).", new.frequency, FREQUENCIES.join(", "));
            }
            let name = new.name.clone();
            if let Some(id) = store.add_medication(new)? {
                println!("Added {} ({})", name, id);
            }
        }
        MedCommand::List => {
            let adherence = store.adherence();
            println!(
                "{}/{} taken today ({}%)",
                adherence.taken,
                adherence.total,
                adherence.percent()
            );
            for m in store.medications() {
                let status = match m.taken_at {
                    Some(at) if m.taken => format!("taken {}", at.format("%H:%M")),
                    _ if m.taken => "taken".to_string(),
                    _ => "pending".to_string(),
                };
                println!(
                    "  {}  {} {} - {} at {} [{}] {}",
                    m.id, m.name, m.dosage, m.frequency, m.time, m.kind, status
                );
                if !m.notes.is_empty() {
                    println!("      {}", m.notes);
                }
            }
        }
        MedCommand::Edit { id, name, dosage, frequency, time, kind, notes } => {
            let update = MedicationUpdate {
                name,
                dosage,
                frequency,
                time,
                kind,
                notes,
                taken: None,
            };
            if store.update_medication(&MedicationId(id.clone()), update)? {
                println!("Updated {}", id);
            } else {
                println!("No medication with id {}", id);
            }
        }
        MedCommand::Take { id } => {
            let id = MedicationId(id);
            match store.medication(&id).map(|m| (m.name.clone(), m.taken)) {
                None => println!("No medication with id {}", id),
                Some((name, true)) => println!("{} was already taken today.", name),
                Some((name, false)) => {
                    store.mark_medication_taken(&id)?;
                    println!("Great job taking your {}!", name);
                }
            }
        }
        MedCommand::Delete { id } => {
            if store.delete_medication(&MedicationId(id.clone()))? {
                println!("Deleted {}", id);
            } else {
                println!("No medication with id {}", id);
            }
        }
    }
    Ok(())
}

// ── Health metrics ────────────────────────────────────────────────────────────

fn run_metrics(store: &mut ProfileStore, cmd: MetricsCommand) -> MedMinderResult<()> {
    require_active(store)?;
    let now = SystemClock.now();

    match cmd {
        MetricsCommand::Show => {}
        MetricsCommand::Set { name, value } => {
            if !store.health_metrics().iter().any(|m| m.name == name) {
                println!("No metric named '{}'", name);
                return Ok(());
            }
            let updated = edit_metric_value(store.health_metrics(), &name, &value, now);
            store.update_health_metrics(updated)?;
        }
        MetricsCommand::Reading { name, progress } => {
            let progress = progress.unwrap_or_else(|| rand::random::<f64>() * 100.0);
            match record_reading(store.health_metrics(), &name, progress, now) {
                Some(updated) => {
                    store.update_health_metrics(updated)?;
                }
                None => {
                    println!("No metric named '{}'", name);
                    return Ok(());
                }
            }
        }
    }

    for m in store.health_metrics() {
        println!(
            "  {:<15} {:<10} {:<8} {:>5.1}%  updated {}",
            m.name,
            m.value,
            m.status.to_string().to_uppercase(),
            m.progress,
            m.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

// ── Companion services ────────────────────────────────────────────────────────

fn run_ask(question: &str, language: Language) {
    let mut session = ChatSession::new(language, SystemClock.now());
    match session.send(question, SystemClock.now()) {
        Some(reply) => println!("{}", reply.text),
        None => println!("Please type a question."),
    }
}

fn print_pills(results: &[PillRecord]) {
    for p in results {
        let band = match ConfidenceBand::of(p.confidence) {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        };
        println!("{} ({}% match, {} confidence)", p.name, p.confidence, band);
        println!("  {}", p.description);
        println!("  dosage:       {}", p.dosage);
        println!("  uses:         {}", p.uses.join(", "));
        println!("  warnings:     {}", p.warnings.join(", "));
        println!("  side effects: {}", p.side_effects.join(", "));
    }
}

fn run_pill(cmd: PillCommand) {
    match cmd {
        PillCommand::Identify => {
            let results = pill::analyze(&mut rand::thread_rng());
            println!("Found {} possible matches", results.len());
            print_pills(&results);
        }
        PillCommand::Search { query } => match pill::search(&query.join(" ")) {
            Some(results) => {
                println!("Found {} matching medications", results.len());
                print_pills(&results);
            }
            None => println!("Enter a name or description to search for."),
        },
    }
}

fn run_voice(cmd: VoiceCommand, enabled: bool) {
    let assistant = VoiceAssistant::new(enabled);
    let command = match cmd {
        VoiceCommand::Listen => {
            let heard = voice::listen(&mut rand::thread_rng());
            println!("Heard: \"{}\"", heard);
            heard.to_string()
        }
        VoiceCommand::Say { command } => command.join(" "),
        VoiceCommand::Reminders => {
            for (i, r) in assistant.reminders().iter().enumerate() {
                let state = if r.active { "on " } else { "off" };
                println!("  [{}] {} {} {}", i, state, r.time, r.message);
            }
            return;
        }
    };

    let (intent, spoken) = assistant.handle_command(&command);
    match spoken {
        Some(text) => println!("({:?}) {}", intent, text),
        None => println!("({:?}) voice output disabled", intent),
    }
}

fn print_contacts(directory: &ContactDirectory) {
    println!("Emergency services:");
    for s in EMERGENCY_SERVICES {
        println!("  {:<5} {}", s.number, s.name);
    }
    println!("Contacts:");
    for c in directory.contacts() {
        println!("  [{}] {:<28} {:<16} {} ({:?})", c.id, c.name, c.phone, c.relationship, c.kind);
    }
}

fn print_onboarding() {
    println!();
    println!("Welcome to MedMinder");
    println!("====================");
    println!("  [1] Sign in:                 medminder auth sign-up ... / auth sign-in ...");
    println!("  [2] Create a profile:        medminder profile create --name <NAME> --age <AGE>");
    println!("  [3] Add your medications:    medminder med add ...");
    println!("  [4] Mark doses as taken:     medminder med take <ID>");
    println!("  [5] Track your vitals:       medminder metrics show");
    println!("  [6] Ask the assistant:       medminder ask \"...\"");
    println!();
    println!("Run `medminder onboarding dismiss` to hide this.");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use medminder_contracts::keys;
    use medminder_core::traits::KeyValueStore;

    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("medminder-cli-{}.json", uuid::Uuid::new_v4()))
    }

    fn cli(path: &Path, args: &[&str]) -> Cli {
        let mut argv = vec![
            "medminder".to_string(),
            "--data".to_string(),
            path.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(argv).unwrap()
    }

    fn sign_up_and_in(path: &Path) {
        run(cli(
            path,
            &["auth", "sign-up", "--email", "asha@example.com", "--password", "secret1", "--name", "Asha"],
        ))
        .unwrap();
        run(cli(path, &["auth", "sign-in", "--email", "asha@example.com", "--password", "secret1"])).unwrap();
    }

    #[test]
    fn profile_commands_are_refused_without_a_session() {
        let path = temp_path();

        for args in [
            &["profile", "list"][..],
            &["profile", "create", "--name", "Asha", "--age", "30"][..],
            &["med", "list"][..],
            &["metrics", "show"][..],
        ] {
            let err = run(cli(&path, args)).unwrap_err();
            assert!(matches!(err, MedMinderError::Auth { .. }), "{:?} was not gated", args);
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn signed_in_user_reaches_profiles_until_sign_out() {
        let path = temp_path();
        sign_up_and_in(&path);

        run(cli(&path, &["profile", "create", "--name", "Asha", "--age", "30"])).unwrap();
        run(cli(&path, &["med", "list"])).unwrap();

        run(cli(&path, &["sign-out"])).unwrap();
        let err = run(cli(&path, &["profile", "show"])).unwrap_err();
        assert!(matches!(err, MedMinderError::Auth { .. }));

        let backend = JsonFileStore::open(&path).unwrap();
        assert!(backend.get(keys::SESSION_KEY).unwrap().is_none());
        assert!(backend.get(keys::CURRENT_PROFILE_KEY).unwrap().is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_active_profile_does_not_block_other_commands() {
        let path = temp_path();
        sign_up_and_in(&path);

        let (good, bad) = {
            let backend = Arc::new(JsonFileStore::open(&path).unwrap());
            let mut store = ProfileStore::new(Box::new(Arc::clone(&backend)), Box::new(SystemClock));
            let good = store.create_profile(NewProfile::new("Ravi", "71")).unwrap();
            let bad = store.create_profile(NewProfile::new("Meera", "44")).unwrap();
            backend.set(&keys::medications_key(&bad), "[{broken").unwrap();
            (good, bad)
        };

        run(cli(&path, &["profile", "list"])).unwrap();
        run(cli(&path, &["profile", "switch", good.as_str()])).unwrap();

        let backend = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            backend.get(keys::CURRENT_PROFILE_KEY).unwrap().as_deref(),
            Some(good.as_str())
        );
        assert_eq!(
            backend.get(&keys::medications_key(&bad)).unwrap().as_deref(),
            Some("[{broken")
        );
        drop(backend);

        run(cli(&path, &["sign-out"])).unwrap();

        fs::remove_file(&path).unwrap();
    }
}
