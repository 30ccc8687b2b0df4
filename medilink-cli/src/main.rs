//! Medilink CLI - command-line interface for the hospital appointment system
//!
//! Wires the API client and session manager together behind subcommands that
//! mirror the screens of the hospital front-end: sign in, browse doctors,
//! request and review meetings, and maintain records and prescriptions.

use chrono::{NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use medilink_client::{
    format_remaining, ApiClient, LogoutReason, SessionEvent, SessionManager, TokenStore,
};
use medilink_core::{
    default_config_path, init_logging, ErrorContext, MedicineUpsert, MedilinkConfig,
    MedilinkError, MedilinkResult, MeetingStatus, MeetingUpdate, NewAppointment, NewMedicalRecord,
    NewUser, Role,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "medilink")]
#[command(about = "Client for the hospital appointment management system")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and start a session
    Login {
        username: String,
        password: String,
    },

    /// Create a new account
    Register {
        username: String,
        email: String,
        password: String,

        /// Account role (patient or doctor)
        #[arg(long, default_value = "patient")]
        role: String,

        /// Full display name
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Sign out and clear the stored token
    Logout,

    /// Show the current session
    Status {
        /// Keep running and show the live expiry countdown
        #[arg(long)]
        watch: bool,
    },

    /// List doctors
    Doctors,

    /// List patients
    Patients,

    /// List user accounts (admin)
    Users,

    /// List meeting requests visible to the signed-in user
    Requests,

    /// Request an appointment with a doctor
    Request {
        doctor_id: i64,

        /// Appointment slot, e.g. 2026-09-15T14:00
        slot: String,

        /// Patient profile to book for; defaults to the signed-in user
        #[arg(long)]
        patient_id: Option<i64>,
    },

    /// Manage an existing meeting
    Meeting {
        #[command(subcommand)]
        command: MeetingCommands,
    },

    /// Manage medical records
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Manage medicines on a medical record
    Medicine {
        #[command(subcommand)]
        command: MedicineCommands,
    },

    /// Manage user accounts (admin)
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum MeetingCommands {
    /// Reschedule a meeting
    Update { id: i64, slot: String },

    /// Cancel a meeting
    Cancel { id: i64 },

    /// Move a meeting to a new status (pending, approved, rejected, completed)
    SetStatus { id: i64, status: String },

    /// Attach a medical record to a meeting
    AttachRecord {
        id: i64,
        description: String,

        #[arg(long)]
        doctor_id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// List all medical records
    List,

    /// Show one record with its medicines
    Show { id: i64 },

    /// Create a standalone record
    Create {
        description: String,

        #[arg(long)]
        doctor_id: Option<i64>,
    },

    /// Replace a record's description
    Update { id: i64, description: String },

    /// Delete a record
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum MedicineCommands {
    /// Prescribe a medicine on a record
    Add {
        record_id: i64,
        name: String,
        dosage: f64,
        frequency: String,
    },

    /// Update an existing prescription
    Update {
        id: i64,
        record_id: i64,
        name: String,
        dosage: f64,
        frequency: String,
    },

    /// Remove a prescription
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Replace a user account
    Update {
        id: i64,
        username: String,
        email: String,
        password: String,

        #[arg(long, default_value = "patient")]
        role: String,

        #[arg(long)]
        full_name: Option<String>,
    },

    /// Delete a user account
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            e.log();
            // The server's own detail message, not the debug dump
            eprintln!("Error: {}", e.user_message());
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> MedilinkResult<()> {
    let config = load_config(cli.config.as_ref())?;

    let mut logging_config = config.logging.clone();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config).map_err(|e| MedilinkError::Config {
        message: format!("Failed to initialize logging: {}", e),
        source: Some(e),
        context: ErrorContext::new("cli")
            .with_operation("init_logging")
            .with_suggestion("Check the [logging] section of the config file"),
    })?;

    info!("Starting Medilink CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Config { show, init } = &cli.command {
        return handle_config(&config, *show, *init);
    }

    let app = App::build(&config).await?;

    let result = app.dispatch(cli.command).await;
    if let Err(e) = &result {
        if e.invalidates_session() && app.session.is_authenticated().await {
            eprintln!("Your session is no longer valid; please sign in again.");
        }
        app.session.note_api_error(e).await;
    }
    result
}

impl App {
    async fn dispatch(&self, command: Commands) -> MedilinkResult<()> {
        match command {
            Commands::Login { username, password } => self.login(&username, &password).await,
            Commands::Register {
                username,
                email,
                password,
                role,
                full_name,
            } => self.register(username, email, password, &role, full_name).await,
            Commands::Logout => {
                self.logout().await;
                Ok(())
            }
            Commands::Status { watch } => self.status(watch).await,
            Commands::Doctors => self.doctors().await,
            Commands::Patients => self.patients().await,
            Commands::Users => self.users().await,
            Commands::Requests => self.requests().await,
            Commands::Request {
                doctor_id,
                slot,
                patient_id,
            } => self.request(doctor_id, &slot, patient_id).await,
            Commands::Meeting { command } => self.meeting(command).await,
            Commands::Record { command } => self.record(command).await,
            Commands::Medicine { command } => self.medicine(command).await,
            Commands::User { command } => self.user(command).await,
            Commands::Config { .. } => unreachable!("handled before session setup"),
        }
    }
}

fn load_config(config_path: Option<&PathBuf>) -> MedilinkResult<MedilinkConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
        return MedilinkConfig::from_file(path);
    }

    let default_paths = [default_config_path(), PathBuf::from("medilink.toml")];
    for path in &default_paths {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            return MedilinkConfig::from_file(path);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(MedilinkConfig::default())
}

fn handle_config(config: &MedilinkConfig, show: bool, init: bool) -> MedilinkResult<()> {
    if init {
        let path = default_config_path();
        config.save_to_file(&path)?;
        println!("Configuration written to {:?}", path);
        println!("Edit the file to point at your hospital API server.");
    }

    if show {
        let rendered = toml::to_string_pretty(config).map_err(|e| MedilinkError::Config {
            message: format!("Failed to render config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("cli").with_operation("config_show"),
        })?;
        println!("{}", rendered);
    }

    Ok(())
}

/// Everything a command handler needs: the API client and the live session
struct App {
    api: ApiClient,
    session: SessionManager,
}

impl App {
    async fn build(config: &MedilinkConfig) -> MedilinkResult<Self> {
        let api = ApiClient::new(config.api.clone())?;
        let store = TokenStore::new(config.session.resolved_token_path());
        let session = SessionManager::new(api.clone(), store, config.session.clone());
        // A stale or rejected stored token just means starting signed out
        session.initialize().await?;
        Ok(Self { api, session })
    }

    /// Current bearer token, or an error telling the user to sign in
    async fn require_token(&self) -> MedilinkResult<String> {
        self.session
            .token()
            .await
            .ok_or_else(|| MedilinkError::Token {
                message: "Not signed in".to_string(),
                context: ErrorContext::new("cli")
                    .with_suggestion("Run `medilink login <username> <password>` first"),
            })
    }

    async fn login(&self, username: &str, password: &str) -> MedilinkResult<()> {
        let issued = self.api.login(username, password).await?;
        self.session.login(&issued.access_token).await?;

        if let Some(snapshot) = self.session.snapshot().await {
            println!("Signed in as {} ({})", snapshot.user_name, snapshot.role);
            let remaining = (snapshot.expires_at - Utc::now().timestamp()).max(0);
            println!("Session expires in {}", format_remaining(remaining));
        }
        Ok(())
    }

    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
        role: &str,
        full_name: Option<String>,
    ) -> MedilinkResult<()> {
        let role = parse_role(role)?;
        if role == Role::Admin {
            return Err(MedilinkError::Validation {
                message: "Admin accounts are provisioned server-side".to_string(),
                field: Some("role".to_string()),
                context: ErrorContext::new("cli").with_operation("register"),
            });
        }

        let user = self
            .api
            .register(&NewUser {
                username,
                email,
                password,
                role,
                full_name,
            })
            .await?;
        println!("Account created: {} ({})", user.username, user.role);
        println!("Sign in with `medilink login {} <password>`", user.username);
        Ok(())
    }

    async fn logout(&self) {
        if self.session.is_authenticated().await {
            self.session.logout(LogoutReason::UserRequest).await;
            println!("Signed out.");
        } else {
            println!("Not signed in.");
        }
    }

    async fn status(&self, watch: bool) -> MedilinkResult<()> {
        let Some(snapshot) = self.session.snapshot().await else {
            println!("Not signed in.");
            return Ok(());
        };

        println!("Signed in as {} ({})", snapshot.user_name, snapshot.role);
        let remaining = (snapshot.expires_at - Utc::now().timestamp()).max(0);
        println!("Session expires in {}", format_remaining(remaining));

        if watch {
            self.watch_countdown().await;
        }
        Ok(())
    }

    /// Follow the live countdown until the session ends or the stream closes
    async fn watch_countdown(&self) {
        let mut countdown = self.session.countdown();
        let mut events = self.session.subscribe_events();

        loop {
            tokio::select! {
                changed = countdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = countdown.borrow().clone();
                    if let Some(remaining) = current {
                        print!("\rSession expires in {}  ", remaining);
                        let _ = std::io::stdout().flush();
                    }
                }
                event = events.recv() => {
                    match event {
                        Ok(SessionEvent::LoggedOut(reason)) => {
                            println!("\nSession ended: {}", reason);
                            break;
                        }
                        Ok(SessionEvent::LoggedIn(_)) => {}
                        Err(_) => break,
                    }
                }
            }
        }
    }

    async fn doctors(&self) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        let doctors = self.api.list_doctors(&token).await?;
        if doctors.is_empty() {
            println!("No doctors registered.");
            return Ok(());
        }
        println!("Doctors:");
        for doctor in &doctors {
            let confirmed = if doctor.is_confirmed { "" } else { " (unconfirmed)" };
            println!(
                "  #{} {} - {}{}",
                doctor.id,
                doctor.display_name(),
                doctor.specialty,
                confirmed
            );
        }
        Ok(())
    }

    async fn patients(&self) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        let patients = self.api.list_patients(&token).await?;
        if patients.is_empty() {
            println!("No patients registered.");
            return Ok(());
        }
        println!("Patients:");
        for patient in &patients {
            println!(
                "  #{} born {} - {}",
                patient.id, patient.date_of_birth, patient.phone_number
            );
        }
        Ok(())
    }

    async fn users(&self) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        let users = self.api.list_users(&token).await?;
        println!("User accounts:");
        for user in &users {
            let name = user.full_name.as_deref().unwrap_or("-");
            println!(
                "  #{} {} <{}> {} ({})",
                user.id, user.username, user.email, name, user.role
            );
        }
        Ok(())
    }

    async fn requests(&self) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        let snapshot = self.session.snapshot().await.ok_or_else(|| {
            MedilinkError::Token {
                message: "Not signed in".to_string(),
                context: ErrorContext::new("cli").with_operation("requests"),
            }
        })?;

        let meetings = match snapshot.role {
            Role::Doctor => self.api.doctor_requests(&token).await?,
            _ => self.api.patient_requests(&token).await?,
        };

        if meetings.is_empty() {
            println!("No meeting requests.");
            return Ok(());
        }
        println!("Meeting requests:");
        for meeting in &meetings {
            println!(
                "  #{} {} patient #{} with doctor #{} [{}], {} record(s)",
                meeting.id,
                meeting.scheduled_date,
                meeting.patient_id,
                meeting.doctor_id,
                meeting.status,
                meeting.medical_records.len()
            );
        }
        Ok(())
    }

    async fn request(
        &self,
        doctor_id: i64,
        slot: &str,
        patient_id: Option<i64>,
    ) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        let scheduled_date = parse_slot(slot)?;

        let patient_id = match patient_id {
            Some(id) => id,
            None => {
                self.session
                    .snapshot()
                    .await
                    .map(|s| s.user_id)
                    .ok_or_else(|| MedilinkError::Token {
                        message: "Not signed in".to_string(),
                        context: ErrorContext::new("cli").with_operation("request"),
                    })?
            }
        };

        let meeting = self
            .api
            .request_appointment(&token, patient_id, doctor_id, &NewAppointment { scheduled_date })
            .await?;
        println!(
            "Appointment #{} requested with doctor #{} for {} [{}]",
            meeting.id, meeting.doctor_id, meeting.scheduled_date, meeting.status
        );
        Ok(())
    }

    async fn meeting(&self, command: MeetingCommands) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        match command {
            MeetingCommands::Update { id, slot } => {
                let scheduled_date = parse_slot(&slot)?;
                let meeting = self
                    .api
                    .update_meeting(&token, id, &MeetingUpdate { scheduled_date })
                    .await?;
                println!("Meeting #{} moved to {}", meeting.id, meeting.scheduled_date);
            }
            MeetingCommands::Cancel { id } => {
                self.api.delete_meeting(&token, id).await?;
                println!("Meeting #{} cancelled", id);
            }
            MeetingCommands::SetStatus { id, status } => {
                let status: MeetingStatus =
                    status.parse().map_err(|e: String| MedilinkError::Validation {
                        message: e,
                        field: Some("status".to_string()),
                        context: ErrorContext::new("cli").with_operation("set_status"),
                    })?;
                let meeting = self.api.set_meeting_status(&token, id, status).await?;
                println!("Meeting #{} is now {}", meeting.id, meeting.status);
            }
            MeetingCommands::AttachRecord {
                id,
                description,
                doctor_id,
            } => {
                let record = self
                    .api
                    .attach_record(
                        &token,
                        id,
                        &NewMedicalRecord {
                            description,
                            doctor_id,
                        },
                    )
                    .await?;
                println!("Record #{} attached to meeting #{}", record.id, record.meeting_id);
            }
        }
        Ok(())
    }

    async fn record(&self, command: RecordCommands) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        match command {
            RecordCommands::List => {
                let records = self.api.list_medical_records(&token).await?;
                if records.is_empty() {
                    println!("No medical records.");
                    return Ok(());
                }
                println!("Medical records:");
                for record in &records {
                    println!(
                        "  #{} (meeting #{}) {} - {}",
                        record.id,
                        record.meeting_id,
                        record.created_at.format("%Y-%m-%d"),
                        record.description
                    );
                }
            }
            RecordCommands::Show { id } => {
                let record = self.api.get_medical_record(&token, id).await?;
                println!("Record #{} (meeting #{})", record.id, record.meeting_id);
                println!("Created: {}", record.created_at.format("%Y-%m-%d %H:%M"));
                println!("Description: {}", record.description);
                if record.medicines.is_empty() {
                    println!("No prescriptions.");
                } else {
                    println!("Prescriptions:");
                    for medicine in &record.medicines {
                        println!(
                            "  #{} {} {}mg, {}",
                            medicine.id, medicine.name, medicine.dosage, medicine.frequency
                        );
                    }
                }
            }
            RecordCommands::Create {
                description,
                doctor_id,
            } => {
                let record = self
                    .api
                    .create_medical_record(
                        &token,
                        &NewMedicalRecord {
                            description,
                            doctor_id,
                        },
                    )
                    .await?;
                println!("Record #{} created", record.id);
            }
            RecordCommands::Update { id, description } => {
                let record = self
                    .api
                    .update_medical_record(
                        &token,
                        id,
                        &NewMedicalRecord {
                            description,
                            doctor_id: None,
                        },
                    )
                    .await?;
                println!("Record #{} updated", record.id);
            }
            RecordCommands::Delete { id } => {
                self.api.delete_medical_record(&token, id).await?;
                println!("Record #{} deleted", id);
            }
        }
        Ok(())
    }

    async fn medicine(&self, command: MedicineCommands) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        match command {
            MedicineCommands::Add {
                record_id,
                name,
                dosage,
                frequency,
            } => {
                let record = self
                    .api
                    .add_medicine(
                        &token,
                        record_id,
                        &MedicineUpsert {
                            id: None,
                            medical_record_id: record_id,
                            name,
                            dosage,
                            frequency,
                        },
                    )
                    .await?;
                println!(
                    "Prescription added; record #{} now lists {} medicine(s)",
                    record.id,
                    record.medicines.len()
                );
            }
            MedicineCommands::Update {
                id,
                record_id,
                name,
                dosage,
                frequency,
            } => {
                let record = self
                    .api
                    .update_medicine(
                        &token,
                        id,
                        &MedicineUpsert {
                            id: Some(id),
                            medical_record_id: record_id,
                            name,
                            dosage,
                            frequency,
                        },
                    )
                    .await?;
                println!("Prescription #{} updated on record #{}", id, record.id);
            }
            MedicineCommands::Delete { id } => {
                self.api.delete_medicine(&token, id).await?;
                println!("Prescription #{} removed", id);
            }
        }
        Ok(())
    }

    async fn user(&self, command: UserCommands) -> MedilinkResult<()> {
        let token = self.require_token().await?;
        match command {
            UserCommands::Update {
                id,
                username,
                email,
                password,
                role,
                full_name,
            } => {
                let role = parse_role(&role)?;
                let user = self
                    .api
                    .update_user(
                        &token,
                        id,
                        &NewUser {
                            username,
                            email,
                            password,
                            role,
                            full_name,
                        },
                    )
                    .await?;
                println!("User #{} updated: {} ({})", user.id, user.username, user.role);
            }
            UserCommands::Delete { id } => {
                self.api.delete_user(&token, id).await?;
                println!("User #{} deleted", id);
            }
        }
        Ok(())
    }
}

fn parse_role(value: &str) -> MedilinkResult<Role> {
    value.parse().map_err(|e: String| MedilinkError::Validation {
        message: e,
        field: Some("role".to_string()),
        context: ErrorContext::new("cli")
            .with_suggestion("Valid roles are patient, doctor and admin"),
    })
}

/// Parse an appointment slot in the `YYYY-MM-DDTHH:MM` form the scheduler uses
fn parse_slot(value: &str) -> MedilinkResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| MedilinkError::Validation {
            message: format!("Invalid appointment slot: {}", value),
            field: Some("slot".to_string()),
            context: ErrorContext::new("cli")
                .with_suggestion("Use the 2026-09-15T14:00 format"),
        })
}
