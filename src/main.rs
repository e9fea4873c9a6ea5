use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pyske_client::api::ApiClient;
use pyske_client::availability::{
    day_slots, select_slot, selectable_weekdays, window_for_date, SlotStatus,
};
use pyske_client::config::Config;
use pyske_client::models::{format_wire_date, parse_wire_date, AppointmentStatus, NewAppointment};
use pyske_client::transcription::{self, SessionEvent};

#[derive(Parser)]
#[command(name = "pyske", about = "Pyske appointment platform client", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List healthcare providers
    Providers,
    /// Show a provider's weekly work schedule
    Schedule { provider_id: String },
    /// Compute bookable slots for a provider on a date (YYYY-MM-DD)
    Slots { provider_id: String, date: String },
    /// Book an appointment slot
    Book {
        provider_id: String,
        patient_id: String,
        date: String,
        /// Slot label as shown by `slots`, e.g. "02:30 PM"
        slot: String,
        #[arg(long, default_value = "Hospital Visit")]
        visit_type: String,
        #[arg(long, default_value = "No")]
        insurance: String,
        #[arg(long)]
        reason: String,
    },
    /// List reviews for a provider
    Reviews { provider_id: String },
    /// Stream an audio file through the live transcription service
    Transcribe {
        user_id: String,
        input: PathBuf,
        #[arg(long, default_value_t = 3200)]
        chunk_bytes: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = ApiClient::new(&config.api)?;

    match cli.command {
        Command::Providers => {
            for provider in client.providers().await? {
                println!(
                    "{}  {}  {} ({} reviews){}",
                    provider.provider_id,
                    provider.name,
                    provider.average_rating,
                    provider.rating_count,
                    if provider.is_active { "" } else { "  [inactive]" },
                );
            }
        }
        Command::Schedule { provider_id } => {
            let schedule = client.work_schedule(&provider_id).await?;
            if schedule.is_empty() {
                println!("No work schedule on file for {provider_id}.");
                return Ok(());
            }
            for entry in &schedule {
                println!("{:<9} {} - {}", entry.week_day, entry.from_time, entry.to_time);
            }
            let mut days: Vec<String> = selectable_weekdays(&schedule)
                .into_iter()
                .map(|day| day.to_string())
                .collect();
            days.sort();
            println!("Selectable weekdays: {}", days.join(", "));
        }
        Command::Slots { provider_id, date } => {
            let date = parse_wire_date(&date).context("date must be YYYY-MM-DD")?;
            let snapshot = client.availability_snapshot(&provider_id).await?;
            let slots = day_slots(&snapshot.schedule, date, &snapshot.booked);
            if slots.is_empty() {
                println!("No slots available on {}.", format_wire_date(date));
                return Ok(());
            }
            for slot in &slots {
                let marker = match slot.status {
                    SlotStatus::Booked => "  [booked]",
                    _ => "",
                };
                println!("{}{marker}", slot.label);
            }
        }
        Command::Book {
            provider_id,
            patient_id,
            date,
            slot,
            visit_type,
            insurance,
            reason,
        } => {
            let date = parse_wire_date(&date).context("date must be YYYY-MM-DD")?;
            let snapshot = client.availability_snapshot(&provider_id).await?;
            let window = window_for_date(&snapshot.schedule, date)
                .context("provider has no schedule window on that weekday")?;

            let selection = match select_slot(&slot, date, window, &snapshot.booked) {
                Ok(selection) => selection,
                Err(taken) => {
                    // A taken slot is an ordinary answer, not a failure.
                    println!("{taken}");
                    return Ok(());
                }
            };

            let appointment = NewAppointment {
                provider_id,
                patient_id,
                appointment_date: format_wire_date(selection.date),
                appointment_time: selection.slot.clone(),
                week_day: selection.date.weekday().to_string(),
                status: AppointmentStatus::Scheduled,
                visit_type,
                insurance,
                reason_for_visit: reason,
            };
            client.create_appointment(&appointment).await?;
            info!(starts_at = %selection.starts_at, "appointment created");
            println!("Booked {} at {}.", format_wire_date(selection.date), selection.slot);
        }
        Command::Reviews { provider_id } => {
            let reviews = client.reviews_for_provider(&provider_id).await?;
            if reviews.is_empty() {
                println!("No reviews for this provider.");
                return Ok(());
            }
            for review in &reviews {
                println!("[{}] {}", review.created_at, review.review_text);
            }
        }
        Command::Transcribe {
            user_id,
            input,
            chunk_bytes,
        } => {
            let token = client.realtime_token(&user_id).await?;
            let mut handle = transcription::start(&config.voice, token);

            let audio = handle.audio_sender();
            let data = std::fs::read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut feeder = tokio::spawn(async move {
                for chunk in data.chunks(chunk_bytes.max(1)) {
                    if audio.send(chunk.to_vec()).await.is_err() {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            });

            loop {
                tokio::select! {
                    _ = &mut feeder => break,
                    event = handle.next_event() => match event {
                        Some(SessionEvent::Transcript(text)) => println!("{text}"),
                        Some(SessionEvent::State(state)) => info!(?state, "session"),
                        None => break,
                    },
                }
            }

            let transcript = handle.terminate().await?;
            println!("--\n{transcript}");
        }
    }

    Ok(())
}
