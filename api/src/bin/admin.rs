use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use ground_booking_api::config::app_config::AppConfig;
use ground_booking_api::config::mongo_config::setup_mongo;
use ground_booking_api::models::api::{BookingView, MemberView};
use ground_booking_api::repository::booking_repository::BookingRepository;
use ground_booking_api::repository::member_repository::MemberRepository;
use ground_booking_api::repository::MemberStore;
use ground_booking_api::services::booking_service::BookingService;
use ground_booking_api::services::membership_service::MembershipService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Operator tool for the membership and booking collections.
#[derive(Parser, Debug)]
#[command(name = "admin", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every member
    ListMembers,
    /// List every booking, newest first
    ListBookings,
    /// Membership and booking totals
    Stats,
    /// Show one member
    MemberInfo { email: String },
    /// Show one member's bookings
    MemberBookings { email: String },
    /// Soft-cancel a membership
    CancelMember { email: String },
    /// Write members as CSV (stdout when --out is omitted)
    ExportMembers {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write bookings as CSV (stdout when --out is omitted)
    ExportBookings {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Backfill fields missing from older member records
    Migrate,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ground_booking_api=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let client = setup_mongo(&config, "ground-booking-admin").await?;
    let db = client.database(&config.database_name);

    let members = Arc::new(MemberRepository::new(&db));
    let bookings = Arc::new(BookingRepository::new(&db));
    let memberships = MembershipService::new(members.clone(), bookings.clone());
    let booking_service = BookingService::new(members.clone(), bookings);

    match cli.command {
        Command::ListMembers => {
            let views = memberships.list().await?;
            println!("{} members", views.len());
            for member in &views {
                print_member_line(member);
            }
        }
        Command::ListBookings => {
            let all = booking_service.list().await?;
            println!("{} bookings", all.len());
            for booking in all.iter().map(BookingView::from) {
                print_booking_line(&booking);
            }
        }
        Command::Stats => {
            let stats = memberships.stats().await?;
            println!("total members:        {}", stats.total_members);
            println!("active members:       {}", stats.active_members);
            println!("monthly:              {}", stats.monthly_members);
            println!("pro-plus:             {}", stats.pro_plus_members);
            println!("yearly:               {}", stats.yearly_members);
            println!("total bookings:       {}", stats.total_bookings);
            println!("total savings:        {:.2}", stats.total_savings);
            println!("avg bookings/member:  {}", stats.average_bookings_per_member);
        }
        Command::MemberInfo { email } => {
            let member = memberships.get(&email).await?;
            println!("{}", serde_json::to_string_pretty(&member)?);
        }
        Command::MemberBookings { email } => {
            let history = booking_service.history(&email).await?;
            println!("{} bookings for {}", history.len(), email);
            for booking in &history {
                print_booking_line(booking);
            }
        }
        Command::CancelMember { email } => {
            memberships.cancel(&email).await?;
            println!("cancelled {}", email);
        }
        Command::ExportMembers { out } => {
            let views = memberships.list().await?;
            let written = write_csv(out.as_ref(), &views)?;
            eprintln!("exported {} members", written);
        }
        Command::ExportBookings { out } => {
            let views: Vec<BookingView> = booking_service
                .list()
                .await?
                .iter()
                .map(BookingView::from)
                .collect();
            let written = write_csv(out.as_ref(), &views)?;
            eprintln!("exported {} bookings", written);
        }
        Command::Migrate => {
            let updated = members.backfill_schema().await?;
            println!("backfilled {} member records", updated);
        }
    }
    Ok(())
}

fn print_member_line(member: &MemberView) {
    println!(
        "{:<32} {:<10} {:<9} {:>3}% bookings={} savings={:.2}",
        member.email,
        member.plan.as_deref().unwrap_or("-"),
        member.status,
        member.discount_percentage,
        member.total_bookings,
        member.total_savings
    );
}

fn print_booking_line(booking: &BookingView) {
    println!(
        "{} {:<32} {:<24} {:>9.2} -> {:>9.2}",
        booking.created_at.format("%Y-%m-%d %H:%M"),
        booking.email,
        booking.ground_name,
        booking.original_price,
        booking.final_price
    );
}

fn write_csv<T: serde::Serialize>(out: Option<&PathBuf>, rows: &[T]) -> Result<usize, BoxError> {
    let sink: Box<dyn Write> = match out {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
