use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::Duration;

use expense_tracker::{
    PasswordHash, ValidatedPassword, create_user,
    expense::{Category, NewExpense, create_expense},
    initialize_db, today_in,
};

/// A utility for creating a test database for the expense tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The timezone used to decide which day is today.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password-for-testing";

/// Days ago, amount, category and note for each sample expense.
const SAMPLE_EXPENSES: [(i64, f64, Category, &str); 10] = [
    (0, 12.5, Category::Food, "Lunch"),
    (2, 64.2, Category::Food, "Groceries"),
    (5, 120.0, Category::Bills, "Power"),
    (9, 15.99, Category::Entertainment, "Streaming"),
    (21, 45.0, Category::Travel, "Train tickets"),
    (34, 89.9, Category::Food, "Dinner out"),
    (40, 1450.0, Category::Bills, "Rent"),
    (47, 30.0, Category::Other, ""),
    (66, 320.75, Category::Travel, "Hotel"),
    (72, 25.0, Category::Entertainment, "Concert"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let today = today_in(&args.timezone)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo user {DEMO_EMAIL} with password {DEMO_PASSWORD:?}...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(DEMO_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("Demo", DEMO_EMAIL, password_hash, &conn)?;

    println!("Creating {} sample expenses...", SAMPLE_EXPENSES.len());

    for (days_ago, amount, category, note) in SAMPLE_EXPENSES {
        let expense = NewExpense::new(amount, today - Duration::days(days_ago))?
            .category(category)
            .note(note);
        create_expense(user.id, expense, &conn)?;
    }

    println!("Success!");

    Ok(())
}
