//! Basic usage example for the exasol-client driver.
//!
//! Run with `RUST_LOG=exasol_client=debug` to see every command sent.

use exasol_client::{Connection, ConnectionParams, Parameter};
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HOST: &str = "localhost";
const PORT: u16 = 8563;
const USER: &str = "sys";
const PASSWORD: &str = "exasol";
const VALIDATE_CERT: bool = false; // Set to false for Docker/self-signed certs
const SCHEMA: &str = "exasol_client_demo";

/// Establishes a connection with autocommit disabled.
async fn example_connection() -> Result<Connection, Box<dyn Error>> {
    let conn_string = format!(
        "exasol://{}:{}@{}:{}?tls=1&validateservercertificate={}&autocommit=0",
        USER, PASSWORD, HOST, PORT, VALIDATE_CERT as u8
    );
    let params: ConnectionParams = conn_string.parse()?;
    Ok(Connection::connect(params).await?)
}

/// Executes a simple arithmetic query and returns the result.
async fn example_simple_select(conn: &mut Connection) -> Result<String, Box<dyn Error>> {
    let mut rows = conn.query("SELECT 1+1", &[]).await?;
    let value = rows.next().and_then(|row| row.into_iter().next());
    Ok(value.map(|v| v.to_string()).unwrap_or_default())
}

/// Creates a table, inserts rows with bound values inside a transaction, reads them back.
async fn example_transaction(conn: &mut Connection) -> Result<usize, Box<dyn Error>> {
    conn.exec(&format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA), &[])
        .await?;
    conn.exec(
        &format!(
            "CREATE OR REPLACE TABLE {}.test_example (id INT, name VARCHAR(100))",
            SCHEMA
        ),
        &[],
    )
    .await?;

    let mut tx = conn.begin()?;
    let inserted = tx
        .exec(
            &format!("INSERT INTO {}.test_example VALUES (?, ?)", SCHEMA),
            &[
                Parameter::from(1),
                Parameter::from("Alice"),
                Parameter::from(2),
                Parameter::from("Bob"),
                Parameter::from(3),
                Parameter::from("Charlie"),
            ],
        )
        .await?;
    println!("Inserted {} row(s)", inserted.rows_affected());
    tx.commit().await?;

    let rows = conn
        .query(
            &format!("SELECT id, name FROM {}.test_example ORDER BY id", SCHEMA),
            &[],
        )
        .await?;
    println!("Columns: {:?}", rows.column_names());
    let mut count = 0;
    for row in rows {
        println!("  {:?}", row);
        count += 1;
    }

    conn.exec(&format!("DROP SCHEMA {} CASCADE", SCHEMA), &[])
        .await?;
    conn.exec("COMMIT", &[]).await?;
    Ok(count)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exasol_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut conn = example_connection().await?;
    if let Some(session) = conn.session() {
        println!(
            "Connected: session {} on {} {}",
            session.session_id, session.product_name, session.release_version
        );
    }

    let value = example_simple_select(&mut conn).await?;
    println!("Simple select: {}", value);

    let rows = example_transaction(&mut conn).await?;
    println!("Transaction: {} row(s)", rows);

    conn.close().await?;
    println!("Done");

    Ok(())
}
