//! ecusim CLI Client
//!
//! Interactive diagnostic tester for the simulated ECU.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use ecusim::network::ClientSession;
use ecusim::protocol::{format_hex, parse_hex, Response};
use ecusim::EcuError;
use tracing_subscriber::{fmt, EnvFilter};

/// ecusim CLI
#[derive(Parser, Debug)]
#[command(name = "ecusim-cli")]
#[command(about = "Diagnostic tester for the ecusim ECU simulator")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:5555")]
    server: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one request and print the response
    Send {
        /// Request bytes in hex, e.g. 22 F1 90
        #[arg(required = true)]
        bytes: Vec<String>,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let args = Args::parse();

    println!("Connecting to UDS server at {}...", args.server);
    let mut session = match ClientSession::connect(&args.server) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: cannot connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };
    println!("[+] Connected to server.");

    let result = match args.command {
        Some(Commands::Send { bytes }) => send_once(&mut session, &bytes.join(" ")),
        None => run_prompt(&mut session),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Single round trip for scripting
fn send_once(session: &mut ClientSession, text: &str) -> ecusim::Result<()> {
    let request = parse_hex(text)?;
    let response = session.send(&request)?;
    print_response(&response);
    Ok(())
}

/// Read-eval-print loop until `q`, EOF or disconnect
fn run_prompt(session: &mut ClientSession) -> ecusim::Result<()> {
    println!();
    println!("Enter UDS commands in hex, e.g.:");
    println!("  22 F1 90  => Read Data By Identifier (DID=F190)");
    println!("Type 'q' or 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("UDS> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let input = line.trim();

        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting client.");
            return Ok(());
        }

        let request = match parse_hex(input) {
            Ok(request) if request.is_empty() => continue,
            Ok(request) => request,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };

        match session.send(&request) {
            Ok(response) => print_response(&response),
            Err(EcuError::Disconnected) => {
                println!("[-] Server disconnected.");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
}

fn print_response(response: &[u8]) {
    println!("Response: {}", format_hex(response));
    if let Some(Response::Negative { service_id, nrc }) = Response::decode(response) {
        println!(
            "  negative response to SID 0x{:02X}: {} (0x{:02X})",
            service_id,
            nrc,
            u8::from(nrc)
        );
    }
}
