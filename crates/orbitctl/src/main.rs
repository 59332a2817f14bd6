use clap::{Parser, Subcommand, ValueEnum};
use orbitctl::registry::AppRegistry;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

const SOCKET_PATH: &str = "/tmp/orbit.sock";

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ButtonArg {
    Primary,
    Secondary,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the launcher at the pointer
    Show,
    /// Close the launcher
    Hide,
    /// Toggle the launcher, as the launcher key would
    Toggle,
    /// Move the simulated pointer
    Move { x: f64, y: f64 },
    /// Press a pointer button
    Down {
        x: f64,
        y: f64,
        #[arg(value_enum, default_value = "primary")]
        button: ButtonArg,
    },
    /// Release the pointer button
    Up { x: f64, y: f64 },
    /// Press and release the primary button
    Click { x: f64, y: f64 },
    Dblclick { x: f64, y: f64 },
    /// Send a key, e.g. `escape`, `tab`, `left` or a single character
    Key { name: String },
    /// Launch an application by id
    Launch { id: String },
    Pin { id: String },
    Unpin { id: String },
    /// Move pinned app FROM to the ring position of pinned app TO
    Reorder { from: String, to: String },
    /// Pick a wallpaper style and optional theme index
    Wallpaper { style: String, theme: Option<usize> },
    /// Print the shell state as JSON
    Dump,
    /// List known applications, optionally filtered by a search query
    Apps { query: Option<String> },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command(&["show"]),
        Commands::Hide => send_command(&["hide"]),
        Commands::Toggle => send_command(&["toggle"]),
        Commands::Move { x, y } => send_command(&["move", &x.to_string(), &y.to_string()]),
        Commands::Down { x, y, button } => {
            let button = match button {
                ButtonArg::Primary => "primary",
                ButtonArg::Secondary => "secondary",
            };
            send_command(&["down", &x.to_string(), &y.to_string(), button])
        }
        Commands::Up { x, y } => send_command(&["up", &x.to_string(), &y.to_string()]),
        Commands::Click { x, y } => {
            let (x, y) = (x.to_string(), y.to_string());
            send_command(&["down", &x, &y])?;
            send_command(&["up", &x, &y])
        }
        Commands::Dblclick { x, y } => {
            send_command(&["dblclick", &x.to_string(), &y.to_string()])
        }
        Commands::Key { name } => send_command(&["key", &name]),
        Commands::Launch { id } => send_command(&["launch", &id]),
        Commands::Pin { id } => send_command(&["pin", &id]),
        Commands::Unpin { id } => send_command(&["unpin", &id]),
        Commands::Reorder { from, to } => send_command(&["reorder", &from, &to]),
        Commands::Wallpaper { style, theme } => match theme {
            Some(theme) => send_command(&["wallpaper", &style, &theme.to_string()]),
            None => send_command(&["wallpaper", &style]),
        },
        Commands::Dump => dump(),
        Commands::Apps { query } => {
            list_apps(query.as_deref());
            Ok(())
        }
    }
}

fn list_apps(query: Option<&str>) {
    let registry = AppRegistry::builtin();
    let apps = match query {
        Some(q) if !q.trim().is_empty() => registry.search(q),
        _ => registry.apps().iter().collect(),
    };
    for app in apps {
        println!(
            "{:<14} {:<16} {:<9} {}",
            app.id,
            app.label,
            app.category,
            if app.pinned { "pinned" } else { "" }
        );
    }
}

fn connect() -> anyhow::Result<UnixStream> {
    UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to orbit daemon at {}: {}. Is orbit running?",
            SOCKET_PATH,
            e
        )
    })
}

fn send_command(words: &[&str]) -> anyhow::Result<()> {
    let mut stream = connect()?;
    let line = shell_words::join(words);
    log::debug!("Sending '{}'", line);
    writeln!(stream, "{}", line)?;
    Ok(())
}

fn dump() -> anyhow::Result<()> {
    let mut stream = connect()?;
    writeln!(stream, "dump")?;
    let mut reply = String::new();
    BufReader::new(&stream).read_line(&mut reply)?;
    if reply.is_empty() {
        anyhow::bail!("orbit daemon closed the connection without replying");
    }
    let state: serde_json::Value = serde_json::from_str(reply.trim())?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
