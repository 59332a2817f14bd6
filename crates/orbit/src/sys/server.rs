use crate::events::{AppEvent, Button, Input, Key, UnknownKey};
use crate::wallpaper::WallpaperStyle;
use async_channel::Sender;
use orbitctl::geometry::Point;
use orbitctl::registry::AppId;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/orbit.sock";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Bad quoting: {0}")]
    Quoting(String),
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    Arguments {
        command: String,
        expected: &'static str,
    },
    #[error("Not a number: '{0}'")]
    Number(String),
    #[error(transparent)]
    Key(#[from] UnknownKey),
    #[error("Unknown button '{0}'")]
    Button(String),
    #[error("Unknown wallpaper style '{0}'")]
    Style(String),
}

/// A parsed line: either an event for the shell or a state query.
#[derive(Debug, Clone)]
pub enum Request {
    Event(AppEvent),
    Dump,
}

fn number(word: &str) -> Result<f64, CommandError> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandError::Number(word.to_string()))
}

fn point(command: &str, args: &[String]) -> Result<Point, CommandError> {
    match args {
        [x, y, ..] => Ok(Point::new(number(x)?, number(y)?)),
        _ => Err(CommandError::Arguments {
            command: command.to_string(),
            expected: "X Y",
        }),
    }
}

fn app_id(command: &str, args: &[String]) -> Result<AppId, CommandError> {
    match args {
        [id] => Ok(AppId::new(id.clone())),
        _ => Err(CommandError::Arguments {
            command: command.to_string(),
            expected: "an application id",
        }),
    }
}

pub fn parse_command(line: &str) -> Result<Request, CommandError> {
    let words = shell_words::split(line).map_err(|e| CommandError::Quoting(e.to_string()))?;
    let Some((command, args)) = words.split_first() else {
        return Err(CommandError::Empty);
    };
    let command = command.to_ascii_lowercase();
    let event = match command.as_str() {
        "show" => AppEvent::Show,
        "hide" => AppEvent::Hide,
        "toggle" => AppEvent::Toggle,
        "dump" => return Ok(Request::Dump),
        "move" => AppEvent::Input(Input::PointerMove(point(&command, args)?)),
        "down" => {
            let button = match args.get(2) {
                Some(b) => b
                    .parse::<Button>()
                    .map_err(|_| CommandError::Button(b.clone()))?,
                None => Button::Primary,
            };
            AppEvent::Input(Input::PointerDown(point(&command, args)?, button))
        }
        "up" => AppEvent::Input(Input::PointerUp(point(&command, args)?)),
        "dblclick" => AppEvent::Input(Input::DoubleClick(point(&command, args)?)),
        "key" => match args {
            [name] => AppEvent::Input(Input::Key(name.parse::<Key>()?)),
            _ => {
                return Err(CommandError::Arguments {
                    command,
                    expected: "a key name",
                });
            }
        },
        "launch" => AppEvent::Launch(app_id(&command, args)?),
        "pin" => AppEvent::Pin(app_id(&command, args)?),
        "unpin" => AppEvent::Unpin(app_id(&command, args)?),
        "reorder" => match args {
            [from, to] => AppEvent::MovePin {
                from: AppId::new(from.clone()),
                to: AppId::new(to.clone()),
            },
            _ => {
                return Err(CommandError::Arguments {
                    command,
                    expected: "FROM TO",
                });
            }
        },
        "wallpaper" => {
            let Some(style) = args.first() else {
                return Err(CommandError::Arguments {
                    command,
                    expected: "STYLE [THEME]",
                });
            };
            let style = style
                .parse::<WallpaperStyle>()
                .map_err(|_| CommandError::Style(style.clone()))?;
            let theme = args
                .get(1)
                .map(|t| {
                    t.parse::<usize>()
                        .map_err(|_| CommandError::Number(t.clone()))
                })
                .transpose()?;
            AppEvent::Wallpaper { style, theme }
        }
        _ => return Err(CommandError::Unknown(command)),
    };
    Ok(Request::Event(event))
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut lines = BufReader::new(read).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_command(&line) {
                            Ok(Request::Event(event)) => {
                                if tx.send(event).await.is_err() {
                                    break;
                                }
                            }
                            Ok(Request::Dump) => {
                                let (reply_tx, reply_rx) = async_channel::bounded(1);
                                if tx.send(AppEvent::Dump(reply_tx)).await.is_err() {
                                    break;
                                }
                                if let Ok(json) = reply_rx.recv().await
                                    && let Err(e) = write.write_all(format!("{json}\n").as_bytes()).await
                                {
                                    log::warn!("Failed to answer dump: {}", e);
                                }
                            }
                            Err(CommandError::Empty) => {}
                            Err(e) => log::warn!("Ignoring '{}': {}", line.trim(), e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
