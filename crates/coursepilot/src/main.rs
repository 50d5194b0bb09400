//! Plays a chat transport feed through a transcript view and paints every
//! frame to the terminal.

#[macro_use]
extern crate tracing;

use std::env;
use std::future::pending;
use std::io::IsTerminal as _;
use std::time::Duration;

use coursepilot::core::model::TransportEvent;
use coursepilot::core::{Frame, ProgressVariant, TranscriptViewBuilder, ViewConfig, ViewConfigBuilder};
use coursepilot::transport::preset;
use coursepilot::{Input, Painter, parse_feed, parse_input};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

const DEMO_FEED: &str = "--demo";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let variant = match env::var("COURSEPILOT_PROGRESS") {
        Ok(value) => match value.parse::<ProgressVariant>() {
            Ok(variant) => variant,
            Err(err) => {
                eprintln!("COURSEPILOT_PROGRESS: {err}");
                return;
            }
        },
        Err(_) => ProgressVariant::default(),
    };
    let config = ViewConfigBuilder::default()
        .with_progress_variant(variant)
        .build();

    let feed = env::var("COURSEPILOT_FEED")
        .ok()
        .or_else(|| env::args().nth(1));
    let mut script = match feed.as_deref() {
        None => None,
        Some(DEMO_FEED) => Some(
            preset::course_lookup("CS 3114", preset::sample_course_info()).spawn(),
        ),
        Some(path) => {
            let text = match tokio::fs::read_to_string(path).await {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("cannot read {path}: {err}");
                    return;
                }
            };
            match parse_feed(&text) {
                Ok(transport) => Some(transport.spawn()),
                Err(err) => {
                    eprintln!("{path}: {err}");
                    return;
                }
            }
        }
    };

    let painter = Painter::from_env();
    let clear_screen = std::io::stdout().is_terminal();

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let view = TranscriptViewBuilder::new()
        .with_config(config.clone())
        .on_render(move |frame| {
            frame_tx.send(frame.clone()).ok();
        })
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar: Option<ProgressBar> = None;
    let mut last_frame = None;

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        if let Some(progress_bar) = &progress_bar {
            progress_bar.inc(1);
        }

        let tick = sleep(Duration::from_millis(100));
        select! {
            frame = frame_rx.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                // Finish the spinner before painting anything else.
                if let Some(progress_bar) = progress_bar.take() {
                    progress_bar.finish_and_clear();
                }
                paint(&painter, &frame, &config, clear_screen);
                progress_bar = spinner_message(&frame).map(|message| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message(message);
                    progress_bar
                });
                last_frame = Some(frame);
            }
            event = next_event(&mut script) => match event {
                Some(event) => {
                    if view.deliver(event).is_err() {
                        break;
                    }
                }
                None => {
                    debug!("feed finished");
                    script = None;
                }
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_input(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Event(event))) => {
                        view.deliver(event).ok();
                    }
                    Ok(Some(Input::Toggle { tool_call_id, row })) => {
                        view.toggle_course(tool_call_id, row).ok();
                    }
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                },
                Ok(None) => stdin_open = false,
                Err(err) => {
                    error!("error reading input: {err}");
                    stdin_open = false;
                }
            },
            _ = tick => {}
        }

        if !stdin_open && script.is_none() {
            break;
        }
    }

    if let Some(progress_bar) = progress_bar {
        progress_bar.finish_and_clear();
    }
    // Frames rendered after the last one we painted.
    if let Ok(frame) = view.frame().await {
        if last_frame.as_ref() != Some(&frame) {
            paint(&painter, &frame, &config, clear_screen);
        }
    }
    view.unmount().await;
}

async fn next_event(
    script: &mut Option<mpsc::UnboundedReceiver<TransportEvent>>,
) -> Option<TransportEvent> {
    match script {
        Some(rx) => rx.recv().await,
        None => pending().await,
    }
}

fn paint(painter: &Painter, frame: &Frame, config: &ViewConfig, clear_screen: bool) {
    let painted = painter.paint_frame(frame, config);
    if clear_screen {
        print!("\x1b[2J\x1b[H");
        println!("{painted}");
    } else {
        println!("{painted}\n");
    }
}

fn spinner_message(frame: &Frame) -> Option<&'static str> {
    if frame.has_pending() {
        Some("🔎 Looking things up...")
    } else if frame.thinking {
        Some("🤔 Thinking...")
    } else {
        None
    }
}
