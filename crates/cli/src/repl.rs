use std::io::{self, BufRead};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver};

use facecam_core::overlay::infrastructure::overlay_renderer::OverlayRenderer;
use facecam_core::ui::ui_state_machine::{PumpReport, UiSnapshot, UiStateMachine};

use crate::command::Command;
use crate::render;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Reads stdin lines on a background thread. The channel closes at EOF.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = crossbeam_channel::unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Lines describing what one pump changed: the freshly applied
/// recognition result, then every message posted since the last pump.
fn change_lines(report: &PumpReport, snapshot: &UiSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    if report.recognition_applied() {
        if let Some(outcome) = &snapshot.outcome {
            lines.extend(render::outcome_lines(outcome).into_iter().map(|l| format!("  {l}")));
        }
        if let Some(rect) = &snapshot.overlay {
            lines.push(format!("  {}", render::overlay_line(rect)));
        }
    }
    lines.extend(report.messages.iter().map(render::status_line));
    lines
}

pub fn run(ui: &mut UiStateMachine) -> Result<(), Box<dyn std::error::Error>> {
    let commands = spawn_stdin_reader();
    let ticker = crossbeam_channel::tick(TICK_INTERVAL);
    let renderer = OverlayRenderer::default();

    println!("{}", render::HELP);
    loop {
        select! {
            recv(commands) -> line => match line {
                Ok(line) => match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(ui, command, &renderer, Instant::now()),
                    Err(e) => eprintln!("{e}"),
                },
                Err(_) => {
                    log::debug!("stdin closed");
                    break;
                }
            },
            recv(ticker) -> _ => {}
        }

        let now = Instant::now();
        let report = ui.pump(now);
        for line in change_lines(&report, &ui.snapshot(now)) {
            println!("{line}");
        }
    }

    ui.stop_camera();
    Ok(())
}

fn execute(ui: &mut UiStateMachine, command: Command, renderer: &OverlayRenderer, now: Instant) {
    match command {
        Command::Devices => match ui.devices() {
            Ok(devices) => {
                for device in &devices {
                    println!("{}", render::device_line(device));
                }
            }
            Err(e) => eprintln!("{e}"),
        },
        Command::Facing(facing) => {
            if ui.select_facing_mode(facing) {
                println!("Facing: {facing}");
            } else {
                eprintln!("Stop the camera before changing the facing mode");
            }
        }
        Command::Start => {
            if let Ok(id) = ui.start_camera(now) {
                let session = ui.camera_session();
                println!("Camera {id} started ({})", session.facing_mode);
            }
        }
        Command::Stop => {
            if ui.stop_camera() {
                println!("Camera stopped");
            }
        }
        Command::Register => {
            if ui.begin_register(now).is_ok() {
                println!("Registering: enter 'name <text>' then 'submit', or 'cancel'");
            }
        }
        Command::Name(name) => {
            if !ui.set_register_name(&name) {
                eprintln!("Use 'register' first");
            }
        }
        Command::Submit => {
            if let Ok(ticket) = ui.submit_register(now) {
                log::debug!("Submitted {ticket}");
            }
        }
        Command::Cancel => {
            if ui.cancel_register() {
                println!("Registration cancelled");
            }
        }
        Command::Recognize => {
            if let Ok(ticket) = ui.recognize(now) {
                log::debug!("Submitted {ticket}");
            }
        }
        Command::Status => {
            for line in render::snapshot_lines(&ui.snapshot(now)) {
                println!("{line}");
            }
        }
        Command::Overlay(path) => {
            let display = ui.display_size();
            let overlay = ui.overlay().copied();
            let written = ui
                .current_frame()
                .map_err(|e| e.to_string())
                .and_then(|frame| {
                    renderer
                        .render_to_file(&path, &frame, display, overlay.as_ref())
                        .map_err(|e| e.to_string())
                });
            match written {
                Ok(()) => println!("Saved {}", path.display()),
                Err(e) => eprintln!("Failed to save overlay: {e}"),
            }
        }
        Command::Display(display) => {
            ui.set_display_size(display);
            println!("Display: {display}");
        }
        Command::Help => println!("{}", render::HELP),
        Command::Quit => {}
    }
}
