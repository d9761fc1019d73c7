//! An example showcasing how to attach cue points to a player, which reports its playback
//! position via a status event channel.

use std::{sync::Arc, thread, time::Duration};

use crossbeam_channel::Sender;

use cuepoint::{cue_offsets, CueTracker, Error, ManualPlaybackSource, PlaybackEvent, TaskQueue};

// -------------------------------------------------------------------------------------------------

// Common demo code
#[path = "./common/arguments.rs"]
mod arguments;

// -------------------------------------------------------------------------------------------------

/// Status events of the simulated player.
enum PlayerStatusEvent {
    Started { duration: f64 },
    Position { position: Duration },
    Stopped,
}

/// Simulates a player, which reports its playback position in the given rate.
fn simulate_playback(
    duration: f64,
    report_rate: Duration,
    status_sender: Sender<PlayerStatusEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if status_sender
            .send(PlayerStatusEvent::Started { duration })
            .is_err()
        {
            return;
        }
        let mut position = Duration::ZERO;
        while position.as_secs_f64() < duration {
            thread::sleep(report_rate);
            position += report_rate;
            if status_sender
                .send(PlayerStatusEvent::Position { position })
                .is_err()
            {
                return;
            }
        }
        let _ = status_sender.send(PlayerStatusEvent::Stopped);
    })
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Error> {
    // Parse optional arguments
    let args = arguments::parse();
    let duration = args.duration.unwrap_or(10.0);
    let report_rate = Duration::from_millis(args.report_rate.unwrap_or(250).max(1));

    // Create a playback source which mirrors the player's state, and an event loop task queue
    let source = Arc::new(ManualPlaybackSource::new());
    let queue = TaskQueue::new();

    // Create cue points
    let tracker = CueTracker::new(Arc::clone(&source), queue.sender())?;
    tracker.add(cue_offsets![1, 2.5, "25%", "50%", "75%"], |event| {
        println!("Reached cue point '{}'", event.offset);
    });
    tracker.add(Duration::from_secs(5), |_| println!("Five seconds in"));
    tracker.add("100%", |_| println!("Reached the end"));

    // Start playing
    let (status_sender, status_receiver) = crossbeam_channel::bounded(32);
    let player_thread = simulate_playback(duration, report_rate, status_sender);

    // Run the event loop: apply player status changes, then run handlers of triggered cues
    while let Ok(event) = status_receiver.recv() {
        match event {
            PlayerStatusEvent::Started { duration } => {
                println!("Playback of {duration}s started");
                source.set_duration(duration);
                source.set_current_time(0.0);
                source.dispatch(PlaybackEvent::Playing);
            }
            PlayerStatusEvent::Position { position } => {
                source.set_current_time(position.as_secs_f64());
                source.dispatch(PlaybackEvent::TimeUpdate);
            }
            PlayerStatusEvent::Stopped => {
                println!("Playback finished");
            }
        }
        queue.run_pending();
    }

    // Stop listening to the player
    tracker.dispose();

    if let Err(err) = player_thread.join() {
        std::panic::resume_unwind(err);
    }

    Ok(())
}
