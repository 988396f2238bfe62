//! Cooperative main loop: low-latency command processing alternating with
//! a timer-gated scan cycle.
//!
//! Single-threaded by design — `MonitorState` is only ever touched from
//! this loop, so no locking exists anywhere. The command long-poll is the
//! loop's pause; the scan timer is a monotonic next-eligible instant
//! always recomputed from *now*, so an overrunning cycle never causes
//! back-to-back catch-up scans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::bot::{CommandChannel, Notifier};
use crate::monitor::{commands, scan, MonitorState, Phase};
use crate::portal::slots::SlotDefinition;
use crate::portal::CoursePortal;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Cadence between scan cycles.
    pub scan_interval: Duration,
    /// Upper bound on the command long-poll per iteration.
    pub poll_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(15 * 60),
            poll_timeout: Duration::from_secs(5),
        }
    }
}

/// Poll the command channel once and apply every operator message to the
/// state. Messages from other senders are dropped here — their updates
/// already advanced the channel cursor. Poll failures are reported to the
/// operator and never propagate.
pub fn drain_commands<C>(
    channel: &mut C,
    state: &mut MonitorState,
    notifier: &dyn Notifier,
    is_operator: &dyn Fn(i64) -> bool,
    timeout: Duration,
) where
    C: CommandChannel + ?Sized,
{
    let messages = match channel.poll(timeout) {
        Ok(messages) => messages,
        Err(err) => {
            warn!(error = %err, "command poll failed");
            notifier.notify(&format!("⚠️ Error reading commands: {err}"));
            return;
        }
    };

    for message in messages {
        if !is_operator(message.chat_id) {
            debug!(chat_id = message.chat_id, "ignoring non-operator message");
            continue;
        }
        commands::handle_message(state, &message.text, notifier);
    }
}

/// Run the loop until `shutdown` is set.
///
/// Per iteration: commands first, then the scan decision — a `/stop`
/// received in an iteration always prevents that iteration's scan, even
/// with the timer elapsed. The first scan after courses are submitted is
/// due immediately.
pub fn run<C, P, N>(
    channel: &mut C,
    portal: &P,
    notifier: &N,
    slots: &[SlotDefinition],
    is_operator: &dyn Fn(i64) -> bool,
    config: SchedulerConfig,
    shutdown: &AtomicBool,
) where
    C: CommandChannel,
    P: CoursePortal,
    N: Notifier,
{
    let mut state = MonitorState::new();
    let mut next_due = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        drain_commands(channel, &mut state, notifier, is_operator, config.poll_timeout);

        if state.phase() == Phase::Scanning && Instant::now() >= next_due {
            scan::run_cycle(&mut state, portal, slots, notifier, |mid_cycle| {
                // Zero-timeout drain: the cooperative cancellation point
                // before each slot.
                drain_commands(channel, mid_cycle, notifier, is_operator, Duration::ZERO);
            });
            next_due = Instant::now() + config.scan_interval;
        }
    }
}
