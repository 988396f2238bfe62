//! One scan cycle: login, walk the slot catalog in declared order, apply
//! the found predicate, and report the cycle outcome to the operator.

use tracing::{info, warn};

use crate::bot::Notifier;
use crate::monitor::MonitorState;
use crate::portal::extract::{extract, Vacancy};
use crate::portal::slots::SlotDefinition;
use crate::portal::{CoursePortal, SlotListings};

/// A course is considered actionable only with strictly more than one
/// reported seat.
const FOUND_THRESHOLD: u32 = 1;

/// Run one scan cycle over `slots` for every still-pending course.
///
/// `checkpoint` runs before each slot; in production it drains the command
/// channel, which makes the slot boundary the cooperative cancellation
/// point — a `/stop` takes effect within one slot-fetch's worth of
/// latency. A cycle aborted by cancellation ends silently (the command
/// reply is the notification), and a failed login aborts the cycle
/// without touching any record, so it can never produce false negatives.
pub fn run_cycle<P, N, F>(
    state: &mut MonitorState,
    portal: &P,
    slots: &[SlotDefinition],
    notifier: &N,
    mut checkpoint: F,
) where
    P: CoursePortal,
    N: Notifier + ?Sized,
    F: FnMut(&mut MonitorState),
{
    if state.pending().is_empty() {
        return;
    }

    let session = match portal.login() {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "login failed, cycle aborted");
            notifier.notify(&format!("❌ Login failed: {err}"));
            return;
        }
    };

    for slot in slots {
        checkpoint(state);
        if !state.is_enabled() {
            info!("monitoring disabled mid-cycle, aborting remaining slots");
            return;
        }

        // Recomputed each slot so newly-found courses drop out and the
        // first slot in declaration order wins.
        let pending = state.pending();
        if pending.is_empty() {
            break;
        }

        let markup = match session.slot_listing(slot) {
            Ok(Some(markup)) => markup,
            Ok(None) => continue,
            Err(err) => {
                warn!(slot = slot.name, error = %err, "slot fetch failed");
                notifier.notify(&format!("⚠️ Error fetching Slot {}: {err}", slot.name));
                continue;
            }
        };

        for (code, vacancy) in extract(&markup, &pending) {
            match vacancy {
                Vacancy::Seats(seats) if seats > FOUND_THRESHOLD => {
                    state.mark_found(&code, slot.name, seats);
                    info!(course = %code, slot = slot.name, seats, "course found");
                    notifier.notify(&format!(
                        "🎯 {code}: Found in Slot {} ✅ (Vacancy: {seats})",
                        slot.name
                    ));
                }
                Vacancy::Seats(seats) => {
                    notifier.notify(&format!(
                        "⚠️ {code}: Found in Slot {}, but no seats (Vacancy: {seats}). Continuing...",
                        slot.name
                    ));
                }
                Vacancy::Unreadable => {
                    notifier.notify(&format!(
                        "ℹ️ {code}: Appears in Slot {}, but vacancy unreadable. Continuing...",
                        slot.name
                    ));
                }
            }
        }
    }

    // A mid-cycle /start or /stop already replied to the operator and
    // left nothing to summarize.
    if !state.is_enabled() || state.tracked().is_empty() {
        return;
    }

    let still_pending = state.pending();
    if still_pending.is_empty() {
        info!("all tracked courses found, returning to awaiting-courses");
        notifier.notify(
            "🎉 All courses found! Monitoring complete.\n\n📌 Please enter the next course codes or send /stop.",
        );
        state.clear_courses();
    } else {
        let listed: Vec<&str> = still_pending.iter().map(|c| c.as_str()).collect();
        notifier.notify(&format!("⏳ Still monitoring: {}", listed.join(", ")));
    }
}
