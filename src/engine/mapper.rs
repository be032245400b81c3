//! Frame assembly per incoming report
//!
//! One [`ReportMapper`] serves one pad slot and walks the full pipeline for
//! every report: reset the working state, shape the axes, select the active
//! profiles, resolve their button mappings, finalize and dispatch the frame.
//! Exactly one frame leaves per report; a report without any active profile
//! still produces a frame with shaped axes and an empty button mask.
//!
//! ```text
//! Reset ──► ShapeAxes ──► MatchProfiles ──► Resolve/Aggregate ──► Finalize ──► Dispatch
//! ```

use crate::config::ShapingConfig;
use crate::engine::axis::{shape_stick, shape_trigger};
use crate::engine::resolver::{resolve, Resolution};
use crate::engine::turbo::TurboArena;
use crate::profile::{active_profiles, ProfileSnapshot};
use crate::report::{InputReport, OutputFrame};
use crate::sink::{KeyEvent, KeyInjector, VirtualPadSink};
use tracing::{debug, warn};

/// Assembles and dispatches one output frame per input report
///
/// Owns the only persistent mutable state of the pipeline (the turbo arena),
/// so one mapper per pad slot gives the single-writer discipline the
/// concurrency model asks for.
pub struct ReportMapper {
    shaping: ShapingConfig,
    turbo: TurboArena,
    sink: Box<dyn VirtualPadSink>,
    injector: Box<dyn KeyInjector>,
    seen_generation: u64,
}

impl ReportMapper {
    pub fn new(
        shaping: ShapingConfig,
        sink: Box<dyn VirtualPadSink>,
        injector: Box<dyn KeyInjector>,
    ) -> Self {
        Self {
            shaping,
            turbo: TurboArena::new(),
            sink,
            injector,
            seen_generation: 0,
        }
    }

    /// Runs one report through the pipeline and returns the finalized frame
    ///
    /// The frame is returned instead of being dispatched so the service loop
    /// (and the tests) stay in control of delivery.
    pub fn map_report(
        &mut self,
        report: &InputReport,
        snapshot: &ProfileSnapshot,
    ) -> OutputFrame {
        if snapshot.generation != self.seen_generation {
            self.turbo
                .retain_profiles(snapshot.profiles.iter().map(|p| p.name.as_str()));
            self.seen_generation = snapshot.generation;
        }

        // Reset
        let mut frame = OutputFrame::reset(report.pad_slot);

        // ShapeAxes: das erste aktive Profil mit Override ist maßgeblich,
        // sonst die globale Konfiguration
        let shaping = active_profiles(report, &snapshot.profiles)
            .find_map(|p| p.shaping.as_ref())
            .map(|layer| self.shaping.with_override(layer))
            .unwrap_or(self.shaping);

        let (lx, ly) = shape_stick(
            report.left_stick.x,
            report.left_stick.y,
            shaping.dead_zone_left,
            shaping.invert_lx,
            shaping.invert_ly,
        );
        let (rx, ry) = shape_stick(
            report.right_stick.x,
            report.right_stick.y,
            shaping.dead_zone_right,
            shaping.invert_rx,
            shaping.invert_ry,
        );
        frame.thumb_lx = lx;
        frame.thumb_ly = ly;
        frame.thumb_rx = rx;
        frame.thumb_ry = ry;
        frame.left_trigger = shape_trigger(report.left_trigger);
        frame.right_trigger = shape_trigger(report.right_trigger);

        // MatchProfiles + Resolve/Aggregate: Fehler bleiben dem einzelnen
        // Mapping zugeordnet, der Rest des Frames läuft weiter
        for profile in active_profiles(report, &snapshot.profiles) {
            for mapping in &profile.buttons {
                match resolve(
                    report,
                    &profile.name,
                    mapping,
                    &mut self.turbo,
                    report.timestamp,
                ) {
                    Resolution::Bitmask(bit) => frame.buttons |= bit,
                    Resolution::Key { code, pressed } => {
                        if let Err(e) = self.injector.inject(KeyEvent { code, pressed }) {
                            warn!(
                                "Key injection failed for profile '{}', button {}: {}",
                                profile.name, mapping.source, e
                            );
                        }
                    }
                    Resolution::NoOp => {}
                }
            }
        }

        // Finalize
        frame.timestamp = Some(report.timestamp);
        frame
    }

    /// Hands a finalized frame to the virtual-pad sink
    ///
    /// Delivery failures cost this frame only; the next report assembles
    /// fresh.
    pub fn dispatch(&self, frame: OutputFrame) {
        let pad_slot = frame.pad_slot;
        if let Err(e) = self.sink.submit(frame) {
            warn!("Frame delivery for pad {} failed: {}", pad_slot, e);
        } else {
            debug!("Frame dispatched for pad {}", pad_slot);
        }
    }

    /// Full pipeline including dispatch, as the service loop runs it
    pub fn process(&mut self, report: &InputReport, snapshot: &ProfileSnapshot) -> OutputFrame {
        let frame = self.map_report(report, snapshot);
        self.dispatch(frame.clone());
        frame
    }
}
