//! Manager für Remap-Engines zur Verwaltung mehrerer paralleler Pads
//!
//! Jeder Pad-Slot bekommt seine eigene Engine samt Task; der Manager routet
//! eingehende Reports anhand des Slots und legt Engines beim ersten Report
//! eines neuen Slots automatisch an. So überschreiben sich parallele Pads
//! nie gegenseitig und ein hängender Sink eines Pads bremst die anderen
//! nicht aus.

use crate::config::ShapingConfig;
use crate::engine::{EngineError, RemapEngineHandle, ReportMapper};
use crate::profile::{Profile, ProfileStore};
use crate::report::{InputReport, OutputFrame};
use crate::sink::{ChannelKeyInjector, ChannelPadSink, KeyEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Routet Reports auf Engines, eine pro Pad-Slot
pub struct RemapEngineManager {
    /// Aktive Engines, indexiert nach Pad-Slot
    engines: HashMap<u8, (RemapEngineHandle, mpsc::Sender<InputReport>)>,

    /// Receiver für Reports aus dem HID-Transport
    report_rx: mpsc::Receiver<InputReport>,

    /// Output-Kanäle, geteilt von allen Engines
    frame_tx: mpsc::Sender<OutputFrame>,
    key_tx: mpsc::Sender<KeyEvent>,

    /// Globale Achsen-Konfiguration für neue Engines
    shaping: ShapingConfig,

    profiles: Arc<ProfileStore>,
}

impl RemapEngineManager {
    /// Erstellt einen neuen Manager ohne aktive Engines
    pub fn new(
        report_rx: mpsc::Receiver<InputReport>,
        frame_tx: mpsc::Sender<OutputFrame>,
        key_tx: mpsc::Sender<KeyEvent>,
        shaping: ShapingConfig,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        info!("Creating new RemapEngineManager");

        Self {
            engines: HashMap::new(),
            report_rx,
            frame_tx,
            key_tx,
            shaping,
            profiles,
        }
    }

    /// Legt die Engine für einen Pad-Slot an und startet ihren Task
    pub fn attach_pad(&mut self, pad_slot: u8) -> Result<(), EngineError> {
        if self.engines.contains_key(&pad_slot) {
            debug!("Engine for pad {} already attached", pad_slot);
            return Ok(());
        }

        info!("Attaching remap engine for pad {}", pad_slot);

        let mapper = ReportMapper::new(
            self.shaping,
            Box::new(ChannelPadSink::new(self.frame_tx.clone())),
            Box::new(ChannelKeyInjector::new(self.key_tx.clone())),
        );

        let mut handle = RemapEngineHandle::new(pad_slot);
        let report_sender = handle.start(mapper, self.profiles.clone())?;

        self.engines.insert(pad_slot, (handle, report_sender));
        Ok(())
    }

    /// Routing-Schleife: Reports nach Pad-Slot an die passende Engine
    ///
    /// Engines entstehen lazy beim ersten Report eines Slots. Ein voller
    /// Engine-Kanal kostet den einzelnen Report, nie die Schleife. Endet,
    /// wenn der Transport seinen Sender schließt.
    pub async fn run_routing(&mut self) -> Result<(), EngineError> {
        info!("Start report routing");

        while let Some(report) = self.report_rx.recv().await {
            let pad_slot = report.pad_slot;

            if !self.engines.contains_key(&pad_slot) {
                if let Err(e) = self.attach_pad(pad_slot) {
                    warn!("Could not attach engine for pad {}: {}", pad_slot, e);
                    continue;
                }
            }

            if let Some((_handle, sender)) = self.engines.get(&pad_slot) {
                if let Err(e) = sender.try_send(report) {
                    warn!("Report for pad {} dropped: {}", pad_slot, e);
                }
            }
        }

        info!("Report source closed, shutting down engines");
        self.deactivate_all().await
    }

    /// Tauscht die Profilliste atomar gegen eine neue aus
    ///
    /// Die Engines ziehen sich den neuen Snapshot mit dem nächsten Report;
    /// verwaiste Turbo-Zustände räumt jeder Mapper selbst ab.
    pub async fn reload_profiles(&self, profiles: Vec<Profile>) -> u64 {
        self.profiles.replace(profiles).await
    }

    /// Fährt die Engine eines Pad-Slots herunter
    pub async fn detach_pad(&mut self, pad_slot: u8) -> Result<(), EngineError> {
        info!("Detaching remap engine for pad {}", pad_slot);

        if let Some((mut handle, sender)) = self.engines.remove(&pad_slot) {
            drop(sender);
            if let Err(e) = handle.shutdown().await {
                warn!("Error shutting down engine for pad {}: {}", pad_slot, e);
                return Err(e);
            }
            Ok(())
        } else {
            warn!("No active engine for pad {}", pad_slot);
            Ok(()) // Kein Fehler, wenn der Slot nie angelegt wurde
        }
    }

    /// Fährt alle aktiven Engines herunter
    pub async fn deactivate_all(&mut self) -> Result<(), EngineError> {
        info!("Deactivating all remap engines");

        let pad_slots: Vec<u8> = self.engines.keys().copied().collect();

        for pad_slot in pad_slots {
            if let Err(e) = self.detach_pad(pad_slot).await {
                warn!("Error deactivating engine for pad {}: {}", pad_slot, e);
                // Weitermachen mit den anderen Engines
            }
        }

        info!("All remap engines deactivated");
        Ok(())
    }

    /// Prüft, ob für einen Pad-Slot eine Engine läuft
    pub fn is_pad_attached(&self, pad_slot: u8) -> bool {
        self.engines.contains_key(&pad_slot)
    }

    /// Gibt alle aktiven Pad-Slots zurück
    pub fn attached_pads(&self) -> Vec<u8> {
        self.engines.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{PadAddress, SourceButton, VirtualButton};
    use chrono::Local;

    fn report_for_slot(slot: u8) -> InputReport {
        let mut report = InputReport::new(slot, PadAddress::default(), Local::now());
        report.buttons.insert(SourceButton::Cross, true);
        report
    }

    #[tokio::test]
    async fn reports_from_two_slots_keep_their_frames_apart() {
        let store = Arc::new(ProfileStore::new(vec![Profile::default_profile()]));
        let (report_tx, report_rx) = mpsc::channel(16);
        let (frame_tx, mut frame_rx) = mpsc::channel(16);
        let (key_tx, _key_rx) = mpsc::channel(16);

        let mut manager = RemapEngineManager::new(
            report_rx,
            frame_tx,
            key_tx,
            ShapingConfig::default(),
            store,
        );

        let routing = tokio::spawn(async move { manager.run_routing().await });

        report_tx.send(report_for_slot(0)).await.expect("send");
        report_tx.send(report_for_slot(1)).await.expect("send");

        let mut slots = Vec::new();
        for _ in 0..2 {
            let frame = frame_rx.recv().await.expect("frame");
            assert_eq!(frame.buttons, VirtualButton::A.bit());
            slots.push(frame.pad_slot);
        }
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1]);

        drop(report_tx);
        routing.await.expect("join").expect("routing ends cleanly");
    }

    #[tokio::test]
    async fn lazy_attach_creates_one_engine_per_slot() {
        let store = Arc::new(ProfileStore::new(Vec::new()));
        let (_report_tx, report_rx) = mpsc::channel(16);
        let (frame_tx, _frame_rx) = mpsc::channel(16);
        let (key_tx, _key_rx) = mpsc::channel(16);

        let mut manager = RemapEngineManager::new(
            report_rx,
            frame_tx,
            key_tx,
            ShapingConfig::default(),
            store,
        );

        assert!(!manager.is_pad_attached(0));
        manager.attach_pad(0).expect("attach");
        manager.attach_pad(0).expect("re-attach is a no-op");
        assert!(manager.is_pad_attached(0));
        assert_eq!(manager.attached_pads(), vec![0]);

        // Reload läuft über den geteilten Store und bumpt die Generation
        let generation = manager
            .reload_profiles(vec![Profile::default_profile()])
            .await;
        assert_eq!(generation, 2);

        manager.deactivate_all().await.expect("shutdown");
        assert!(!manager.is_pad_attached(0));
    }
}
