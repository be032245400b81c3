//! Report Translation & Remapping Engine
//!
//! Kernstück des Systems: wandelt pro Report die physischen Pad-Zustände in
//! einen fertigen virtuellen Frame um. Die Engine basiert auf einer Statum
//! State Machine und läuft pro Pad-Slot in einem eigenen Task.
//!
//! # Pipeline
//!
//! ```text
//! InputReport ──► [Profile Matcher] ──► [Button Resolver] ──► Bitmask ─┐
//!       │                                     │                        ├──► OutputFrame ──► Sink
//!       │                               [Turbo Modulator]              │
//!       └─────────► [Axis Shaper] ────────────────────────► Achsen ────┘
//! ```

pub mod axis;
pub mod error;
pub mod manager;
pub mod mapper;
pub mod resolver;
pub mod service;
pub mod turbo;

// Re-exports für einfacheren Zugriff
pub use error::EngineError;
pub use manager::RemapEngineManager;
pub use mapper::ReportMapper;
pub use resolver::Resolution;
pub use service::{RemapEngine, RemapEngineHandle, RemapEngineState};
pub use turbo::TurboArena;
