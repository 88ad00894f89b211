// Tractyl Core Library
// Pointer modes, DPI control, sticky keys and split sync for a trackball keyboard

pub mod action;
pub mod command;
pub mod config;
pub mod dpi;
pub mod keyboard;
pub mod keycode;
pub mod layer;
pub mod modifier;
pub mod output;
pub mod pointer;
pub mod sticky;
pub mod sync;

pub use action::Action;
pub use command::{Command, CommandKind, ModeFlag};
pub use config::{
    ConfigStore, MemoryStorage, PointerConfig, Storage, StorageError, Tunables, CONFIG_SIZE,
};
pub use dpi::DpiCurve;
pub use keyboard::{HalfRole, KeyboardState};
pub use keycode::Keycode;
pub use layer::Layer;
pub use modifier::{ModMask, Modifier};
pub use output::{HostOutput, OutputEvent, PointingSensor, RecordingOutput, RecordingSensor};
pub use pointer::{MotionEngine, MotionSample, MouseReport, PointerMode};
pub use sticky::{DanceOutcome, DanceState, RolePhase, StickyArbiter, StickyRole};
pub use sync::{LinkError, RecordingLink, SplitLink, SyncBridge, RPC_ID_CONFIG_SYNC};

#[cfg(feature = "host")]
pub use config::{TunablesError, TunablesToml};
